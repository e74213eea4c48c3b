//! # Quiz Attempts
//!
//! Each section's quiz is attempted independently. An attempt collects one
//! answer per question and is then submitted exactly once:
//!
//! ```text
//!   open ──select_answer()──▶ open
//!     │
//!     └──submit()──▶ submitted   (answers frozen, XP awarded once)
//! ```
//!
//! Attempts live in a [`QuizBook`] keyed by section id and are created the
//! first time the reader touches a section's quiz, so moving between sections
//! never leaks answers from one quiz into another.

use log::{debug, info};
use std::collections::HashMap;

use crate::core::content::{QuizQuestion, Section};

/// XP granted for each correctly answered question.
pub const XP_PER_CORRECT_ANSWER: u32 = 100;

/// Result of trying to record an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded,
    /// The attempt was already graded; answers are frozen.
    AlreadySubmitted,
    UnknownQuestion,
    OptionOutOfRange,
}

/// Grading summary returned by a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub awarded: u32,
}

/// Count exact matches between recorded answers and the answer key.
/// Unanswered questions count as wrong.
pub fn evaluate(questions: &[QuizQuestion], answers: &HashMap<String, usize>) -> QuizOutcome {
    let correct = questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|&a| q.is_correct(a)))
        .count();
    let awarded = u32::try_from(correct)
        .unwrap_or(u32::MAX)
        .saturating_mul(XP_PER_CORRECT_ANSWER);
    QuizOutcome {
        correct,
        total: questions.len(),
        awarded,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAttempt {
    answers: HashMap<String, usize>,
    submitted: bool,
    /// XP granted when this attempt was submitted.
    awarded: u32,
}

impl QuizAttempt {
    pub fn answer(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn answers(&self) -> &HashMap<String, usize> {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn awarded(&self) -> u32 {
        self.awarded
    }

    /// Record (or overwrite) the chosen option for a question.
    pub fn select_answer(
        &mut self,
        questions: &[QuizQuestion],
        question_id: &str,
        option: usize,
    ) -> AnswerOutcome {
        if self.submitted {
            return AnswerOutcome::AlreadySubmitted;
        }
        let Some(question) = questions.iter().find(|q| q.id == question_id) else {
            return AnswerOutcome::UnknownQuestion;
        };
        if option >= question.options.len() {
            return AnswerOutcome::OptionOutOfRange;
        }
        self.answers.insert(question.id.clone(), option);
        AnswerOutcome::Recorded
    }

    /// Grade the attempt. Returns `None` if it was already submitted, in which
    /// case nothing changes and no XP should be awarded.
    pub fn submit(&mut self, questions: &[QuizQuestion]) -> Option<QuizOutcome> {
        if self.submitted {
            return None;
        }
        let outcome = evaluate(questions, &self.answers);
        self.submitted = true;
        self.awarded = outcome.awarded;
        Some(outcome)
    }
}

/// All quiz attempts of a reading session, keyed by section id.
#[derive(Debug, Default)]
pub struct QuizBook {
    attempts: HashMap<String, QuizAttempt>,
}

impl QuizBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The attempt for a section, if the reader has interacted with it.
    pub fn attempt(&self, section_id: &str) -> Option<&QuizAttempt> {
        self.attempts.get(section_id)
    }

    pub fn is_submitted(&self, section_id: &str) -> bool {
        self.attempt(section_id).is_some_and(QuizAttempt::is_submitted)
    }

    pub fn select_answer(
        &mut self,
        section: &Section,
        question_id: &str,
        option: usize,
    ) -> AnswerOutcome {
        if section.question(question_id).is_none() {
            return AnswerOutcome::UnknownQuestion;
        }
        let outcome = self
            .attempts
            .entry(section.id.clone())
            .or_default()
            .select_answer(&section.quiz, question_id, option);
        debug!(
            "select_answer section={} question={} option={} -> {:?}",
            section.id, question_id, option, outcome
        );
        outcome
    }

    /// Submit a section's quiz. `None` for sections without a quiz and for
    /// repeat submissions.
    pub fn submit(&mut self, section: &Section) -> Option<QuizOutcome> {
        if !section.has_quiz() {
            return None;
        }
        let outcome = self
            .attempts
            .entry(section.id.clone())
            .or_default()
            .submit(&section.quiz);
        match outcome {
            Some(o) => info!(
                "Quiz '{}' submitted: {}/{} correct, {} XP",
                section.id, o.correct, o.total, o.awarded
            ),
            None => debug!("Quiz '{}' already submitted, ignoring", section.id),
        }
        outcome
    }
}
