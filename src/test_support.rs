//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use crate::core::catalog::Catalog;
use crate::core::content::{
    ContentStore, Diagram, Language, QuizQuestion, Section, Translations, VocabularyEntry,
    WorkMeta,
};
use crate::core::state::App;

/// A question with `n_options` options labelled `Option 0..n`.
pub fn question(id: &str, correct: usize, n_options: usize) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        question: format!("Question {id}?"),
        options: (0..n_options).map(|i| format!("Option {i}")).collect(),
        correct_answer_index: correct,
        explanation: format!("Because {correct}."),
    }
}

/// A bare section whose translations are `"<lang>:<id>"`.
pub fn section(id: &str, quiz: Vec<QuizQuestion>) -> Section {
    Section {
        id: id.to_string(),
        title: format!("Title {id}"),
        translations: Translations {
            en: format!("en:{id}"),
            de: format!("de:{id}"),
            zh: format!("zh:{id}"),
        },
        content: None,
        insight: None,
        vocabulary: Vec::new(),
        diagram: None,
        quiz,
    }
}

pub fn test_work() -> WorkMeta {
    WorkMeta {
        id: "test-work".to_string(),
        title: "Test Work".to_string(),
        author: "Test Author".to_string(),
        reading_path: "/read/test-work".to_string(),
    }
}

pub fn test_diagram() -> Diagram {
    Diagram {
        title: "Structure".to_string(),
        description: "How the parts relate".to_string(),
        definition: "graph TB\n    A[Reason] -->|limits| B{Experience}\n    A --> C[Critique]"
            .to_string(),
    }
}

/// Three sections: `dedication` (2 questions, diagram, aids), `preface`
/// (3 questions, diagram) and `afterword` (no quiz, no diagram).
pub fn test_store() -> ContentStore {
    let mut dedication = section(
        "dedication",
        vec![question("dedication-1", 2, 4), question("dedication-2", 1, 4)],
    );
    dedication.insight = Some("Kant dedicates the work to a patron.".to_string());
    dedication.vocabulary = vec![VocabularyEntry {
        term: "Kritik".to_string(),
        definition: "Critical examination".to_string(),
        usage: "Kritik der reinen Vernunft".to_string(),
    }];
    dedication.diagram = Some(test_diagram());

    let mut preface = section(
        "preface",
        vec![
            question("preface-1", 0, 3),
            question("preface-2", 1, 3),
            question("preface-3", 2, 3),
        ],
    );
    preface.diagram = Some(test_diagram());

    let afterword = section("afterword", Vec::new());

    match ContentStore::from_parts(test_work(), vec![dedication, preface, afterword]) {
        Ok(store) => store,
        Err(e) => panic!("test store is invalid: {e}"),
    }
}

/// An App on the reader screen over [`test_store`], in English.
pub fn test_app() -> App {
    let mut app = App::new(Arc::new(test_store()), Catalog::default(), Language::En);
    app.open_reader();
    app
}
