//! # Actions
//!
//! Everything that can happen in a reading session becomes an `Action`.
//! User presses →? That's `Action::NextSection`.
//! A diagram finishes rendering? That's `Action::DiagramRendered { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the adapter should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};
use std::sync::Arc;

use crate::core::content::Language;
use crate::core::quiz::AnswerOutcome;
use crate::core::state::{App, Screen};
use crate::diagram::{DiagramArtifact, DiagramRequest, RenderError, RenderTicket};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PreviousSection,
    NextSection,
    SetLanguage(Language),
    SelectAnswer { question_id: String, option: usize },
    SubmitQuiz,
    /// Open a catalog entry by its reading path.
    OpenBook(String),
    /// Back to the library.
    CloseBook,
    DiagramRendered {
        ticket: RenderTicket,
        result: Result<DiagramArtifact, RenderError>,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    RenderDiagram(DiagramRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::PreviousSection => {
            if app.navigator.go_previous() {
                on_section_changed(app)
            } else {
                Effect::None
            }
        }
        Action::NextSection => {
            if app.navigator.go_next() {
                on_section_changed(app)
            } else {
                Effect::None
            }
        }
        Action::SetLanguage(language) => {
            if app.navigator.set_language(language) {
                info!("Language set to {}", language);
                app.status_message = format!("Language: {}", language.label());
            }
            Effect::None
        }
        Action::SelectAnswer {
            question_id,
            option,
        } => {
            let store = Arc::clone(&app.store);
            let section = app.navigator.current(&store);
            if app.quizzes.select_answer(section, &question_id, option)
                == AnswerOutcome::AlreadySubmitted
            {
                app.status_message = String::from("Quiz already submitted");
            }
            Effect::None
        }
        Action::SubmitQuiz => {
            let store = Arc::clone(&app.store);
            let section = app.navigator.current(&store);
            match app.quizzes.submit(section) {
                Some(outcome) => {
                    app.score.add_xp(outcome.awarded);
                    app.status_message = format!(
                        "Quiz: {}/{} correct, +{} XP",
                        outcome.correct, outcome.total, outcome.awarded
                    );
                }
                None if section.has_quiz() => {
                    app.status_message = String::from("Quiz already submitted");
                }
                None => {
                    app.status_message = String::from("This section has no quiz");
                }
            }
            Effect::None
        }
        Action::OpenBook(path) => {
            if path != app.store.work().reading_path {
                info!("No content installed for {}", path);
                app.status_message = format!("No content installed for {path}");
                return Effect::None;
            }
            app.open_reader();
            app.status_message = format!("Reading: {}", app.store.work().title);
            request_diagram(app)
        }
        Action::CloseBook => {
            app.screen = Screen::Library;
            app.diagrams.supersede();
            Effect::None
        }
        Action::DiagramRendered { ticket, result } => {
            let section_id = ticket.section_id.clone();
            if app.diagrams.apply(ticket, result)
                && let Some(e) = app.diagrams.failure(&section_id)
            {
                app.status_message = format!("Diagram unavailable: {e}");
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn on_section_changed(app: &mut App) -> Effect {
    let (position, total) = app.navigator.position();
    debug!(
        "Section {}/{}: {}",
        position,
        total,
        app.current_section().id
    );
    app.status_message.clear();
    request_diagram(app)
}

/// Ask for the current section's diagram unless it is already rendered.
/// Any render for a previous section is superseded either way.
fn request_diagram(app: &mut App) -> Effect {
    let store = Arc::clone(&app.store);
    let section = app.navigator.current(&store);
    let Some(diagram) = section.diagram.as_ref() else {
        app.diagrams.supersede();
        return Effect::None;
    };
    if app.diagrams.artifact(&section.id).is_some() {
        app.diagrams.supersede();
        return Effect::None;
    }
    let ticket = app.diagrams.begin(&section.id);
    Effect::RenderDiagram(DiagramRequest {
        ticket,
        definition: diagram.definition.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::test_support::{test_app, test_store};

    fn select(app: &mut App, question_id: &str, option: usize) {
        update(
            app,
            Action::SelectAnswer {
                question_id: question_id.to_string(),
                option,
            },
        );
    }

    fn render_ticket(effect: Effect) -> RenderTicket {
        match effect {
            Effect::RenderDiagram(request) => request.ticket,
            other => panic!("expected RenderDiagram, got {other:?}"),
        }
    }

    fn outline(line: &str) -> DiagramArtifact {
        DiagramArtifact::Outline(vec![line.to_string()])
    }

    #[test]
    fn test_dedication_scenario_awards_100() {
        let mut app = test_app();
        select(&mut app, "dedication-1", 2);
        select(&mut app, "dedication-2", 0);
        update(&mut app, Action::SubmitQuiz);

        assert_eq!(app.score.xp(), 100);
        assert_eq!(app.status_message, "Quiz: 1/2 correct, +100 XP");
        assert!(app.current_attempt().unwrap().is_submitted());
    }

    #[test]
    fn test_all_correct_awards_100_per_question() {
        let mut app = test_app();
        update(&mut app, Action::NextSection);
        select(&mut app, "preface-1", 0);
        select(&mut app, "preface-2", 1);
        select(&mut app, "preface-3", 2);
        update(&mut app, Action::SubmitQuiz);
        assert_eq!(app.score.xp(), 300);
    }

    #[test]
    fn test_unanswered_submit_awards_zero() {
        let mut app = test_app();
        update(&mut app, Action::SubmitQuiz);
        assert_eq!(app.score.xp(), 0);
        assert!(app.current_attempt().unwrap().is_submitted());
    }

    #[test]
    fn test_double_submit_awards_once() {
        let mut app = test_app();
        select(&mut app, "dedication-1", 2);
        select(&mut app, "dedication-2", 1);
        update(&mut app, Action::SubmitQuiz);
        update(&mut app, Action::SubmitQuiz);
        assert_eq!(app.score.xp(), 200);
        assert_eq!(app.status_message, "Quiz already submitted");
    }

    #[test]
    fn test_select_after_submit_leaves_answers() {
        let mut app = test_app();
        select(&mut app, "dedication-1", 0);
        update(&mut app, Action::SubmitQuiz);
        select(&mut app, "dedication-1", 2);
        select(&mut app, "dedication-2", 1);

        let attempt = app.current_attempt().unwrap();
        assert_eq!(attempt.answer("dedication-1"), Some(0));
        assert_eq!(attempt.answer("dedication-2"), None);
        assert_eq!(app.status_message, "Quiz already submitted");
    }

    #[test]
    fn test_set_language_touches_nothing_else() {
        let mut app = test_app();
        update(&mut app, Action::NextSection);
        select(&mut app, "preface-1", 0);
        update(&mut app, Action::SubmitQuiz);
        let index = app.navigator.index();
        let xp = app.score.xp();
        let attempt = app.current_attempt().cloned();

        for language in [Language::Zh, Language::De, Language::En, Language::En] {
            assert_eq!(update(&mut app, Action::SetLanguage(language)), Effect::None);
            assert_eq!(app.language(), language);
            assert_eq!(app.navigator.index(), index);
            assert_eq!(app.score.xp(), xp);
            assert_eq!(app.current_attempt().cloned(), attempt);
        }
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::PreviousSection), Effect::None);
        assert_eq!(app.navigator.index(), 0);

        update(&mut app, Action::NextSection);
        update(&mut app, Action::NextSection);
        assert_eq!(app.navigator.index(), 2);
        assert_eq!(update(&mut app, Action::NextSection), Effect::None);
        assert_eq!(app.navigator.index(), 2);
    }

    #[test]
    fn test_answers_do_not_leak_between_sections() {
        let mut app = test_app();
        select(&mut app, "dedication-1", 2);
        update(&mut app, Action::SubmitQuiz);

        update(&mut app, Action::NextSection);
        assert!(app.current_attempt().is_none());
        select(&mut app, "dedication-1", 1);
        assert!(app.current_attempt().is_none());

        update(&mut app, Action::PreviousSection);
        assert!(app.current_attempt().unwrap().is_submitted());
        assert_eq!(app.current_attempt().unwrap().answer("dedication-1"), Some(2));
    }

    #[test]
    fn test_section_without_quiz_submit_is_noop() {
        let mut app = test_app();
        update(&mut app, Action::NextSection);
        update(&mut app, Action::NextSection);
        update(&mut app, Action::SubmitQuiz);
        assert_eq!(app.score.xp(), 0);
        assert_eq!(app.status_message, "This section has no quiz");
    }

    #[test]
    fn test_navigation_requests_diagram_for_new_section() {
        let mut app = test_app();
        let ticket = render_ticket(update(&mut app, Action::NextSection));
        assert_eq!(ticket.section_id, "preface");
        assert!(app.diagrams.is_pending("preface"));

        // afterword has no diagram: nothing to render, preface is superseded
        assert_eq!(update(&mut app, Action::NextSection), Effect::None);
        assert!(!app.diagrams.is_pending("preface"));
    }

    #[test]
    fn test_rendered_diagram_is_not_requested_again() {
        let mut app = test_app();
        let ticket = render_ticket(update(&mut app, Action::NextSection));
        update(
            &mut app,
            Action::DiagramRendered {
                ticket,
                result: Ok(outline("preface")),
            },
        );
        update(&mut app, Action::PreviousSection);
        assert_eq!(update(&mut app, Action::NextSection), Effect::None);
        assert_eq!(app.diagrams.artifact("preface"), Some(&outline("preface")));
    }

    #[test]
    fn test_stale_diagram_result_is_dropped() {
        let mut app = test_app();
        let stale = render_ticket(update(&mut app, Action::NextSection));
        let current = render_ticket(update(&mut app, Action::PreviousSection));
        assert_eq!(current.section_id, "dedication");

        update(
            &mut app,
            Action::DiagramRendered {
                ticket: stale,
                result: Ok(outline("late")),
            },
        );
        assert!(app.diagrams.artifact("preface").is_none());
        assert!(app.diagrams.is_pending("dedication"));
    }

    #[test]
    fn test_failed_render_keeps_state_and_reports() {
        let mut app = test_app();
        select(&mut app, "dedication-1", 2);
        update(&mut app, Action::SubmitQuiz);
        let ticket = render_ticket(update(&mut app, Action::NextSection));

        update(
            &mut app,
            Action::DiagramRendered {
                ticket,
                result: Err(RenderError::TimedOut(std::time::Duration::from_secs(10))),
            },
        );
        assert_eq!(app.status_message, "Diagram unavailable: render timed out after 10s");
        assert_eq!(app.navigator.index(), 1);
        assert_eq!(app.score.xp(), 100);
        assert!(app.diagrams.artifact("preface").is_none());
        assert!(app.diagrams.failure("preface").is_some());
    }

    #[test]
    fn test_open_book_with_matching_path_enters_reader() {
        let mut app = App::new(Arc::new(test_store()), Catalog::default(), Language::En);
        let effect = update(&mut app, Action::OpenBook("/read/test-work".to_string()));
        assert_eq!(app.screen, Screen::Reader);
        assert_eq!(app.status_message, "Reading: Test Work");
        assert_eq!(render_ticket(effect).section_id, "dedication");
    }

    #[test]
    fn test_open_book_with_unknown_path_stays_in_library() {
        let mut app = App::new(Arc::new(test_store()), Catalog::default(), Language::En);
        let effect = update(&mut app, Action::OpenBook("/read/hume".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.screen, Screen::Library);
        assert_eq!(app.status_message, "No content installed for /read/hume");
    }

    #[test]
    fn test_close_book_supersedes_pending_render() {
        let mut app = test_app();
        let ticket = render_ticket(update(&mut app, Action::NextSection));
        update(&mut app, Action::CloseBook);
        assert_eq!(app.screen, Screen::Library);
        update(
            &mut app,
            Action::DiagramRendered {
                ticket,
                result: Ok(outline("late")),
            },
        );
        assert!(app.diagrams.artifact("preface").is_none());
    }

    #[test]
    fn test_quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
