//! Frame layout for both screens.
//!
//! ```text
//! ┌───────────────────────── title bar ─────────────────────────┐
//! │ section text (60%)             │ study aids                 │
//! │                                ├────────────────────────────┤
//! │                                │ quiz                       │
//! └──────────────────────── key hints ──────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::state::{App, Screen};
use crate::tui::component::Component;
use crate::tui::components::{
    DiagramView, Library, QuizPanel, SectionText, StudyAids, TitleBar,
};
use crate::tui::{Focus, TuiState};

const READER_HINTS: &str =
    "1/2/3 language · Tab focus · v aids tab · ↑/↓ scroll · Enter choose · s submit · Esc library";
const LIBRARY_HINTS: &str = "↑/↓ select · Enter open · q quit";

/// Key hints for the reader. Arrows are only advertised where they move.
fn reader_hints(app: &App) -> String {
    let navigation = match (
        app.navigator.can_go_previous(),
        app.navigator.can_go_next(),
    ) {
        (true, true) => "←/→ section · ",
        (false, true) => "→ next section · ",
        (true, false) => "← previous section · ",
        (false, false) => "",
    };
    format!("{navigation}{READER_HINTS}")
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [title_area, body_area, hints_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    let hints = match app.screen {
        Screen::Library => {
            TitleBar::new(
                String::from("Kritik"),
                app.score.xp(),
                app.status_message.clone(),
            )
            .render(frame, title_area);
            Library {
                catalog: &app.catalog,
                state: &mut tui.library,
            }
            .render(frame, body_area);
            LIBRARY_HINTS.to_string()
        }
        Screen::Reader => {
            TitleBar::new(
                app.store.work().title.clone(),
                app.score.xp(),
                app.status_message.clone(),
            )
            .with_position(app.navigator.position(), app.language())
            .render(frame, title_area);
            draw_reader(frame, body_area, app, tui);
            reader_hints(app)
        }
    };

    frame.render_widget(
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        hints_area,
    );
}

fn draw_reader(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let section = app.current_section();
    let [text_area, side_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
    let [aids_area, quiz_area] =
        Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)])
            .areas(side_area);

    SectionText {
        section,
        language: app.language(),
        focused: tui.focus == Focus::Text,
        state: &mut tui.text,
    }
    .render(frame, text_area);

    StudyAids {
        section,
        diagram: DiagramView {
            artifact: app.diagrams.artifact(&section.id),
            failure: app.diagrams.failure(&section.id),
            pending: app.diagrams.is_pending(&section.id),
        },
        focused: tui.focus == Focus::Aids,
        state: &mut tui.aids,
    }
    .render(frame, aids_area);

    QuizPanel {
        section,
        attempt: app.current_attempt(),
        focused: tui.focus == Focus::Quiz,
        state: &mut tui.quiz,
    }
    .render(frame, quiz_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::catalog::Catalog;
    use crate::core::content::Language;
    use crate::test_support::{test_app, test_store};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(160, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_library_screen() {
        let app = App::new(
            Arc::new(test_store()),
            Catalog::embedded().unwrap(),
            Language::En,
        );
        let mut tui = TuiState::new(&app);
        let text = draw(&app, &mut tui);
        assert!(text.contains("Kritik · 0 XP"));
        assert!(text.contains("Welcome to Kritik!"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_hints_hide_unavailable_navigation() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app);
        let first = draw(&app, &mut tui);
        assert!(first.contains("→ next section"));
        assert!(!first.contains('←'));

        update(&mut app, Action::NextSection);
        tui.sync(&app);
        assert!(draw(&app, &mut tui).contains("←/→ section"));

        update(&mut app, Action::NextSection);
        tui.sync(&app);
        let last = draw(&app, &mut tui);
        assert!(last.contains("← previous section"));
        assert!(!last.contains('→'));
    }

    #[test]
    fn test_reader_screen() {
        let mut app = test_app();
        update(&mut app, Action::SetLanguage(Language::De));
        let mut tui = TuiState::new(&app);
        let text = draw(&app, &mut tui);
        assert!(text.contains("Test Work · 1/3 · Deutsch · 0 XP"));
        assert!(text.contains("de:dedication"));
        assert!(text.contains("Study Aids"));
        assert!(text.contains("Question dedication-1?"));
        assert!(text.contains("Esc library"));
    }
}
