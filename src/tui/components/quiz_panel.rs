//! # QuizPanel Component
//!
//! Lists the current section's questions with selectable options.
//!
//! The cursor walks a flat list of `(question, option)` slots, so Up/Down
//! move across question boundaries. Selecting an option emits
//! `QuizEvent::Select`; the reducer decides whether it is accepted (a
//! submitted quiz ignores it).
//!
//! ```text
//! 1. What does Bacon call for?
//!    ( ) A return to scholastic learning
//!  ▸ (•) A renewal of the sciences
//!    ( ) A political revolution
//! ```
//!
//! Once submitted, each option shows ✓ or ✗ and the explanation follows.
//! A submitted quiz is locked: the cursor disappears, selection emits
//! nothing and the arrow keys scroll the panel instead.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::content::Section;
use crate::core::quiz::{QuizAttempt, evaluate};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Select { question_id: String, option: usize },
}

/// Cursor and scroll position for the quiz of one section.
#[derive(Debug, Default)]
pub struct QuizPanelState {
    section_id: String,
    slots: Vec<(String, usize)>,
    cursor: usize,
    scroll: u16,
    locked: bool,
}

impl QuizPanelState {
    /// Rebuild the slot list when the section changes. Keeps the cursor when
    /// called again for the same section.
    pub fn sync(&mut self, section: &Section) {
        if self.section_id == section.id {
            return;
        }
        self.section_id = section.id.clone();
        self.slots = section
            .quiz
            .iter()
            .flat_map(|q| (0..q.options.len()).map(move |i| (q.id.clone(), i)))
            .collect();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Lock or unlock input, following whether the attempt is submitted.
    pub fn lock(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The `(question_id, option)` under the cursor.
    pub fn current(&self) -> Option<(&str, usize)> {
        self.slots
            .get(self.cursor)
            .map(|(id, option)| (id.as_str(), *option))
    }

    fn move_by(&mut self, delta: isize) {
        if self.locked {
            // Render clamps to the last line
            self.scroll = self.scroll.saturating_add_signed(delta as i16);
            return;
        }
        if self.slots.is_empty() {
            return;
        }
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.slots.len() - 1);
    }
}

impl EventHandler for QuizPanelState {
    type Event = QuizEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<QuizEvent> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.move_by(-1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.move_by(1);
                None
            }
            TuiEvent::PageUp => {
                self.move_by(-5);
                None
            }
            TuiEvent::PageDown => {
                self.move_by(5);
                None
            }
            TuiEvent::Select if self.locked => None,
            TuiEvent::Select => self.current().map(|(id, option)| QuizEvent::Select {
                question_id: id.to_string(),
                option,
            }),
            _ => None,
        }
    }
}

pub struct QuizPanel<'a> {
    pub section: &'a Section,
    pub attempt: Option<&'a QuizAttempt>,
    pub focused: bool,
    pub state: &'a mut QuizPanelState,
}

impl QuizPanel<'_> {
    /// Build the panel lines for a given text width and return them with the
    /// line index of the cursor.
    fn lines(&self, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut cursor_line = None;
        let submitted = self.attempt.is_some_and(QuizAttempt::is_submitted);
        let dim = Style::default().fg(Color::DarkGray);
        let width = width.max(10);

        let mut slot = 0;
        for (n, question) in self.section.quiz.iter().enumerate() {
            let chosen = self.attempt.and_then(|a| a.answer(&question.id));
            let heading = format!("{}. {}", n + 1, question.question);
            for (i, part) in textwrap::wrap(&heading, width).into_iter().enumerate() {
                let text = if i == 0 {
                    part.into_owned()
                } else {
                    format!("   {part}")
                };
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }

            for (option, label) in question.options.iter().enumerate() {
                let is_cursor = self.focused && !submitted && slot == self.state.cursor;
                if is_cursor {
                    cursor_line = Some(lines.len());
                }
                slot += 1;

                let is_chosen = chosen == Some(option);
                let (marker, style) = if submitted {
                    if question.is_correct(option) {
                        ("✓", Style::default().fg(Color::Green))
                    } else if is_chosen {
                        ("✗", Style::default().fg(Color::Red))
                    } else {
                        (" ", dim)
                    }
                } else if is_chosen {
                    ("•", Style::default().fg(Color::Cyan))
                } else {
                    (" ", Style::default())
                };
                let pointer = if is_cursor { " ▸ " } else { "   " };
                let style = if is_cursor {
                    style.add_modifier(Modifier::REVERSED)
                } else {
                    style
                };
                lines.push(Line::from(vec![
                    Span::raw(pointer),
                    Span::styled(format!("({marker}) {label}"), style),
                ]));
            }

            if submitted {
                for part in textwrap::wrap(&question.explanation, width.saturating_sub(3).max(10)) {
                    lines.push(Line::from(Span::styled(format!("   {part}"), dim)));
                }
            }
            lines.push(Line::default());
        }

        match self.attempt.filter(|a| a.is_submitted()) {
            Some(attempt) => {
                let outcome = evaluate(&self.section.quiz, attempt.answers());
                lines.push(Line::from(Span::styled(
                    format!(
                        "Result: {}/{} correct, +{} XP",
                        outcome.correct,
                        outcome.total,
                        attempt.awarded()
                    ),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "Enter to choose, s to submit",
                dim,
            ))),
        }

        (lines, cursor_line)
    }
}

impl Component for QuizPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Quiz ");
        let inner = block.inner(area);

        if !self.section.has_quiz() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "No quiz for this section.",
                    Style::default().fg(Color::DarkGray),
                )))
                .block(block),
                area,
            );
            return;
        }

        let (lines, cursor_line) = self.lines(usize::from(inner.width));

        // Keep the cursor in view
        let height = usize::from(inner.height.max(1));
        let mut scroll = usize::from(self.state.scroll);
        if let Some(line) = cursor_line {
            if line < scroll {
                scroll = line;
            } else if line >= scroll + height {
                scroll = line + 1 - height;
            }
        }
        scroll = scroll.min(lines.len().saturating_sub(1));
        self.state.scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .scroll((self.state.scroll, 0)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_store;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn preface() -> Section {
        let store = test_store();
        let index = store.position_of("preface").unwrap();
        store.get(index).unwrap().clone()
    }

    fn rendered(panel: &mut QuizPanel, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                panel.render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cursor_walks_across_questions() {
        let section = preface();
        let mut state = QuizPanelState::default();
        state.sync(&section);
        assert_eq!(state.current(), Some(("preface-1", 0)));

        for _ in 0..3 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.current(), Some(("preface-2", 0)));

        for _ in 0..20 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.current(), Some(("preface-3", 2)));

        state.handle_event(&TuiEvent::PageUp);
        state.handle_event(&TuiEvent::PageUp);
        assert_eq!(state.current(), Some(("preface-1", 0)));
    }

    #[test]
    fn test_select_emits_question_and_option() {
        let section = preface();
        let mut state = QuizPanelState::default();
        state.sync(&section);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            state.handle_event(&TuiEvent::Select),
            Some(QuizEvent::Select {
                question_id: "preface-1".to_string(),
                option: 1
            })
        );
    }

    #[test]
    fn test_sync_resets_only_on_section_change() {
        let section = preface();
        let mut state = QuizPanelState::default();
        state.sync(&section);
        state.handle_event(&TuiEvent::CursorDown);
        state.sync(&section);
        assert_eq!(state.current(), Some(("preface-1", 1)));

        let store = test_store();
        let dedication = store.get(0).unwrap();
        state.sync(dedication);
        assert_eq!(state.current().map(|(id, _)| id), Some("dedication-1"));
    }

    #[test]
    fn test_no_quiz_section_has_no_slots() {
        let store = test_store();
        let index = store.position_of("afterword").unwrap();
        let section = store.get(index).unwrap();
        let mut state = QuizPanelState::default();
        state.sync(section);
        assert_eq!(state.handle_event(&TuiEvent::Select), None);

        let mut panel = QuizPanel {
            section,
            attempt: None,
            focused: true,
            state: &mut state,
        };
        assert!(rendered(&mut panel, 40, 5).contains("No quiz for this section."));
    }

    #[test]
    fn test_open_attempt_marks_chosen_option() {
        let section = preface();
        let mut attempt = QuizAttempt::default();
        attempt.select_answer(&section.quiz, "preface-1", 2);
        let mut state = QuizPanelState::default();
        state.sync(&section);

        let mut panel = QuizPanel {
            section: &section,
            attempt: Some(&attempt),
            focused: true,
            state: &mut state,
        };
        let text = rendered(&mut panel, 60, 30);
        assert!(text.contains("(•) Option 2"));
        assert!(text.contains("s to submit"));
        assert!(!text.contains('✓'));
    }

    #[test]
    fn test_submitted_attempt_shows_marks_and_result() {
        let section = preface();
        let mut attempt = QuizAttempt::default();
        attempt.select_answer(&section.quiz, "preface-1", 0);
        attempt.select_answer(&section.quiz, "preface-2", 0);
        attempt.submit(&section.quiz);
        let mut state = QuizPanelState::default();
        state.sync(&section);

        let mut panel = QuizPanel {
            section: &section,
            attempt: Some(&attempt),
            focused: false,
            state: &mut state,
        };
        let text = rendered(&mut panel, 60, 40);
        assert!(text.contains("(✓) Option 0"));
        assert!(text.contains("(✗) Option 0"));
        assert!(text.contains("Result: 1/3 correct, +100 XP"));
    }

    #[test]
    fn test_locked_panel_ignores_selection_and_scrolls() {
        let section = preface();
        let mut attempt = QuizAttempt::default();
        attempt.select_answer(&section.quiz, "preface-1", 1);
        attempt.submit(&section.quiz);
        let mut state = QuizPanelState::default();
        state.sync(&section);
        state.lock(true);

        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.current(), Some(("preface-1", 0)));
        assert_eq!(state.handle_event(&TuiEvent::Select), None);

        let mut panel = QuizPanel {
            section: &section,
            attempt: Some(&attempt),
            focused: true,
            state: &mut state,
        };
        let text = rendered(&mut panel, 60, 8);
        assert!(!text.contains('▸'));
        assert!(!text.contains("1. Question preface-1?"));
        assert_eq!(state.scroll, 2);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let section = preface();
        let mut state = QuizPanelState::default();
        state.sync(&section);
        for _ in 0..8 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        let mut panel = QuizPanel {
            section: &section,
            attempt: None,
            focused: true,
            state: &mut state,
        };
        let text = rendered(&mut panel, 40, 6);
        assert!(text.contains("▸ ( ) Option 2"));
        assert!(state.scroll > 0);
    }
}
