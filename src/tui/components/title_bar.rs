//! # TitleBar Component
//!
//! Top status bar: work title, section position, language, session XP and
//! the latest status message.
//!
//! Stateless: it receives everything as props and renders a single line.
//!
//! ```text
//! Kritik der reinen Vernunft · 2/13 · Deutsch · 100 XP | Quiz: 1/2 correct, +100 XP
//! ```
//!
//! On the library screen there is no position or language, only the app
//! name and XP.

use crate::core::content::Language;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub heading: String,
    /// `(position, total)` in the reader, `None` in the library.
    pub position: Option<(usize, usize)>,
    pub language: Option<Language>,
    pub xp: u64,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(heading: String, xp: u64, status_message: String) -> Self {
        Self {
            heading,
            position: None,
            language: None,
            xp,
            status_message,
        }
    }

    pub fn with_position(mut self, position: (usize, usize), language: Language) -> Self {
        self.position = Some(position);
        self.language = Some(language);
        self
    }

    fn text(&self) -> String {
        let mut text = self.heading.clone();
        if let Some((current, total)) = self.position {
            text.push_str(&format!(" · {current}/{total}"));
        }
        if let Some(language) = self.language {
            text.push_str(&format!(" · {}", language.label()));
        }
        text.push_str(&format!(" · {} XP", self.xp));
        if !self.status_message.is_empty() {
            text.push_str(&format!(" | {}", self.status_message));
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(88, 28, 135))
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
