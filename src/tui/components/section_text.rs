//! # SectionText Component
//!
//! The main reading pane: the current section's rendered content in the
//! selected language, wrapped to the pane width and scrollable.
//!
//! Content height is measured with `Paragraph::line_count` so the
//! `ScrollView` canvas is exactly as tall as the wrapped text.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::content::{Language, Section};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

#[derive(Default)]
pub struct SectionTextState {
    pub scroll_state: ScrollViewState,
    /// Wrapped content height from the last render
    content_height: u16,
    viewport_height: u16,
}

impl SectionTextState {
    /// Back to the top, used when the section or language changes.
    pub fn reset(&mut self) {
        self.scroll_state.scroll_to_top();
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Clamp scroll offset so it never runs past the end of the text.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for SectionTextState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => self.scroll_state.scroll_down(),
            TuiEvent::PageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        self.clamp_scroll();
        None
    }
}

pub struct SectionText<'a> {
    pub section: &'a Section,
    pub language: Language,
    pub focused: bool,
    pub state: &'a mut SectionTextState,
}

impl Component for SectionText<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", self.section.title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // -1 for the scrollbar
        let width = inner.width.saturating_sub(1);
        if width == 0 || inner.height == 0 {
            return;
        }

        let text = markdown::render(&self.section.render_content(self.language), Color::White);
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        let height = u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX);

        self.state.content_height = height;
        self.state.viewport_height = inner.height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, width, height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
