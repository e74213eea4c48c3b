//! # StudyAids Component
//!
//! Tabbed side pane with the section's reading aids:
//!
//! ```text
//! ┌ Study Aids ──────────────────────────┐
//! │ Insight │ Vocabulary │ Diagram       │
//! │                                      │
//! │ Reason → Experience                  │
//! └──────────────────────────────────────┘
//! ```
//!
//! The diagram tab shows whatever the render pipeline produced for this
//! section: an outline, the path of a written SVG, a pending marker, or the
//! failure together with the raw definition.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::content::Section;
use crate::diagram::{DiagramArtifact, RenderError};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AidsTab {
    #[default]
    Insight,
    Vocabulary,
    Diagram,
}

impl AidsTab {
    const ALL: [AidsTab; 3] = [AidsTab::Insight, AidsTab::Vocabulary, AidsTab::Diagram];

    pub fn next(self) -> Self {
        match self {
            AidsTab::Insight => AidsTab::Vocabulary,
            AidsTab::Vocabulary => AidsTab::Diagram,
            AidsTab::Diagram => AidsTab::Insight,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AidsTab::Insight => "Insight",
            AidsTab::Vocabulary => "Vocabulary",
            AidsTab::Diagram => "Diagram",
        }
    }

    fn index(self) -> usize {
        match self {
            AidsTab::Insight => 0,
            AidsTab::Vocabulary => 1,
            AidsTab::Diagram => 2,
        }
    }
}

#[derive(Debug, Default)]
pub struct StudyAidsState {
    pub tab: AidsTab,
    scroll: u16,
}

impl StudyAidsState {
    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.scroll = 0;
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }
}

impl EventHandler for StudyAidsState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.scroll = self.scroll.saturating_sub(1),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll = self.scroll.saturating_add(1)
            }
            TuiEvent::PageUp => self.scroll = self.scroll.saturating_sub(5),
            TuiEvent::PageDown => self.scroll = self.scroll.saturating_add(5),
            _ => {}
        }
        None
    }
}

/// What the render pipeline knows about the current section's diagram.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramView<'a> {
    pub artifact: Option<&'a DiagramArtifact>,
    pub failure: Option<&'a RenderError>,
    pub pending: bool,
}

pub struct StudyAids<'a> {
    pub section: &'a Section,
    pub diagram: DiagramView<'a>,
    pub focused: bool,
    pub state: &'a mut StudyAidsState,
}

impl StudyAids<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        match self.state.tab {
            AidsTab::Insight => insight_lines(self.section),
            AidsTab::Vocabulary => vocabulary_lines(self.section),
            AidsTab::Diagram => diagram_lines(self.section, self.diagram),
        }
    }
}

impl Component for StudyAids<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Study Aids ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs_area, body_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

        let tabs = Tabs::new(AidsTab::ALL.iter().map(|t| t.title()))
            .select(self.state.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, tabs_area);

        let paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        let total = paragraph.line_count(body_area.width);
        let max_scroll = total.saturating_sub(usize::from(body_area.height));
        let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
        self.state.scroll = self.state.scroll.min(max_scroll);

        frame.render_widget(paragraph.scroll((self.state.scroll, 0)), body_area);
    }
}

fn placeholder(text: &str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))]
}

fn insight_lines(section: &Section) -> Vec<Line<'static>> {
    match &section.insight {
        Some(insight) => insight
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect(),
        None => placeholder("No insight for this section."),
    }
}

fn vocabulary_lines(section: &Section) -> Vec<Line<'static>> {
    if section.vocabulary.is_empty() {
        return placeholder("No vocabulary for this section.");
    }
    let term_width = section
        .vocabulary
        .iter()
        .map(|v| v.term.width())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for entry in &section.vocabulary {
        let pad = " ".repeat(term_width - entry.term.width());
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{pad}", entry.term),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(entry.definition.clone()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("{}  e.g. {}", " ".repeat(term_width), entry.usage),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn diagram_lines(section: &Section, view: DiagramView<'_>) -> Vec<Line<'static>> {
    let Some(diagram) = &section.diagram else {
        return placeholder("No diagram for this section.");
    };
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            diagram.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(diagram.description.clone(), dim)),
        Line::default(),
    ];

    match view.artifact {
        Some(DiagramArtifact::Outline(outline)) => {
            lines.extend(outline.iter().map(|l| Line::from(l.clone())));
        }
        Some(DiagramArtifact::Svg { path, bytes }) => {
            lines.push(Line::from(format!(
                "SVG written to {} ({bytes} bytes)",
                path.display()
            )));
        }
        None if view.pending => {
            lines.push(Line::from(Span::styled("Rendering…", dim)));
        }
        None => {}
    }

    if let Some(error) = view.failure {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Diagram unavailable: {error}"),
            Style::default().fg(Color::Red),
        )));
        if view.artifact.is_none() {
            lines.push(Line::from(Span::styled("Source:", dim)));
            lines.extend(
                diagram
                    .definition
                    .lines()
                    .map(|l| Line::from(Span::styled(format!("  {l}"), dim))),
            );
        }
    }
    lines
}
