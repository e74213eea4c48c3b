//! # Library Component
//!
//! The start screen: the book list on the left, achievements and daily
//! quests on the right.
//!
//! `LibraryState` owns the selection and knows which entries are
//! interactive, so the event handler can emit `LibraryEvent::Open` without
//! the catalog at hand.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};

use super::badges::{
    difficulty_style, emblem_glyph, emblem_style, progress_bar, rarity_style, status_style,
};
use crate::core::catalog::{Achievement, Book, Catalog, Quest};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// Open the reading path of the selected book.
    Open(String),
}

pub struct LibraryState {
    list: ListState,
    /// Reading target per book, `None` for non-interactive entries.
    targets: Vec<Option<String>>,
}

impl LibraryState {
    pub fn new(catalog: &Catalog) -> Self {
        let targets: Vec<Option<String>> = catalog
            .books
            .iter()
            .map(|b| b.reading_target().map(str::to_string))
            .collect();
        // Start on the first book that can be opened
        let first = targets.iter().position(Option::is_some).unwrap_or(0);
        let selected = (!targets.is_empty()).then_some(first);
        Self {
            list: ListState::default().with_selected(selected),
            targets,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list.selected()
    }

    fn move_by(&mut self, delta: isize) {
        if self.targets.is_empty() {
            return;
        }
        let last = self.targets.len() - 1;
        let current = self.list.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.list.select(Some(next));
    }
}

impl EventHandler for LibraryState {
    type Event = LibraryEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<LibraryEvent> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.move_by(-1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.move_by(1);
                None
            }
            TuiEvent::Select => self
                .list
                .selected()
                .and_then(|i| self.targets.get(i).cloned().flatten())
                .map(LibraryEvent::Open),
            _ => None,
        }
    }
}

pub struct Library<'a> {
    pub catalog: &'a Catalog,
    pub state: &'a mut LibraryState,
}

impl Component for Library<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [books_area, side_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(area);

        let items: Vec<ListItem> = self.catalog.books.iter().map(book_item).collect();
        let list = List::new(items)
            .block(Block::bordered().title(" Library "))
            .highlight_style(Style::default().bg(Color::Rgb(59, 7, 100)))
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, books_area, &mut self.state.list);

        let [achievements_area, quests_area] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(side_area);

        let achievements: Vec<Line> = self
            .catalog
            .achievements
            .iter()
            .flat_map(achievement_lines)
            .collect();
        frame.render_widget(
            Paragraph::new(Text::from(achievements))
                .block(Block::bordered().title(" Achievements "))
                .wrap(Wrap { trim: false }),
            achievements_area,
        );

        let quests: Vec<Line> = self.catalog.quests.iter().flat_map(quest_lines).collect();
        frame.render_widget(
            Paragraph::new(Text::from(quests))
                .block(Block::bordered().title(" Daily Quests "))
                .wrap(Wrap { trim: false }),
            quests_area,
        );
    }
}

fn book_item(book: &Book) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut title = vec![Span::styled(
        book.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if book.legendary {
        title.insert(0, Span::styled("★ ", Style::default().fg(Color::Yellow)));
    }
    if let Some(subtitle) = &book.subtitle {
        title.push(Span::styled(format!(" ({subtitle})"), dim));
    }
    title.push(Span::styled(format!(" by {}", book.author), dim));

    let action_style = if book.reading_target().is_some() {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        dim
    };
    let details = Line::from(vec![
        Span::raw("  "),
        Span::styled(book.difficulty.label(), difficulty_style(book.difficulty)),
        Span::styled(" · ", dim),
        Span::styled(book.status.label(), status_style(book.status)),
        Span::styled(
            format!(
                " · {} {}% · ★ {:.1} · {} · +{} XP ",
                progress_bar(book.progress),
                book.progress,
                book.rating,
                book.time_to_complete,
                book.xp_reward
            ),
            dim,
        ),
        Span::styled(format!("[{}]", book.status.action_label()), action_style),
    ]);

    ListItem::new(Text::from(vec![Line::from(title), details, Line::default()]))
}

fn achievement_lines(achievement: &Achievement) -> Vec<Line<'static>> {
    let state = if achievement.earned {
        Span::styled("✓ earned", Style::default().fg(Color::Green))
    } else {
        let percent = achievement.progress.unwrap_or(0);
        Span::styled(
            format!("{} {}%", progress_bar(percent), percent),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", emblem_glyph(achievement.emblem)),
                emblem_style(achievement.emblem),
            ),
            Span::styled(
                achievement.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", achievement.rarity.label()),
                rarity_style(achievement.rarity),
            ),
        ]),
        Line::from(vec![
            Span::raw("  "),
            state,
            Span::styled(format!(" · +{} XP", achievement.xp), Style::default().fg(Color::DarkGray)),
        ]),
    ]
}

fn quest_lines(quest: &Quest) -> Vec<Line<'static>> {
    let status = if quest.is_complete() {
        Span::styled("✓ done", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            format!("{} {}%", progress_bar(quest.progress), quest.progress),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Line::from(vec![
            Span::styled(format!("{} ", emblem_glyph(quest.emblem)), emblem_style(quest.emblem)),
            Span::styled(quest.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" +{} XP", quest.xp), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![Span::raw("  "), status]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    #[test]
    fn test_starts_on_first_interactive_book() {
        let state = LibraryState::new(&catalog());
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_select_on_interactive_book_opens_it() {
        let mut state = LibraryState::new(&catalog());
        assert_eq!(
            state.handle_event(&TuiEvent::Select),
            Some(LibraryEvent::Open("/read/kant-kritik".to_string()))
        );
    }

    #[test]
    fn test_non_interactive_books_do_nothing() {
        let catalog = catalog();
        let mut state = LibraryState::new(&catalog);
        for (i, book) in catalog.books.iter().enumerate().skip(1) {
            state.handle_event(&TuiEvent::CursorDown);
            assert_eq!(state.selected(), Some(i));
            if book.reading_target().is_none() {
                assert_eq!(state.handle_event(&TuiEvent::Select), None);
            }
        }
    }

    #[test]
    fn test_cursor_clamps() {
        let catalog = catalog();
        let mut state = LibraryState::new(&catalog);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected(), Some(0));
        for _ in 0..20 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.selected(), Some(catalog.books.len() - 1));
    }

    #[test]
    fn test_empty_catalog() {
        let mut state = LibraryState::new(&Catalog::default());
        assert_eq!(state.selected(), None);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.handle_event(&TuiEvent::Select), None);
    }

    #[test]
    fn test_renders_books_and_side_panels() {
        let catalog = catalog();
        let mut state = LibraryState::new(&catalog);
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                Library {
                    catalog: &catalog,
                    state: &mut state,
                }
                .render(f, area);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Library"));
        assert!(text.contains("[Start]"));
        assert!(text.contains("Achievements"));
        assert!(text.contains("Daily Quests"));
    }
}
