//! Markdown → ratatui `Text` for section passages.
//!
//! Passages are authored as light markdown: headings for part titles,
//! emphasis for Kant's own stresses, block quotes for cited lines, lists for
//! enumerated theses, and the occasional fenced block. Anything else
//! (HTML, footnote definitions, math) is dropped.
//!
//! Nesting is tracked with a stack of [`Container`]s. Each container may
//! contribute a gutter to every line emitted inside it, so a list inside a
//! quote gets `│ ` before its bullet.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const RULE_WIDTH: usize = 40;

/// Render `source` with `base_fg` as the body colour.
pub fn render(source: &str, base_fg: Color) -> Text<'static> {
    let mut renderer = Renderer::new(base_fg);
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
        renderer.event(event);
    }
    Text::from(renderer.lines)
}

enum Container {
    Quote,
    Fence,
    /// `None` for bullets, otherwise the next ordinal.
    List(Option<u64>),
}

impl Container {
    fn gutter(&self) -> Option<Span<'static>> {
        match self {
            Container::Quote | Container::Fence => Some(Span::styled("│ ", muted())),
            Container::List(_) => None,
        }
    }
}

struct Renderer {
    lines: Vec<Line<'static>>,
    base: Style,
    inline: Vec<Style>,
    containers: Vec<Container>,
    /// A block ended and the next one should be separated by a blank line.
    gap: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base: Style::default().fg(base_fg),
            inline: Vec::new(),
            containers: Vec::new(),
            gap: false,
        }
    }

    fn current_style(&self) -> Style {
        self.inline.last().copied().unwrap_or(self.base)
    }

    fn with_style(&mut self, overlay: Style) {
        let style = self.current_style().patch(overlay);
        self.inline.push(style);
    }

    fn in_fence(&self) -> bool {
        matches!(self.containers.last(), Some(Container::Fence))
    }

    /// Start a fresh line carrying the gutters of every open container.
    fn new_line(&mut self) {
        let spans: Vec<Span<'static>> = self
            .containers
            .iter()
            .filter_map(Container::gutter)
            .collect();
        self.lines.push(Line::from(spans));
    }

    fn append(&mut self, span: Span<'static>) {
        if self.lines.is_empty() {
            self.new_line();
        }
        if let Some(line) = self.lines.last_mut() {
            line.push_span(span);
        }
    }

    fn begin_block(&mut self) {
        if std::mem::take(&mut self.gap) {
            self.new_line();
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.append(Span::styled(
                code.into_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.begin_block();
                self.new_line();
                self.append(Span::styled("─".repeat(RULE_WIDTH), muted()));
                self.gap = true;
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.begin_block();
                self.new_line();
            }
            Tag::Heading { level, .. } => {
                self.begin_block();
                self.new_line();
                self.with_style(heading(level, self.base));
            }
            Tag::BlockQuote(_) => {
                self.begin_block();
                self.containers.push(Container::Quote);
                self.with_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.begin_block();
                self.containers.push(Container::Fence);
            }
            Tag::List(first) => {
                if !self.containers.iter().any(|c| matches!(c, Container::List(_))) {
                    self.begin_block();
                }
                self.containers.push(Container::List(first));
            }
            Tag::Item => self.item(),
            Tag::Emphasis => self.with_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.with_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.with_style(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { .. } => self.with_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.gap = true,
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.containers.pop();
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::CodeBlock | TagEnd::List(_) => {
                self.containers.pop();
                self.gap = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.inline.pop();
            }
            _ => {}
        }
    }

    fn item(&mut self) {
        self.new_line();
        let depth = self
            .containers
            .iter()
            .filter(|c| matches!(c, Container::List(_)))
            .count()
            .saturating_sub(1);
        let marker = match self.containers.last_mut() {
            Some(Container::List(Some(n))) => {
                let marker = format!("{}{n}. ", "  ".repeat(depth));
                *n += 1;
                marker
            }
            Some(Container::List(None)) => format!("{}• ", "  ".repeat(depth)),
            _ => return,
        };
        self.append(Span::styled(marker, muted()));
    }

    fn text(&mut self, raw: &str) {
        // ratatui gives tabs zero width
        let text = raw.replace('\t', "    ");
        if self.in_fence() {
            let code = Style::default().fg(Color::White);
            for code_line in text.lines() {
                self.new_line();
                self.append(Span::styled(code_line.to_owned(), code));
            }
        } else {
            let style = self.current_style();
            self.append(Span::styled(text, style));
        }
    }
}

fn heading(level: HeadingLevel, base: Style) -> Style {
    match level {
        HeadingLevel::H1 => base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        _ => base.add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}
