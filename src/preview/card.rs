//! Social preview card: a 1200×630 SVG with the title, a description and
//! the site label.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ TITLE LINE ONE (60px bold, ≤ 40 chars)       │  40px padding
//! │ TITLE LINE TWO                               │  20px gap between lines
//! │ description (32px, #a1a1aa)                  │
//! │                                              │
//! │ philosophy.it.com (24px, #71717a)            │  40px from bottom
//! └──────────────────────────────────────────────┘
//! ```

use std::fmt::{self, Write};
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 630;

pub const DEFAULT_TITLE: &str = "Critique of Pure Reason Interactive Reader";
pub const DEFAULT_DESCRIPTION: &str =
    "An interactive trilingual reader featuring German, English, and Chinese translations";

/// Maximum title line length in characters.
pub const TITLE_WRAP: usize = 40;
const DESCRIPTION_WRAP: usize = 50;

const PADDING: u32 = 40;
const TITLE_FONT: u32 = 60;
const TITLE_LINE_HEIGHT: u32 = 72;
const TITLE_GAP: u32 = 20;
const DESCRIPTION_FONT: u32 = 32;
const DESCRIPTION_LINE_HEIGHT: u32 = 40;
const DESCRIPTION_MARGIN: u32 = 20;
const FOOTER_FONT: u32 = 24;
/// Text must end above this line to stay clear of the footer.
const CONTENT_BOTTOM: u32 = 550;

const FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";

#[derive(Debug)]
pub enum PreviewError {
    /// The wrapped title is taller than the card.
    Overflow { lines: usize, max_lines: usize },
    Render(fmt::Error),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewError::Overflow { lines, max_lines } => write!(
                f,
                "title wraps to {lines} lines but the card fits {max_lines}"
            ),
            PreviewError::Render(e) => write!(f, "failed to write SVG: {e}"),
        }
    }
}

impl std::error::Error for PreviewError {}

impl From<fmt::Error> for PreviewError {
    fn from(e: fmt::Error) -> Self {
        PreviewError::Render(e)
    }
}

/// A title word measured in characters, so CJK titles get the same
/// 40-character budget as Latin ones.
#[derive(Debug)]
struct Word<'a> {
    text: &'a str,
    chars: usize,
}

impl Fragment for Word<'_> {
    fn width(&self) -> f64 {
        self.chars as f64
    }

    fn whitespace_width(&self) -> f64 {
        1.0
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Greedy word wrap counting characters. Words are never split; a word
/// longer than `width` sits alone on its line.
pub fn wrap_title(title: &str, width: usize) -> Vec<String> {
    let words: Vec<Word<'_>> = title
        .split_whitespace()
        .map(|text| Word {
            text,
            chars: text.chars().count(),
        })
        .collect();
    wrap_first_fit(&words, &[width as f64])
        .into_iter()
        .map(|line| {
            line.iter()
                .map(|word| word.text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// How many title lines fit above [`CONTENT_BOTTOM`].
pub fn max_title_lines() -> usize {
    // n lines take n * height + (n - 1) * gap
    ((CONTENT_BOTTOM - PADDING + TITLE_GAP) / (TITLE_LINE_HEIGHT + TITLE_GAP)) as usize
}

/// Text shown on a card. Empty or missing fields use the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub description: String,
}

impl CardText {
    pub fn new(title: Option<&str>, description: Option<&str>) -> Self {
        let pick = |value: Option<&str>, default: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            title: pick(title, DEFAULT_TITLE),
            description: pick(description, DEFAULT_DESCRIPTION),
        }
    }
}

impl Default for CardText {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Lay out the card as an SVG document.
///
/// Description lines that would run into the footer are dropped, the last
/// kept line ending in `…`. A title that does not fit is an error.
pub fn compose(text: &CardText, site_label: &str) -> Result<String, PreviewError> {
    let title_lines = wrap_title(&text.title, TITLE_WRAP);
    let max_lines = max_title_lines();
    if title_lines.len() > max_lines {
        return Err(PreviewError::Overflow {
            lines: title_lines.len(),
            max_lines,
        });
    }

    let mut svg = String::with_capacity(2048);
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    )?;
    writeln!(
        svg,
        r##"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#1a1a1a"/><stop offset="1" stop-color="#2a2a2a"/></linearGradient></defs>"##
    )?;
    writeln!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="url(#bg)"/>"#)?;

    let mut top = PADDING;
    for (i, line) in title_lines.iter().enumerate() {
        if i > 0 {
            top += TITLE_GAP;
        }
        writeln!(
            svg,
            r##"<text x="{PADDING}" y="{}" font-family="{FONT_FAMILY}" font-size="{TITLE_FONT}" font-weight="bold" fill="#ffffff">{}</text>"##,
            top + baseline(TITLE_LINE_HEIGHT),
            escape(line)
        )?;
        top += TITLE_LINE_HEIGHT;
    }

    top += DESCRIPTION_MARGIN;
    let room = (CONTENT_BOTTOM.saturating_sub(top) / DESCRIPTION_LINE_HEIGHT) as usize;
    for line in fit_description(&text.description, room) {
        writeln!(
            svg,
            r##"<text x="{PADDING}" y="{}" font-family="{FONT_FAMILY}" font-size="{DESCRIPTION_FONT}" fill="#a1a1aa">{}</text>"##,
            top + baseline(DESCRIPTION_LINE_HEIGHT),
            escape(&line)
        )?;
        top += DESCRIPTION_LINE_HEIGHT;
    }

    writeln!(
        svg,
        r##"<text x="{PADDING}" y="{}" font-family="{FONT_FAMILY}" font-size="{FOOTER_FONT}" fill="#71717a">{}</text>"##,
        HEIGHT - PADDING,
        escape(site_label)
    )?;
    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Baseline offset within a line box.
fn baseline(line_height: u32) -> u32 {
    line_height * 4 / 5
}

fn fit_description(description: &str, room: usize) -> Vec<String> {
    let mut lines = wrap_title(description, DESCRIPTION_WRAP);
    if lines.len() > room {
        lines.truncate(room);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
