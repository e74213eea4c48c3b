//! Glyphs and colours for catalog categories.
//!
//! Every mapping is an exhaustive `match`, so adding a variant to the
//! catalog fails to compile until it has a look here.

use ratatui::style::{Color, Modifier, Style};

use crate::core::catalog::{BookStatus, Difficulty, Emblem, Rarity};

pub fn emblem_glyph(emblem: Emblem) -> &'static str {
    match emblem {
        Emblem::Book => "▤",
        Emblem::Star => "★",
        Emblem::Clock => "◷",
        Emblem::Trophy => "♛",
        Emblem::Target => "◎",
        Emblem::Zap => "ϟ",
    }
}

pub fn emblem_style(emblem: Emblem) -> Style {
    let fg = match emblem {
        Emblem::Book => Color::Blue,
        Emblem::Star => Color::Yellow,
        Emblem::Clock => Color::Cyan,
        Emblem::Trophy => Color::LightYellow,
        Emblem::Target => Color::LightRed,
        Emblem::Zap => Color::LightMagenta,
    };
    Style::default().fg(fg)
}

pub fn rarity_style(rarity: Rarity) -> Style {
    match rarity {
        Rarity::Common => Style::default().fg(Color::Gray),
        Rarity::Rare => Style::default().fg(Color::Blue),
        Rarity::Epic => Style::default().fg(Color::Magenta),
        Rarity::Legendary => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    }
}

pub fn difficulty_style(difficulty: Difficulty) -> Style {
    match difficulty {
        Difficulty::Beginner => Style::default().fg(Color::Green),
        Difficulty::Intermediate => Style::default().fg(Color::Cyan),
        Difficulty::Advanced => Style::default().fg(Color::Yellow),
        Difficulty::Expert => Style::default().fg(Color::Red),
        Difficulty::Legendary => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    }
}

pub fn status_style(status: BookStatus) -> Style {
    match status {
        BookStatus::Available => Style::default().fg(Color::Green),
        BookStatus::Reading => Style::default().fg(Color::Cyan),
        BookStatus::Completed => Style::default().fg(Color::Blue),
        BookStatus::Paused => Style::default().fg(Color::DarkGray),
    }
}

/// Ten-cell progress bar, e.g. `███████░░░` for 70%.
pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)).div_ceil(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "░░░░░░░░░░");
        assert_eq!(progress_bar(45), "█████░░░░░");
        assert_eq!(progress_bar(100), "██████████");
        assert_eq!(progress_bar(250), "██████████");
    }

    #[test]
    fn test_every_emblem_has_a_distinct_glyph() {
        let emblems = [
            Emblem::Book,
            Emblem::Star,
            Emblem::Clock,
            Emblem::Trophy,
            Emblem::Target,
            Emblem::Zap,
        ];
        let mut glyphs: Vec<&str> = emblems.iter().map(|e| emblem_glyph(*e)).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), emblems.len());
    }
}
