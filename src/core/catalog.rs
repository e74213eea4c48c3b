//! # Library Catalog
//!
//! Books, achievements and daily quests shown on the library screen.
//! Loaded from `assets/library.json`, compiled into the binary.
//!
//! The figures here (progress, achievements, quest completion) are static
//! display values. They are not derived from the session's quiz score.

use serde::{Deserialize, Serialize};

use crate::core::content::ContentError;

const EMBEDDED_LIBRARY: &str = include_str!("../../assets/library.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Legendary,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
            Difficulty::Legendary => "Legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Reading,
    Completed,
    Paused,
}

impl BookStatus {
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Reading => "reading",
            BookStatus::Completed => "completed",
            BookStatus::Paused => "paused",
        }
    }

    /// Label of the button that acts on a book in this state.
    pub fn action_label(self) -> &'static str {
        match self {
            BookStatus::Available => "Start",
            BookStatus::Reading => "Continue",
            BookStatus::Completed => "Review",
            BookStatus::Paused => "Resume",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Pictogram category of an achievement or quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emblem {
    Book,
    Star,
    Clock,
    Trophy,
    Target,
    Zap,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Book {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub author: String,
    pub difficulty: Difficulty,
    /// Percent read, 0..=100.
    pub progress: u8,
    pub rating: f32,
    pub readers: u32,
    pub time_to_complete: String,
    pub xp_reward: u32,
    pub status: BookStatus,
    #[serde(default)]
    pub legendary: bool,
    #[serde(default)]
    pub reading_path: Option<String>,
}

impl Book {
    /// Where selecting this book leads. Only available books with a reading
    /// path are interactive.
    pub fn reading_target(&self) -> Option<&str> {
        match self.status {
            BookStatus::Available => self.reading_path.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Achievement {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub emblem: Emblem,
    pub earned: bool,
    #[serde(default)]
    pub progress: Option<u8>,
    pub rarity: Rarity,
    pub xp: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Quest {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub emblem: Emblem,
    pub progress: u8,
    pub xp: u32,
}

impl Quest {
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_LIBRARY)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        serde_json::from_str(json).map_err(ContentError::Parse)
    }
}
