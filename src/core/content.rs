//! # Content Store
//!
//! The pre-authored work: an ordered, immutable list of sections, each with
//! German/English/Chinese text and optional study aids.
//!
//! ```text
//! ContentStore
//! ├── work: WorkMeta            // id, title, author, reading path
//! └── sections: Vec<Section>
//!     ├── translations          // en, de, zh (all required)
//!     ├── content               // markdown template with placeholders
//!     ├── insight               // English commentary
//!     ├── vocabulary            // term / definition / usage
//!     ├── diagram               // mermaid flowchart source
//!     └── quiz                  // questions with one correct option each
//! ```
//!
//! The default dataset is compiled into the binary from `assets/kritik.json`.
//! Every load goes through [`ContentStore::from_parts`], which validates the
//! whole dataset before anything can read it.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const EMBEDDED_WORK: &str = include_str!("../../assets/kritik.json");

/// Template used when a section does not carry its own `content`.
pub const DEFAULT_TEMPLATE: &str = "## {title}\n\n{text}";

/// Minimum number of answer options per quiz question.
pub const MIN_QUIZ_OPTIONS: usize = 2;

// ============================================================================
// Language
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Zh,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Zh => "zh",
        }
    }

    /// Name of the language in the language itself.
    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "Deutsch",
            Language::Zh => "中文",
        }
    }

    /// Parse a language code. Anything other than exactly `en`, `de` or
    /// `zh` is rejected.
    pub fn from_code(code: &str) -> Result<Self, UnsupportedLanguage> {
        match code {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            "zh" => Ok(Language::Zh),
            _ => Err(UnsupportedLanguage(code.to_string())),
        }
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub String);

impl fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language '{}' (expected en, de or zh)", self.0)
    }
}

impl std::error::Error for UnsupportedLanguage {}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Translations {
    pub en: String,
    pub de: String,
    pub zh: String,
}

impl Translations {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::De => &self.de,
            Language::Zh => &self.zh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VocabularyEntry {
    pub term: String,
    pub definition: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Diagram {
    pub title: String,
    pub description: String,
    /// Mermaid flowchart source, passed verbatim to the renderer.
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer_index
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub translations: Translations,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub insight: Option<String>,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyEntry>,
    #[serde(default)]
    pub diagram: Option<Diagram>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

impl Section {
    pub fn text(&self, language: Language) -> &str {
        self.translations.get(language)
    }

    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }

    pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.quiz.iter().find(|q| q.id == question_id)
    }

    /// Fill the section's markdown template for the given language.
    ///
    /// `{text}` becomes the selected language's text, `{translations.xx}` a
    /// specific language and `{title}` the section title. Unknown
    /// placeholders are left untouched.
    pub fn render_content(&self, language: Language) -> String {
        let template = self.content.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let mut out = String::with_capacity(template.len() + self.text(language).len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let resolved = tail
                .find('}')
                .and_then(|end| self.placeholder(&tail[1..end], language).map(|v| (end, v)));
            match resolved {
                Some((end, value)) => {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn placeholder(&self, key: &str, language: Language) -> Option<&str> {
        match key {
            "text" => Some(self.text(language)),
            "title" => Some(&self.title),
            _ => key
                .strip_prefix("translations.")
                .and_then(|code| Language::from_code(code).ok())
                .map(|lang| self.text(lang)),
        }
    }
}

/// Metadata for the work as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkMeta {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Library path that opens this work in the reader.
    pub reading_path: String,
}

#[derive(Deserialize)]
struct ContentDocument {
    work: WorkMeta,
    sections: Vec<Section>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ContentError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    DuplicateSection(String),
    MissingTranslation {
        section: String,
        language: Language,
    },
    DuplicateQuestion {
        section: String,
        question: String,
    },
    TooFewOptions {
        section: String,
        question: String,
    },
    AnswerOutOfRange {
        section: String,
        question: String,
        index: usize,
        options: usize,
    },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io(e) => write!(f, "content I/O error: {e}"),
            ContentError::Parse(e) => write!(f, "content parse error: {e}"),
            ContentError::Empty => write!(f, "content has no sections"),
            ContentError::DuplicateSection(id) => write!(f, "duplicate section id '{id}'"),
            ContentError::MissingTranslation { section, language } => {
                write!(f, "section '{section}' has no {} translation", language.label())
            }
            ContentError::DuplicateQuestion { section, question } => {
                write!(f, "section '{section}' repeats quiz question id '{question}'")
            }
            ContentError::TooFewOptions { section, question } => write!(
                f,
                "question '{question}' in section '{section}' needs at least {MIN_QUIZ_OPTIONS} options"
            ),
            ContentError::AnswerOutOfRange {
                section,
                question,
                index,
                options,
            } => write!(
                f,
                "question '{question}' in section '{section}' marks option {index} correct but has only {options} options"
            ),
        }
    }
}

impl std::error::Error for ContentError {}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug)]
pub struct ContentStore {
    work: WorkMeta,
    sections: Vec<Section>,
}

impl ContentStore {
    /// Load the dataset compiled into the binary.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_WORK)
    }

    /// Load a dataset from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = fs::read_to_string(path).map_err(ContentError::Io)?;
        let store = Self::from_json(&json)?;
        info!(
            "Loaded {} sections of '{}' from {}",
            store.len(),
            store.work.title,
            path.display()
        );
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let doc: ContentDocument = serde_json::from_str(json).map_err(ContentError::Parse)?;
        Self::from_parts(doc.work, doc.sections)
    }

    /// Build a store from already-parsed records, validating them first.
    pub fn from_parts(work: WorkMeta, sections: Vec<Section>) -> Result<Self, ContentError> {
        validate(&sections)?;
        debug!("Validated {} sections for '{}'", sections.len(), work.id);
        Ok(Self { work, sections })
    }

    pub fn work(&self) -> &WorkMeta {
        &self.work
    }

    /// Section at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn position_of(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }
}

fn validate(sections: &[Section]) -> Result<(), ContentError> {
    if sections.is_empty() {
        return Err(ContentError::Empty);
    }

    let mut section_ids = HashSet::new();
    for section in sections {
        if !section_ids.insert(section.id.as_str()) {
            return Err(ContentError::DuplicateSection(section.id.clone()));
        }

        for language in Language::ALL {
            if section.text(language).trim().is_empty() {
                return Err(ContentError::MissingTranslation {
                    section: section.id.clone(),
                    language,
                });
            }
        }

        let mut question_ids = HashSet::new();
        for question in &section.quiz {
            if !question_ids.insert(question.id.as_str()) {
                return Err(ContentError::DuplicateQuestion {
                    section: section.id.clone(),
                    question: question.id.clone(),
                });
            }
            if question.options.len() < MIN_QUIZ_OPTIONS {
                return Err(ContentError::TooFewOptions {
                    section: section.id.clone(),
                    question: question.id.clone(),
                });
            }
            if question.correct_answer_index >= question.options.len() {
                return Err(ContentError::AnswerOutOfRange {
                    section: section.id.clone(),
                    question: question.id.clone(),
                    index: question.correct_answer_index,
                    options: question.options.len(),
                });
            }
        }
    }
    Ok(())
}
