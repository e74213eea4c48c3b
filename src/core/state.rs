//! # Application State
//!
//! Core business state for a reading session. This module contains domain
//! logic only, no TUI-specific types. Presentation state lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── store: Arc<ContentStore>   // the work being read (immutable)
//! ├── catalog: Catalog           // library screen entries
//! ├── navigator: Navigator       // section index + language
//! ├── quizzes: QuizBook          // per-section quiz attempts
//! ├── score: Score               // XP earned this session
//! ├── screen: Screen             // library or reader
//! ├── status_message: String     // status bar text
//! └── diagrams: DiagramSlot      // rendered diagrams + in-flight ticket
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::catalog::Catalog;
use crate::core::config::ResolvedConfig;
use crate::core::content::{ContentStore, Language, Section};
use crate::core::navigation::Navigator;
use crate::core::quiz::{QuizAttempt, QuizBook};
use crate::core::score::Score;
use crate::diagram::{DiagramArtifact, RenderError, RenderTicket};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Library,
    Reader,
}

// ============================================================================
// Diagram Slot
// ============================================================================

/// Rendered diagrams per section, plus the one render currently allowed to
/// land.
///
/// Every [`begin`](DiagramSlot::begin) bumps the generation. A result is only
/// accepted when its ticket equals the pending one, so superseded renders
/// are dropped no matter when they finish.
#[derive(Debug, Default)]
pub struct DiagramSlot {
    generation: u64,
    pending: Option<RenderTicket>,
    rendered: HashMap<String, DiagramArtifact>,
    failures: HashMap<String, RenderError>,
}

impl DiagramSlot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a render for `section_id`, invalidating any earlier ticket.
    pub fn begin(&mut self, section_id: &str) -> RenderTicket {
        self.generation += 1;
        let ticket = RenderTicket {
            generation: self.generation,
            section_id: section_id.to_string(),
        };
        self.failures.remove(section_id);
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Invalidate the pending render without starting a new one.
    pub fn supersede(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    /// Store a render result. Returns false (and changes nothing) when the
    /// ticket is stale. A failure never removes an earlier artifact.
    pub fn apply(&mut self, ticket: RenderTicket, result: Result<DiagramArtifact, RenderError>) -> bool {
        if self.pending.as_ref() != Some(&ticket) {
            debug!(
                "Dropping stale diagram result for '{}' (generation {}, current {})",
                ticket.section_id, ticket.generation, self.generation
            );
            return false;
        }
        self.pending = None;
        match result {
            Ok(artifact) => {
                self.failures.remove(&ticket.section_id);
                self.rendered.insert(ticket.section_id, artifact);
            }
            Err(e) => {
                self.failures.insert(ticket.section_id, e);
            }
        }
        true
    }

    pub fn artifact(&self, section_id: &str) -> Option<&DiagramArtifact> {
        self.rendered.get(section_id)
    }

    pub fn failure(&self, section_id: &str) -> Option<&RenderError> {
        self.failures.get(section_id)
    }

    pub fn is_pending(&self, section_id: &str) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|t| t.section_id == section_id)
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub store: Arc<ContentStore>,
    pub catalog: Catalog,
    pub navigator: Navigator,
    pub quizzes: QuizBook,
    pub score: Score,
    pub screen: Screen,
    pub status_message: String,
    pub diagrams: DiagramSlot,
}

impl App {
    pub fn new(store: Arc<ContentStore>, catalog: Catalog, language: Language) -> Self {
        let navigator = Navigator::for_store(&store, language);
        Self {
            store,
            catalog,
            navigator,
            quizzes: QuizBook::new(),
            score: Score::new(),
            screen: Screen::Library,
            status_message: String::from("Welcome to Kritik!"),
            diagrams: DiagramSlot::default(),
        }
    }

    pub fn from_config(store: Arc<ContentStore>, catalog: Catalog, config: &ResolvedConfig) -> Self {
        Self::new(store, catalog, config.language)
    }

    pub fn language(&self) -> Language {
        self.navigator.language()
    }

    pub fn current_section(&self) -> &Section {
        self.navigator.current(&self.store)
    }

    /// The current section's quiz attempt, if the reader has touched it.
    pub fn current_attempt(&self) -> Option<&QuizAttempt> {
        self.quizzes.attempt(&self.current_section().id)
    }

    pub fn open_reader(&mut self) {
        self.screen = Screen::Reader;
    }
}
