//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: Top status bar with position, language, XP and status
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that pair props with a persistent state struct and emit
//! events:
//! - `Library`: Book list with achievements and quests
//! - `SectionText`: Scrollable reading pane
//! - `StudyAids`: Insight, vocabulary and diagram tabs
//! - `QuizPanel`: Question list with an option cursor
//!
//! ### Co-location of Concerns
//!
//! Each component file contains its state type, event type, rendering logic,
//! event handling and tests.
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into `App`. This makes dependencies explicit and components
//! testable with a `TestBackend`.
//!
//! ```rust,ignore
//! SectionText {
//!     section: app.current_section(),
//!     language: app.language(),
//!     focused: true,
//!     state: &mut tui.text,
//! }
//! .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── badges.rs        (Glyphs and colours for catalog categories)
//! ├── title_bar.rs     (Top status bar)
//! ├── library.rs       (Start screen)
//! ├── section_text.rs  (Reading pane)
//! ├── study_aids.rs    (Insight / vocabulary / diagram tabs)
//! └── quiz_panel.rs    (Quiz questions)
//! ```

mod badges;
mod title_bar;
pub use title_bar::TitleBar;

pub mod library;
pub use library::{Library, LibraryEvent, LibraryState};
pub mod quiz_panel;
pub use quiz_panel::{QuizEvent, QuizPanel, QuizPanelState};
pub mod section_text;
pub use section_text::{SectionText, SectionTextState};
pub mod study_aids;
pub use study_aids::{AidsTab, DiagramView, StudyAids, StudyAidsState};
