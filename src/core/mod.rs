//! # Core Application Logic
//!
//! This module contains the reader's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Content (sections)   │
//!                    │  • Navigation, Quiz     │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Preview   │
//!     │  Adapter   │                          │   server   │
//!     │ (ratatui)  │                          │ (tiny_http)│
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`content`]: Sections, languages and the validated `ContentStore`
//! - [`navigation`]: Clamped section index and selected language
//! - [`quiz`]: Per-section quiz attempts and grading
//! - [`score`]: Session XP
//! - [`catalog`]: Library books, achievements and quests
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Layered configuration

pub mod action;
pub mod catalog;
pub mod config;
pub mod content;
pub mod navigation;
pub mod quiz;
pub mod score;
pub mod state;
