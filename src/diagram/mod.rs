//! # Diagram Rendering
//!
//! Sections may carry a mermaid flowchart. Turning that source into
//! something viewable is the one asynchronous job in a reading session, so
//! it sits behind a trait the TUI can spawn onto tokio.
//!
//! ```text
//! DiagramRenderer (trait)
//! ├── OutlineRenderer   // built in, parses edges into a text tree
//! └── KrokiRenderer     // POSTs to a Kroki server, saves the SVG
//! ```
//!
//! Requests carry a [`RenderTicket`]. The app only applies a result whose
//! ticket matches the latest request, so a slow render for a section the
//! reader already left can never overwrite the current one.

pub mod kroki;
pub mod outline;

pub use kroki::KrokiRenderer;
pub use outline::OutlineRenderer;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Artifacts & Requests
// ============================================================================

/// A rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramArtifact {
    /// Pre-formatted lines ready for display.
    Outline(Vec<String>),
    /// An SVG document written to disk.
    Svg { path: PathBuf, bytes: usize },
}

/// Identifies one render request. Generations only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub generation: u64,
    pub section_id: String,
}

/// What the adapter needs to run a render: the ticket to hand back and the
/// mermaid source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    pub ticket: RenderTicket,
    pub definition: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The definition is not a flowchart we can lay out.
    Syntax(String),
    /// Transport failure talking to a render server.
    Network(String),
    /// The render server answered with a non-success status.
    Api { status: u16, message: String },
    /// The server answered 2xx but the body is not an SVG.
    InvalidResponse(String),
    Io(String),
    TimedOut(Duration),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Syntax(msg) => write!(f, "diagram syntax error: {msg}"),
            RenderError::Network(msg) => write!(f, "network error: {msg}"),
            RenderError::Api { status, message } => {
                write!(f, "render API error (HTTP {status}): {message}")
            }
            RenderError::InvalidResponse(msg) => write!(f, "invalid render response: {msg}"),
            RenderError::Io(msg) => write!(f, "diagram I/O error: {msg}"),
            RenderError::TimedOut(d) => write!(f, "render timed out after {}s", d.as_secs()),
        }
    }
}

impl std::error::Error for RenderError {}

// ============================================================================
// Renderer Trait
// ============================================================================

#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Short name for logs and the status bar.
    fn name(&self) -> &str;

    /// Render a mermaid definition.
    async fn render(&self, definition: &str) -> Result<DiagramArtifact, RenderError>;
}

/// Which renderer to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Outline,
    Kroki,
}

impl RendererKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "outline" => Some(RendererKind::Outline),
            "kroki" => Some(RendererKind::Kroki),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Outline => "outline",
            RendererKind::Kroki => "kroki",
        }
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Colours passed to mermaid through an `%%{init}%%` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramTheme {
    pub primary_color: String,
    pub primary_text_color: String,
    pub primary_border_color: String,
    pub line_color: String,
    pub secondary_color: String,
    pub tertiary_color: String,
}

impl Default for DiagramTheme {
    fn default() -> Self {
        Self {
            primary_color: "#9333ea".to_string(),
            primary_text_color: "#1f2937".to_string(),
            primary_border_color: "#9333ea".to_string(),
            line_color: "#6b7280".to_string(),
            secondary_color: "#f3e8ff".to_string(),
            tertiary_color: "#fdf4ff".to_string(),
        }
    }
}

impl DiagramTheme {
    /// The `%%{init: ...}%%` line to prepend to a definition.
    pub fn init_directive(&self) -> String {
        let init = serde_json::json!({
            "theme": "default",
            "securityLevel": "loose",
            "themeVariables": self,
        });
        format!("%%{{init: {init}}}%%")
    }

    /// `definition` with this theme applied.
    pub fn apply(&self, definition: &str) -> String {
        format!("{}\n{}", self.init_directive(), definition.trim_start())
    }
}
