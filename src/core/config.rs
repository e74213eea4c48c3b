//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.kritik/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Values that fail to parse (an unknown language code, say) are logged and
//! replaced by the next layer down rather than aborting startup.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::content::Language;
use crate::diagram::RendererKind;
use crate::diagram::kroki::DEFAULT_KROKI_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KritikConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub diagram: DiagramConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_language: Option<String>,
    pub content_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DiagramConfig {
    pub renderer: Option<String>,
    pub kroki_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PreviewConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub site_label: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PREVIEW_BIND: &str = "127.0.0.1";
pub const DEFAULT_PREVIEW_PORT: u16 = 3000;
pub const DEFAULT_SITE_LABEL: &str = "philosophy.it.com";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub language: Language,
    /// `None` = use the dataset compiled into the binary.
    pub content_path: Option<PathBuf>,
    pub renderer: RendererKind,
    pub kroki_url: String,
    pub diagram_dir: PathBuf,
    pub render_timeout: Duration,
    pub preview_bind: String,
    pub preview_port: u16,
    pub site_label: String,
}

/// Values given on the command line. `None` = flag not given.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub language: Option<Language>,
    pub renderer: Option<RendererKind>,
    pub content_path: Option<PathBuf>,
    pub preview_bind: Option<String>,
    pub preview_port: Option<u16>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.kritik`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".kritik"))
}

/// Returns the path to `~/.kritik/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.kritik/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `KritikConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<KritikConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(KritikConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(KritikConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<KritikConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: KritikConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Kritik Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_language = "en"            # "en", "de" or "zh"   (env: KRITIK_LANGUAGE)
# content_path = "/path/to/work.json" # Replaces the built-in text (env: KRITIK_CONTENT)

# [diagram]
# renderer = "outline"               # "outline" or "kroki" (env: KRITIK_RENDERER)
# kroki_url = "https://kroki.io"     # (env: KROKI_URL)
# output_dir = "/home/me/.kritik/diagrams"
# timeout_secs = 10

# [preview]
# bind = "127.0.0.1"
# port = 3000                        # (env: KRITIK_PREVIEW_PORT)
# site_label = "philosophy.it.com"
"#;

/// Generates a commented-out default config file at the given path.
pub fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &KritikConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &KritikConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Language: CLI → env → config → default
    let language = cli
        .language
        .or_else(|| parse_layer("KRITIK_LANGUAGE", env("KRITIK_LANGUAGE"), parse_language))
        .or_else(|| {
            parse_layer(
                "general.default_language",
                config.general.default_language.clone(),
                parse_language,
            )
        })
        .unwrap_or_default();

    let content_path = cli
        .content_path
        .clone()
        .or_else(|| env("KRITIK_CONTENT").map(PathBuf::from))
        .or_else(|| config.general.content_path.clone());

    let renderer = cli
        .renderer
        .or_else(|| parse_layer("KRITIK_RENDERER", env("KRITIK_RENDERER"), parse_renderer))
        .or_else(|| {
            parse_layer(
                "diagram.renderer",
                config.diagram.renderer.clone(),
                parse_renderer,
            )
        })
        .unwrap_or_default();

    // Kroki URL: env → config → default
    let kroki_url = env("KROKI_URL")
        .or_else(|| config.diagram.kroki_url.clone())
        .unwrap_or_else(|| DEFAULT_KROKI_URL.to_string());

    let diagram_dir = config
        .diagram
        .output_dir
        .clone()
        .unwrap_or_else(default_diagram_dir);

    let timeout_secs = config
        .diagram
        .timeout_secs
        .filter(|&s| s > 0)
        .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS);

    let preview_bind = cli
        .preview_bind
        .clone()
        .or_else(|| config.preview.bind.clone())
        .unwrap_or_else(|| DEFAULT_PREVIEW_BIND.to_string());

    let preview_port = cli
        .preview_port
        .or_else(|| {
            parse_layer("KRITIK_PREVIEW_PORT", env("KRITIK_PREVIEW_PORT"), |s| {
                s.trim().parse::<u16>().ok()
            })
        })
        .or(config.preview.port)
        .unwrap_or(DEFAULT_PREVIEW_PORT);

    ResolvedConfig {
        language,
        content_path,
        renderer,
        kroki_url,
        diagram_dir,
        render_timeout: Duration::from_secs(timeout_secs),
        preview_bind,
        preview_port,
        site_label: config
            .preview
            .site_label
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_LABEL.to_string()),
    }
}

/// `~/.kritik/diagrams`, or the system temp dir when there is no home.
fn default_diagram_dir() -> PathBuf {
    config_dir()
        .map(|d| d.join("diagrams"))
        .unwrap_or_else(|| std::env::temp_dir().join("kritik-diagrams"))
}

fn parse_language(s: &str) -> Option<Language> {
    Language::from_code(s).ok()
}

fn parse_renderer(s: &str) -> Option<RendererKind> {
    RendererKind::from_name(s)
}

/// Parse one layer's raw value, warning when it is present but invalid.
fn parse_layer<T>(source: &str, raw: Option<String>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = raw?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!("Ignoring invalid value '{}' from {}", raw, source);
    }
    parsed
}
