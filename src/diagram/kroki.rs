//! Kroki renderer: sends the themed definition to a Kroki server
//! (`POST {base_url}/mermaid/svg`) and stores the returned SVG on disk.
//!
//! Files are named by a hash of the themed source, so re-rendering the same
//! diagram overwrites the same file.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use super::{DiagramArtifact, DiagramRenderer, DiagramTheme, RenderError};

pub const DEFAULT_KROKI_URL: &str = "https://kroki.io";

pub struct KrokiRenderer {
    base_url: String,
    output_dir: PathBuf,
    theme: DiagramTheme,
    client: reqwest::Client,
}

impl KrokiRenderer {
    pub fn new(base_url: impl Into<String>, output_dir: impl Into<PathBuf>, theme: DiagramTheme) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
            theme,
            client: reqwest::Client::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn file_name(source: &str) -> String {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        format!("{:016x}.svg", hasher.finish())
    }
}

#[async_trait]
impl DiagramRenderer for KrokiRenderer {
    fn name(&self) -> &str {
        "kroki"
    }

    async fn render(&self, definition: &str) -> Result<DiagramArtifact, RenderError> {
        let source = self.theme.apply(definition);
        let url = format!("{}/mermaid/svg", self.base_url);
        info!("Kroki render request: url={}, source_len={}", url, source.len());

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(source.clone())
            .send()
            .await
            .map_err(|e| RenderError::Network(e.to_string()))?;

        debug!("Kroki response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Kroki API error: {} - {}", status, message);
            return Err(RenderError::Api { status, message });
        }

        let svg = response
            .text()
            .await
            .map_err(|e| RenderError::Network(e.to_string()))?;
        if !svg.contains("<svg") {
            return Err(RenderError::InvalidResponse(format!(
                "expected an SVG document, got {} bytes without <svg>",
                svg.len()
            )));
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| RenderError::Io(e.to_string()))?;
        let path = self.output_dir.join(Self::file_name(&source));
        tokio::fs::write(&path, svg.as_bytes())
            .await
            .map_err(|e| RenderError::Io(e.to_string()))?;

        info!("Kroki diagram saved: {} ({} bytes)", path.display(), svg.len());
        Ok(DiagramArtifact::Svg {
            path,
            bytes: svg.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let renderer = KrokiRenderer::new("http://localhost:8000/", "/tmp", DiagramTheme::default());
        assert_eq!(renderer.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_file_name_is_stable_per_source() {
        let a = KrokiRenderer::file_name("graph TB\n A --> B");
        assert_eq!(a, KrokiRenderer::file_name("graph TB\n A --> B"));
        assert_ne!(a, KrokiRenderer::file_name("graph TB\n A --> C"));
        assert!(a.ends_with(".svg"));
        assert_eq!(a.len(), 20);
    }
}
