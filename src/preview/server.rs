//! HTTP endpoint serving preview cards.
//!
//! - `GET /opengraph-image?title=&description=` → `image/svg+xml`
//! - `GET /healthz` → `ok`
//!
//! Routing is a pure function ([`route`]) so it can be tested without a
//! socket; [`PreviewServer`] only moves requests and responses.

use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server};

use super::card::{self, CardText};

pub const IMAGE_PATH: &str = "/opengraph-image";
pub const HEALTH_PATH: &str = "/healthz";
pub const FAILURE_BODY: &str = "Failed to generate image";
/// Cards are deterministic, so clients may keep them for an hour.
pub const CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cacheable: bool,
    pub body: String,
}

impl PreviewResponse {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            cacheable: false,
            body: body.to_string(),
        }
    }

    fn svg(body: String) -> Self {
        Self {
            status: 200,
            content_type: "image/svg+xml",
            cacheable: true,
            body,
        }
    }
}

/// Answer one request. `url` is the raw request target (path + query).
pub fn route(method: &str, url: &str, site_label: &str) -> PreviewResponse {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        ("GET", IMAGE_PATH) => {
            let (title, description) = query_text(url);
            let text = CardText::new(title.as_deref(), description.as_deref());
            match card::compose(&text, site_label) {
                Ok(svg) => PreviewResponse::svg(svg),
                Err(e) => {
                    error!("Preview card failed for title {:?}: {}", text.title, e);
                    PreviewResponse::text(500, FAILURE_BODY)
                }
            }
        }
        ("GET", HEALTH_PATH) => PreviewResponse::text(200, "ok"),
        (_, IMAGE_PATH) | (_, HEALTH_PATH) => PreviewResponse::text(405, "method not allowed"),
        _ => PreviewResponse::text(404, "not found"),
    }
}

/// `title` and `description` from the query string, percent-decoded.
fn query_text(url: &str) -> (Option<String>, Option<String>) {
    let Ok(parsed) = reqwest::Url::parse(&format!("http://localhost{url}")) else {
        return (None, None);
    };
    let mut title = None;
    let mut description = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "title" if title.is_none() => title = Some(value.into_owned()),
            "description" if description.is_none() => description = Some(value.into_owned()),
            _ => {}
        }
    }
    (title, description)
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

// ============================================================================
// Server
// ============================================================================

pub struct PreviewServer {
    server: Arc<Server>,
    site_label: String,
}

/// A server running on a background thread.
pub struct PreviewHandle {
    addr: Option<SocketAddr>,
    server: Arc<Server>,
    thread: JoinHandle<()>,
}

impl PreviewServer {
    /// Bind to `addr` (`host:port`; port 0 picks a free one).
    pub fn bind(addr: &str, site_label: impl Into<String>) -> std::io::Result<Self> {
        let server = Server::http(addr).map_err(std::io::Error::other)?;
        let this = Self {
            server: Arc::new(server),
            site_label: site_label.into(),
        };
        match this.local_addr() {
            Some(local) => info!("Preview server listening on http://{}", local),
            None => info!("Preview server listening on {}", addr),
        }
        Ok(this)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Handle requests until the server is unblocked.
    pub fn serve(&self) {
        for request in self.server.incoming_requests() {
            let method = request.method().to_string();
            let url = request.url().to_string();
            let reply = route(&method, &url, &self.site_label);
            debug!("{} {} -> {}", method, url, reply.status);

            let mut response = Response::from_string(reply.body).with_status_code(reply.status);
            if let Some(h) = header("Content-Type", reply.content_type) {
                response = response.with_header(h);
            }
            if reply.cacheable
                && let Some(h) = header("Cache-Control", CACHE_CONTROL)
            {
                response = response.with_header(h);
            }
            if let Err(e) = request.respond(response) {
                warn!("Failed to send preview response: {}", e);
            }
        }
        info!("Preview server stopped");
    }

    pub fn spawn(self) -> PreviewHandle {
        let addr = self.local_addr();
        let server = Arc::clone(&self.server);
        let thread = thread::spawn(move || self.serve());
        PreviewHandle {
            addr,
            server,
            thread,
        }
    }
}

impl PreviewHandle {
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Stop accepting requests and wait for the thread to finish.
    pub fn shutdown(self) {
        self.server.unblock();
        if self.thread.join().is_err() {
            warn!("Preview server thread panicked");
        }
    }
}
