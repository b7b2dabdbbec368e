//! Diagram rendering via the Kroki service.
//!
//! [`DiagramRenderer`] is the seam between the render plan and whatever
//! turns diagram source into markup. [`KrokiRenderer`] posts the source to
//! `<server>/<endpoint>/svg` and returns the SVG.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use ureq::Agent;

use crate::block::DiagramBlock;
use crate::consts::DEFAULT_TIMEOUT;
use crate::error::{DiagramError, DiagramErrorKind};

/// Google Fonts `@import` that mermaid emits into its SVG `<style>`.
static GOOGLE_FONTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@import\s+url\([^)]*fonts\.googleapis\.com[^)]*\)\s*;?")
        .expect("invalid google fonts regex")
});

/// Turns one diagram block into inline markup.
pub trait DiagramRenderer: Send + Sync {
    /// Render `block` to markup (an SVG document for Kroki).
    fn render(&self, block: &DiagramBlock) -> Result<String, DiagramError>;
}

/// Renders diagrams through a Kroki server.
#[derive(Debug, Clone)]
pub struct KrokiRenderer {
    agent: Agent,
    server_url: String,
    endpoint: String,
}

impl KrokiRenderer {
    /// Create a renderer for fences tagged `language`, talking to `server_url`.
    #[must_use]
    pub fn new(server_url: impl Into<String>, language: &str) -> Self {
        Self {
            agent: create_agent(DEFAULT_TIMEOUT),
            server_url: server_url.into().trim_end_matches('/').to_owned(),
            endpoint: kroki_endpoint(language),
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// URL the diagram source is posted to.
    #[must_use]
    pub fn render_url(&self) -> String {
        format!("{}/{}/svg", self.server_url, self.endpoint)
    }
}

impl DiagramRenderer for KrokiRenderer {
    fn render(&self, block: &DiagramBlock) -> Result<String, DiagramError> {
        let response = self
            .agent
            .post(&self.render_url())
            .header("Content-Type", "text/plain")
            .send(block.content.as_bytes())
            .map_err(|e| DiagramError::new(&block.id, DiagramErrorKind::Http(e.to_string())))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramError::new(
                &block.id,
                DiagramErrorKind::Http(format!("HTTP {status}: {error_body}")),
            ));
        }

        let svg = body
            .read_to_string()
            .map_err(|e| DiagramError::new(&block.id, DiagramErrorKind::Io(e.to_string())))?;

        Ok(strip_google_fonts_import(svg.trim()))
    }
}

/// HTTP agent with a global timeout. Error statuses are returned as
/// responses so their bodies can be reported.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Kroki endpoint for a fence language.
///
/// Accepts the `kroki-` prefixed form (`kroki-mermaid`) as well; `dot` is
/// an alias for `graphviz`.
fn kroki_endpoint(language: &str) -> String {
    let language = language.strip_prefix("kroki-").unwrap_or(language);
    match language.to_ascii_lowercase().as_str() {
        "dot" => "graphviz".to_owned(),
        other => other.to_owned(),
    }
}

fn strip_google_fonts_import(svg: &str) -> String {
    GOOGLE_FONTS_RE.replace_all(svg, "").into_owned()
}
