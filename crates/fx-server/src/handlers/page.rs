//! Page API endpoints.
//!
//! Returns the rendered document as JSON with metadata, table of contents,
//! the render plan and the final HTML.

use std::sync::Arc;
use std::time::SystemTime;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use fx_diagrams::Fragment;
use fx_renderer::TocEntry;
use fx_site::RenderedPage;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::save::ContentRequest;
use crate::state::AppState;

/// Response for GET /api/page and POST /api/preview.
#[derive(Serialize)]
struct PageResponse {
    meta: PageMeta,
    toc: Vec<TocEntry>,
    fragments: Vec<FragmentResponse>,
    /// Rendered HTML content.
    content: String,
    warnings: Vec<String>,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    /// Front matter title, else the first H1.
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Last modification time (ISO 8601).
    last_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    vars: Option<serde_json::Value>,
}

/// Render-plan entry for serialization.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum FragmentResponse {
    Html { html: String },
    Diagram { id: String, source: String },
}

impl From<&Fragment> for FragmentResponse {
    fn from(fragment: &Fragment) -> Self {
        match fragment {
            Fragment::Html(html) => Self::Html { html: html.clone() },
            Fragment::Diagram(block) => Self::Diagram {
                id: block.id.clone(),
                source: block.content.clone(),
            },
        }
    }
}

impl PageResponse {
    fn new(page: &RenderedPage, last_modified: DateTime<Utc>) -> Self {
        let vars = if page.metadata.vars.is_empty() {
            None
        } else {
            serde_json::to_value(&page.metadata.vars).ok()
        };

        Self {
            meta: PageMeta {
                title: page.title.clone(),
                description: page.metadata.description.clone(),
                last_modified: last_modified.to_rfc3339(),
                vars,
            },
            toc: page.toc.clone(),
            fragments: page.fragments.iter().map(FragmentResponse::from).collect(),
            content: page.html.clone(),
            warnings: page.warnings.clone(),
        }
    }
}

/// Handle GET /api/page.
pub(crate) async fn get_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let (page, modified) = tokio::task::spawn_blocking({
        let state = Arc::clone(&state);
        move || -> Result<_, ServerError> {
            let page = state.site.current_page()?;
            let modified = std::fs::metadata(state.site.store().path())
                .and_then(|meta| meta.modified())
                .unwrap_or_else(|_| SystemTime::now());
            Ok((page, modified))
        }
    })
    .await??;

    if state.verbose {
        for warning in &page.warnings {
            tracing::warn!(warning = %warning, "Page render warning");
        }
    }

    let etag = compute_etag(env!("CARGO_PKG_VERSION"), &page.html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let last_modified: DateTime<Utc> = modified.into();
    let response = PageResponse::new(&page, last_modified);

    Ok((
        [
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                last_modified
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Handle POST /api/preview.
///
/// Renders the submitted source without saving or publishing it.
pub(crate) async fn post_preview(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(request) = body?;
    let source = request.content.unwrap_or_default();

    let page = tokio::task::spawn_blocking(move || state.site.render_source(&source)).await??;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(PageResponse::new(&page, Utc::now())),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 16 hex chars.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use fx_diagrams::DiagramBlock;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("0.1.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
        assert_ne!(etag, compute_etag("0.1.0", "other"));
        assert_ne!(etag, compute_etag("0.2.0", "content"));
    }

    #[test]
    fn test_fragment_serialization() {
        let html = serde_json::to_value(FragmentResponse::from(&Fragment::Html(
            "<h1>Title</h1>\n".to_owned(),
        )))
        .unwrap();
        let diagram = serde_json::to_value(FragmentResponse::from(&Fragment::Diagram(
            DiagramBlock {
                id: "diagram-0".to_owned(),
                content: "A->B".to_owned(),
            },
        )))
        .unwrap();

        assert_eq!(html, serde_json::json!({"type": "html", "html": "<h1>Title</h1>\n"}));
        assert_eq!(
            diagram,
            serde_json::json!({"type": "diagram", "id": "diagram-0", "source": "A->B"})
        );
    }

    #[test]
    fn test_page_meta_omits_empty_fields() {
        let meta = PageMeta {
            title: Some("Algo Trading".to_owned()),
            description: None,
            last_modified: "2026-01-01T00:00:00+00:00".to_owned(),
            vars: None,
        };

        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["title"], "Algo Trading");
        assert_eq!(json["lastModified"], "2026-01-01T00:00:00+00:00");
        assert!(json.get("description").is_none());
        assert!(json.get("vars").is_none());
    }
}
