//! Save endpoint.
//!
//! Accepts `{"content": "..."}` and overwrites the document verbatim.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use fx_site::{DocumentError, SiteError};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ServerError;
use crate::state::AppState;

/// Body of the save and preview endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContentRequest {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

/// Handle POST /api/save-markdown.
pub(crate) async fn save_markdown(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<Value>, ServerError> {
    let Json(request) = body?;
    let content = match request.content {
        Some(content) if !content.is_empty() => content,
        _ => return Err(ServerError::ContentRequired),
    };

    match tokio::task::spawn_blocking(move || state.site.save(&content)).await? {
        Ok(_) => {}
        Err(e @ SiteError::Document(DocumentError::Write { .. })) => {
            return Err(ServerError::Save(e));
        }
        Err(e) => tracing::warn!(error = %e, "Saved document does not render"),
    }

    Ok(Json(json!({"message": "Content saved successfully"})))
}

/// Any method other than POST on the save route.
pub(crate) async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}
