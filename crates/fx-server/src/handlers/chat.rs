//! Chat endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use fx_chat::ChatRequest;
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for POST /api/chat.
#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    reply: String,
}

/// Handle POST /api/chat.
///
/// Upstream failures are answered with the apology text, never an error status.
pub(crate) async fn post_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(request) = body?;
    if request.message.trim().is_empty() {
        return Err(ServerError::MessageRequired);
    }

    let reply =
        tokio::task::spawn_blocking(move || fx_chat::answer(state.chat.as_deref(), &request))
            .await?;

    Ok(Json(ChatResponse { reply }))
}
