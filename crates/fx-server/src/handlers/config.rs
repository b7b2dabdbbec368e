//! Config API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/config.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigResponse {
    /// Whether the chat widget should be shown.
    chat_enabled: bool,
    /// First assistant message shown by the widget.
    greeting: &'static str,
}

/// Handle GET /api/config.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        chat_enabled: state.chat_enabled(),
        greeting: fx_chat::GREETING,
    })
}
