//! Embedded asset serving under `/assets/`.

use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::state::AppState;

/// Router for `/assets/{*path}`.
pub(crate) fn static_router() -> Router<Arc<AppState>> {
    Router::new().route("/assets/{*path}", get(serve_asset))
}

async fn serve_asset(Path(path): Path<String>) -> Response {
    match fx_assets::get(&path) {
        Some(content) => (
            [
                (header::CONTENT_TYPE, fx_assets::mime_for(&path)),
                (header::CACHE_CONTROL, "public, max-age=3600".to_owned()),
            ],
            content.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
