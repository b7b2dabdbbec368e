//! Interactive page shell.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use fx_site::{ShellMode, render_page};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let html = tokio::task::spawn_blocking(move || -> Result<String, ServerError> {
        let source = state.site.raw_source()?;
        let page = state.site.page_for_source(&source)?;
        let mode = ShellMode::Interactive {
            source,
            chat_enabled: state.chat_enabled(),
        };
        Ok(render_page(&state.site_info, &page, &mode))
    })
    .await??;

    Ok(Html(html))
}
