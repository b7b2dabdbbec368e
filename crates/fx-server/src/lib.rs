//! HTTP server for fxsite.
//!
//! Serves the interactive page, the JSON API used by the editor and the
//! chat widget, and the embedded stylesheet and script.
//!
//! # Quick Start
//!
//! ```ignore
//! use fx_config::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None, None).unwrap();
//!     fx_server::run_server(&config, false).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (fx-server)
//!                        │
//!                        ├─► GET /            ─► Site + render_page
//!                        ├─► /api/page        ─► Site::current_page
//!                        ├─► /api/preview     ─► Site::render_source
//!                        ├─► /api/save-markdown ─► Site::save
//!                        ├─► /api/chat        ─► fx_chat::answer
//!                        └─► /assets/*        ─► fx-assets
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use fx_config::Config;
use state::AppState;

pub use error::ServerError;

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the site cannot be built or the listener fails.
pub async fn run_server(config: &Config, verbose: bool) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_config(config, verbose)?);
    tracing::info!(
        content = %state.site.store().path().display(),
        chat = state.chat_enabled(),
        "Site ready"
    );

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.server.host, config.server.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
