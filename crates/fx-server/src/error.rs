//! Error types for the HTTP server.

use std::io;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fx_site::{DocumentError, SiteError};
use serde_json::json;

/// Server error type.
///
/// Every variant is rendered as `{"message": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Save request without content.
    #[error("Content is required")]
    ContentRequired,

    /// Chat request without a message.
    #[error("Message is required")]
    MessageRequired,

    /// Body is not the expected JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Document could not be written.
    #[error("Failed to save content")]
    Save(#[source] SiteError),

    /// Document could not be read or rendered.
    #[error("Render error: {0}")]
    Render(#[from] SiteError),

    /// Blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Listener could not be bound or served.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Host and port do not form a socket address.
    #[error("Invalid address: {0}")]
    Address(#[from] std::net::AddrParseError),
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::ContentRequired | Self::MessageRequired | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Render(SiteError::Document(DocumentError::Read { source, .. }))
                if source.kind() == io::ErrorKind::NotFound =>
            {
                StatusCode::NOT_FOUND
            }
            Self::Save(_) | Self::Render(_) | Self::Task(_) | Self::Io(_) | Self::Address(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Save(source) => tracing::error!(error = %source, "Error saving file"),
            _ if status.is_server_error() => tracing::error!(error = %self, "Request failed"),
            _ => {}
        }

        (status, axum::Json(json!({"message": self.to_string()}))).into_response()
    }
}
