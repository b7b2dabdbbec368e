//! Error types for the chat assistant.

/// Error from a chat completion call.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Chat is turned off or has no API key.
    #[error("chat is disabled")]
    Disabled,

    /// Request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream answered with an error status.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Response body is not the expected JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// Response holds no text.
    #[error("empty reply")]
    EmptyReply,
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Json(e.to_string())
    }
}

impl From<ureq::Error> for ChatError {
    fn from(e: ureq::Error) -> Self {
        ChatError::Transport(e.to_string())
    }
}
