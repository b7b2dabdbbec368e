//! Chat assistant for fxsite.
//!
//! A thin wrapper around a generative-language API with a fixed system
//! prompt. Every conversation is primed with the prompt and a model
//! acknowledgement before the visitor's history.
//!
//! Failures never reach the visitor: [`answer`] turns any error into
//! [`APOLOGY`]. There is no retry.

mod client;
mod error;
mod message;
mod prompt;

pub use client::ChatClient;
pub use error::ChatError;
pub use message::{ChatMessage, ChatRequest, Role};
pub use prompt::{APOLOGY, GREETING, PRIMING_ACK, SYSTEM_PROMPT};

/// A provider that continues a conversation.
pub trait ChatBackend: Send + Sync {
    /// Reply to `message` given the earlier `history`.
    fn complete(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError>;
}

/// Reply to `request`, or [`APOLOGY`] if the backend is missing or fails.
#[must_use]
pub fn answer(backend: Option<&dyn ChatBackend>, request: &ChatRequest) -> String {
    let Some(backend) = backend else {
        return APOLOGY.to_owned();
    };

    match backend.complete(&request.history, request.message.trim()) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "Chat request failed");
            APOLOGY.to_owned()
        }
    }
}
