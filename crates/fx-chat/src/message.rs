//! Conversation types exchanged with the browser widget.

use serde::{Deserialize, Serialize};

/// Author of a chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Accepts `model` as well, the upstream name for this role.
    #[serde(alias = "model")]
    Assistant,
}

/// One turn of the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// New user message.
    #[serde(default)]
    pub message: String,
    /// Earlier turns, oldest first, greeting excluded.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}
