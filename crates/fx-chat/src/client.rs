//! Gemini `generateContent` client.
//!
//! Sync HTTP client over `ureq`; the server runs it on the blocking pool.

use std::fmt;
use std::time::Duration;

use fx_config::ChatConfig;
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::ChatBackend;
use crate::error::ChatError;
use crate::message::{ChatMessage, Role};
use crate::prompt::{PRIMING_ACK, SYSTEM_PROMPT};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn new(role: Role, text: &'a str) -> Self {
        let role = match role {
            Role::User => "user",
            Role::Assistant => "model",
        };
        Self {
            role,
            parts: [Part { text }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, ChatError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }
        Ok(text)
    }
}

/// Chat client for the generative-language API.
pub struct ChatClient {
    agent: Agent,
    api_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a client for `model` at `api_url`.
    #[must_use]
    pub fn new(api_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            agent: create_agent(Duration::from_secs(DEFAULT_TIMEOUT)),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Create a client from the `[chat]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Disabled`] if chat is off or no API key is set.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| config.enabled && !key.is_empty())
            .ok_or(ChatError::Disabled)?;

        let mut client = Self::new(&config.api_url, api_key, config.model.as_str())
            .with_timeout(config.timeout());
        if let Some(prompt) = &config.system_prompt {
            client = client.with_system_prompt(prompt.as_str());
        }
        Ok(client)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Replace the built-in system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    /// Conversation sent upstream: system prompt, acknowledgement, history,
    /// then the new message.
    fn contents<'a>(&'a self, history: &'a [ChatMessage], message: &'a str) -> Vec<Content<'a>> {
        let mut contents = Vec::with_capacity(history.len() + 3);
        contents.push(Content::new(Role::User, &self.system_prompt));
        contents.push(Content::new(Role::Assistant, PRIMING_ACK));
        contents.extend(
            history
                .iter()
                .map(|turn| Content::new(turn.role, &turn.content)),
        );
        contents.push(Content::new(Role::User, message));
        contents
    }
}

impl ChatBackend for ChatClient {
    fn complete(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError> {
        let payload = GenerateRequest {
            contents: self.contents(history, message),
        };
        let payload_bytes = serde_json::to_vec(&payload)?;

        tracing::debug!(model = %self.model, turns = payload.contents.len(), "Sending chat request");

        let response = self
            .agent
            .post(&self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_string());
            return Err(ChatError::Http {
                status,
                body: error_body,
            });
        }

        let response: GenerateResponse = body_reader
            .read_json()
            .map_err(|e| ChatError::Json(e.to_string()))?;
        response.into_text()
    }
}

fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}
