//! Application state.
//!
//! Shared state for all request handlers.

use fx_chat::{ChatBackend, ChatClient, ChatError};
use fx_config::{Config, SiteConfig};
use fx_site::{Site, SiteError};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document store and render pipeline.
    pub(crate) site: Site,
    /// Header texts for the page shell.
    pub(crate) site_info: SiteConfig,
    /// Chat provider (`None` when chat is disabled).
    pub(crate) chat: Option<Box<dyn ChatBackend>>,
    /// Log render warnings.
    pub(crate) verbose: bool,
}

impl AppState {
    /// Build state from loaded configuration.
    pub(crate) fn from_config(config: &Config, verbose: bool) -> Result<Self, SiteError> {
        let chat = match ChatClient::from_config(&config.chat) {
            Ok(client) => Some(Box::new(client) as Box<dyn ChatBackend>),
            Err(ChatError::Disabled) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Chat disabled");
                None
            }
        };

        Ok(Self {
            site: Site::from_config(config)?,
            site_info: config.site_resolved.clone(),
            chat,
            verbose,
        })
    }

    #[must_use]
    pub(crate) fn chat_enabled(&self) -> bool {
        self.chat.is_some()
    }
}
