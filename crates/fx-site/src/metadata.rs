//! Page metadata from the document's front matter.
//!
//! `title` and `description` are typed; every other key is kept in
//! [`PageMetadata::vars`] so the page API can hand it to the frontend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata declared in the YAML front matter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Page title (overrides H1 extraction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page description, used for `<meta name="description">`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Any other front matter keys.
    #[serde(flatten)]
    pub vars: BTreeMap<String, serde_json::Value>,
}

impl PageMetadata {
    /// Parse metadata from YAML content.
    ///
    /// Empty content returns a default instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, MetadataError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(trimmed).map_err(|e| MetadataError::Parse(format!("Invalid YAML: {e}")))
    }

    /// Check if metadata has any non-default values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.vars.is_empty()
    }
}

/// Error type for metadata operations.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// YAML parsing error.
    #[error("{0}")]
    Parse(String),
}
