//! Diagram error types.

/// Error for a single diagram.
///
/// Never surfaced to readers: the block falls back to its source text.
#[derive(Debug, thiserror::Error)]
#[error("{id}: {kind}")]
pub struct DiagramError {
    /// Id of the block that failed.
    pub id: String,
    /// What went wrong.
    pub kind: DiagramErrorKind,
}

impl DiagramError {
    pub(crate) fn new(id: &str, kind: DiagramErrorKind) -> Self {
        Self {
            id: id.to_owned(),
            kind,
        }
    }
}

/// Kind of diagram error.
#[derive(Debug, thiserror::Error)]
pub enum DiagramErrorKind {
    /// Transport failure or non-success status from the rendering service.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Response body could not be read.
    #[error("I/O error: {0}")]
    Io(String),
    /// No diagram renderer is configured.
    #[error("diagram rendering disabled")]
    Disabled,
}

/// The configured fence language cannot be turned into a block pattern.
#[derive(Debug, thiserror::Error)]
#[error("invalid diagram fence language '{language}': {source}")]
pub struct PatternError {
    /// Language tag as configured.
    pub language: String,
    /// Underlying regex error.
    #[source]
    pub source: regex::Error,
}
