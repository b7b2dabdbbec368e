//! The markdown document and its on-disk store.
//!
//! A document is one markdown file with optional YAML front matter:
//!
//! ```text
//! ---
//! title: Algo Trading
//! ---
//! # Body starts here
//! ```
//!
//! The front matter opens with a `---` first line and closes at the next
//! `---` or `...` line. A block that is never closed is not front matter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::metadata::PageMetadata;

const FRONT_MATTER_OPEN: &str = "---";
const FRONT_MATTER_CLOSE: [&str; 2] = ["---", "..."];

/// Error returned when a document cannot be read, parsed or written.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Front matter is not valid YAML.
    #[error("Invalid front matter: {0}")]
    FrontMatter(String),
    /// Document file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Document file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A parsed document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    raw: String,
    body_start: usize,
    metadata: PageMetadata,
}

impl Document {
    /// Split `raw` into front matter and body.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::FrontMatter`] if a closed front matter block
    /// holds invalid YAML.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DocumentError> {
        let raw = raw.into();
        let Some((yaml, body_start)) = split_front_matter(&raw) else {
            return Ok(Self {
                raw,
                body_start: 0,
                metadata: PageMetadata::default(),
            });
        };

        let metadata =
            PageMetadata::from_yaml(yaml).map_err(|e| DocumentError::FrontMatter(e.to_string()))?;

        Ok(Self {
            raw,
            body_start,
            metadata,
        })
    }

    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its front matter is invalid.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(raw)
    }

    /// Full source, front matter included.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Markdown after the front matter.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.raw[self.body_start..]
    }

    #[must_use]
    pub fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }
}

/// Return the YAML text and the byte offset where the body starts.
fn split_front_matter(raw: &str) -> Option<(&str, usize)> {
    let mut lines = raw.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line(first) != FRONT_MATTER_OPEN {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let line_end = offset + line.len();
        if FRONT_MATTER_CLOSE.contains(&trim_line(line)) {
            return Some((&raw[yaml_start..offset], line_end));
        }
        offset = line_end;
    }
    None
}

fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r']).trim_end_matches([' ', '\t'])
}

/// The document file behind the site.
#[derive(Clone, Debug)]
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] if the file cannot be read.
    pub fn read(&self) -> Result<String, DocumentError> {
        fs::read_to_string(&self.path).map_err(|source| DocumentError::Read {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the document with `content`, byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Write`] if the file cannot be written.
    pub fn save(&self, content: &str) -> Result<(), DocumentError> {
        fs::write(&self.path, content).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_front_matter() {
        let doc = Document::parse("# Title\n\nBody.\n").unwrap();
        assert_eq!(doc.body(), "# Title\n\nBody.\n");
        assert!(doc.metadata().is_empty());
    }

    #[test]
    fn test_front_matter_split() {
        let raw = "---\ntitle: Algo Trading\n---\n# Strategies\n";
        let doc = Document::parse(raw).unwrap();

        assert_eq!(doc.metadata().title.as_deref(), Some("Algo Trading"));
        assert_eq!(doc.body(), "# Strategies\n");
        assert_eq!(doc.raw(), raw);
    }

    #[test]
    fn test_front_matter_closed_with_dots() {
        let doc = Document::parse("---\ndescription: d\n...\nBody").unwrap();
        assert_eq!(doc.metadata().description.as_deref(), Some("d"));
        assert_eq!(doc.body(), "Body");
    }

    #[test]
    fn test_crlf_front_matter() {
        let doc = Document::parse("---\r\ntitle: T\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(doc.metadata().title.as_deref(), Some("T"));
        assert_eq!(doc.body(), "Body\r\n");
    }

    #[test]
    fn test_empty_front_matter() {
        let doc = Document::parse("---\n---\nBody").unwrap();
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.body(), "Body");
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        let raw = "---\ntitle: T\n\n# Heading\n";
        let doc = Document::parse(raw).unwrap();
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.body(), raw);
    }

    #[test]
    fn test_rule_later_in_document_is_not_front_matter() {
        let raw = "Intro\n---\ntitle: x\n---\n";
        let doc = Document::parse(raw).unwrap();
        assert_eq!(doc.body(), raw);
    }

    #[test]
    fn test_invalid_front_matter() {
        let result = Document::parse("---\ntitle: [oops\n---\nBody");
        assert!(matches!(result, Err(DocumentError::FrontMatter(_))));
    }

    #[test]
    fn test_store_round_trip_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().join("content.md"));
        let content = "---\ntitle: T\n---\n\n```mermaid\nA-->B\n```\n  trailing  ";

        store.save(content).unwrap();

        assert_eq!(store.read().unwrap(), content);
        let doc = Document::load(store.path()).unwrap();
        assert_eq!(doc.raw(), content);
    }

    #[test]
    fn test_store_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().join("missing.md"));
        assert!(matches!(store.read(), Err(DocumentError::Read { .. })));
    }

    #[test]
    fn test_store_write_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path().join("no/such/dir/content.md"));
        assert!(matches!(store.save("x"), Err(DocumentError::Write { .. })));
    }
}
