//! Heading anchors, title extraction and table of contents.

use std::collections::HashMap;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Tracks heading ids, the extracted title and the table of contents for
/// one render pass.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    extract_title: bool,
    title: Option<String>,
    toc: Vec<TocEntry>,
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            ..Self::default()
        }
    }

    /// Register a finished heading and return the anchor id to render.
    ///
    /// The first H1 becomes the title when extraction is enabled; it is
    /// still rendered but left out of the table of contents.
    pub(crate) fn complete(&mut self, level: u8, text: &str, explicit_id: Option<&str>) -> String {
        let title = text.trim();
        let id = match explicit_id {
            Some(id) => id.to_owned(),
            None => self.unique_id(title),
        };

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(title.to_owned());
        } else {
            self.toc.push(TocEntry {
                level,
                title: title.to_owned(),
                id: id.clone(),
            });
        }

        id
    }

    /// Slugify and de-duplicate (`overview`, `overview-1`, ...).
    fn unique_id(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base.push_str("section");
        }
        let count = self.id_counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Convert text to URL-safe slug.
///
/// Lowercases ASCII letters, collapses runs of whitespace, dashes and
/// underscores into one dash, and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Risk Management"), "risk-management");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  1. Spot   Trading  "), "1-spot-trading");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("⚡"), "");
    }

    #[test]
    fn test_duplicate_ids_get_suffix() {
        let mut state = HeadingState::new(false);
        assert_eq!(state.complete(2, "Overview", None), "overview");
        assert_eq!(state.complete(2, "Overview", None), "overview-1");
        assert_eq!(state.complete(3, "Overview", None), "overview-2");
    }

    #[test]
    fn test_symbol_only_heading_gets_fallback_id() {
        let mut state = HeadingState::new(false);
        assert_eq!(state.complete(2, "🔄", None), "section");
        assert_eq!(state.complete(2, "⚡", None), "section-1");
    }

    #[test]
    fn test_first_h1_becomes_title_not_toc() {
        let mut state = HeadingState::new(true);
        state.complete(1, " Algo Trading ", None);
        state.complete(2, "Strategies", None);
        state.complete(1, "Appendix", None);

        assert_eq!(state.take_title(), Some("Algo Trading".to_owned()));
        assert_eq!(
            state.take_toc(),
            vec![
                TocEntry {
                    level: 2,
                    title: "Strategies".to_owned(),
                    id: "strategies".to_owned(),
                },
                TocEntry {
                    level: 1,
                    title: "Appendix".to_owned(),
                    id: "appendix".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_explicit_id_kept() {
        let mut state = HeadingState::new(false);
        assert_eq!(state.complete(2, "Intro", Some("custom")), "custom");
    }
}
