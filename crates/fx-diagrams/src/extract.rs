//! Block extraction.
//!
//! [`BlockExtractor`] finds every fenced block tagged with the diagram
//! language, replaces it with a token and returns the removed sources in
//! document order.
//!
//! Tokens are `PLACEHOLDER_<id>`. When the document already contains
//! `PLACEHOLDER_` anywhere, the prefix is salted with a hash of the
//! document. Escapes and entities can still spell a token once the markdown
//! is transformed, so callers check the HTML with
//! [`Extraction::tokens_intact`] and re-extract with
//! [`BlockExtractor::extract_avoiding`] when it fails.
//!
//! A token always sits on a line of its own between blank lines, so it
//! cannot join a paragraph or become the text of a setext heading.

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::block::DiagramBlock;
use crate::compose::find_token;
use crate::consts::BLOCK_ID_PREFIX;
use crate::error::PatternError;

/// Token prefix used when it does not occur in the document.
pub const DEFAULT_TOKEN_PREFIX: &str = "PLACEHOLDER_";

/// Output of one extraction pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extraction {
    /// Markdown with every diagram fence replaced by its token.
    pub clean_markdown: String,
    /// Removed blocks in document order.
    pub blocks: Vec<DiagramBlock>,
    /// Prefix of every token in `clean_markdown`.
    pub token_prefix: String,
}

impl Extraction {
    /// Token standing in for `block` in `clean_markdown`.
    #[must_use]
    pub fn token_for(&self, block: &DiagramBlock) -> String {
        format!("{}{}", self.token_prefix, block.id)
    }

    /// Whether `html` holds every token exactly once and nothing else that
    /// starts with the token prefix.
    #[must_use]
    pub fn tokens_intact(&self, html: &str) -> bool {
        html.matches(self.token_prefix.as_str()).count() == self.blocks.len()
            && self
                .blocks
                .iter()
                .all(|block| find_token(html, &self.token_for(block)).is_some())
    }
}

/// Extracts diagram fences for one language tag.
#[derive(Clone, Debug)]
pub struct BlockExtractor {
    language: String,
    pattern: Regex,
}

impl BlockExtractor {
    /// Create an extractor for fences tagged with `language` (e.g. `mermaid`).
    ///
    /// A block opens with a line of three backticks directly followed by the
    /// tag and closes at the next line holding only three backticks.
    /// Unterminated fences never match.
    pub fn new(language: &str) -> Result<Self, PatternError> {
        let pattern = format!(
            r"(?mR)^[ \t]*```{}[ \t]*\r?\n(?s:(.*?))^[ \t]*```[ \t]*$",
            regex::escape(language)
        );
        let pattern = Regex::new(&pattern).map_err(|source| PatternError {
            language: language.to_owned(),
            source,
        })?;

        Ok(Self {
            language: language.to_owned(),
            pattern,
        })
    }

    /// Fence language this extractor matches.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Replace every diagram fence in `markdown` with a token.
    ///
    /// The k-th fence gets id `diagram-k`; its body is trimmed. Without any
    /// fence the input is returned unchanged with no blocks.
    #[must_use]
    pub fn extract(&self, markdown: &str) -> Extraction {
        self.extract_with_prefix(markdown, choose_token_prefix(markdown))
    }

    /// Like [`extract`](Self::extract), with a salted prefix that occurs in
    /// neither `markdown` nor `rendered`.
    #[must_use]
    pub fn extract_avoiding(&self, markdown: &str, rendered: &str) -> Extraction {
        self.extract_with_prefix(markdown, salted_prefix(markdown, rendered))
    }

    fn extract_with_prefix(&self, markdown: &str, token_prefix: String) -> Extraction {
        let mut clean_markdown = String::with_capacity(markdown.len());
        let mut blocks = Vec::new();
        let mut last_end = 0;

        for captures in self.pattern.captures_iter(markdown) {
            let (Some(fence), Some(body)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            let before = &markdown[..fence.start()];
            let after = &markdown[fence.end()..];
            let id = format!("{BLOCK_ID_PREFIX}{}", blocks.len());

            clean_markdown.push_str(&markdown[last_end..fence.start()]);
            if !previous_line_is_blank(before) {
                clean_markdown.push_str(line_break(before));
            }
            clean_markdown.push_str(&token_prefix);
            clean_markdown.push_str(&id);
            if !next_line_is_blank(after) {
                let newline = if after.starts_with("\r\n") {
                    "\r\n"
                } else {
                    "\n"
                };
                clean_markdown.push_str(newline);
            }
            last_end = fence.end();

            blocks.push(DiagramBlock {
                id,
                content: body.as_str().trim().to_owned(),
            });
        }
        clean_markdown.push_str(&markdown[last_end..]);

        Extraction {
            clean_markdown,
            blocks,
            token_prefix,
        }
    }
}

/// `before` ends at the start of the fence line.
fn previous_line_is_blank(before: &str) -> bool {
    let Some(text) = before.strip_suffix('\n') else {
        return true;
    };
    text.rsplit('\n')
        .next()
        .is_none_or(|line| line.trim().is_empty())
}

/// `after` starts at the line break ending the closing fence.
fn next_line_is_blank(after: &str) -> bool {
    let Some(rest) = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
    else {
        return true;
    };
    rest.split('\n')
        .next()
        .is_none_or(|line| line.trim().is_empty())
}

fn line_break(before: &str) -> &'static str {
    if before.ends_with("\r\n") { "\r\n" } else { "\n" }
}

/// Pick a token prefix that does not occur in `source`.
fn choose_token_prefix(source: &str) -> String {
    if source.contains(DEFAULT_TOKEN_PREFIX) {
        salted_prefix(source, "")
    } else {
        DEFAULT_TOKEN_PREFIX.to_owned()
    }
}

/// Salted prefix derived from `source`, absent from `source` and `avoid`.
fn salted_prefix(source: &str, avoid: &str) -> String {
    let mut salt: u64 = 0;
    loop {
        let digest = Sha256::new()
            .chain_update(source.as_bytes())
            .chain_update(salt.to_le_bytes())
            .finalize();
        let prefix = format!("{DEFAULT_TOKEN_PREFIX}{}_", &hex::encode(digest)[..8]);
        if !source.contains(&prefix) && !avoid.contains(&prefix) {
            return prefix;
        }
        salt += 1;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn extractor(language: &str) -> BlockExtractor {
        BlockExtractor::new(language).unwrap()
    }

    #[test]
    fn test_no_fences_returns_input_unchanged() {
        let markdown = "# Title\n\nSome text.\n\n```rust\nfn main() {}\n```\n";
        let extraction = extractor("mermaid").extract(markdown);

        assert_eq!(extraction.clean_markdown, markdown);
        assert!(extraction.blocks.is_empty());
        assert_eq!(extraction.token_prefix, DEFAULT_TOKEN_PREFIX);
    }

    #[test]
    fn test_single_fence_scenario() {
        let extraction = extractor("diagram").extract("# Title\n\n```diagram\nA->B\n```\n\nEnd.");

        assert_eq!(
            extraction.clean_markdown,
            "# Title\n\nPLACEHOLDER_diagram-0\n\nEnd."
        );
        assert_eq!(
            extraction.blocks,
            vec![DiagramBlock {
                id: "diagram-0".to_owned(),
                content: "A->B".to_owned(),
            }]
        );
    }

    #[test]
    fn test_multiple_fences_in_document_order() {
        let markdown = "\
```mermaid
graph TD; A-->B
```

middle

```mermaid

  sequenceDiagram
  A->>B: hi

```
tail
";
        let extraction = extractor("mermaid").extract(markdown);

        let ids: Vec<_> = extraction.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["diagram-0", "diagram-1"]);
        assert_eq!(extraction.blocks[0].content, "graph TD; A-->B");
        assert_eq!(extraction.blocks[1].content, "sequenceDiagram\n  A->>B: hi");
        assert_eq!(
            extraction.clean_markdown,
            "PLACEHOLDER_diagram-0\n\nmiddle\n\nPLACEHOLDER_diagram-1\n\ntail\n"
        );
        assert!(!extraction.clean_markdown.contains("```"));
    }

    #[test]
    fn test_n_fences_give_n_tokens_in_order() {
        let markdown: String = (0..12)
            .map(|i| format!("para {i}\n\n```mermaid\nA{i}-->B\n```\n\n"))
            .collect();
        let extraction = extractor("mermaid").extract(&markdown);

        assert_eq!(extraction.blocks.len(), 12);
        let mut search_from = 0;
        for (k, block) in extraction.blocks.iter().enumerate() {
            assert_eq!(block.id, format!("diagram-{k}"));
            assert_eq!(block.content, format!("A{k}-->B"));
            let token = extraction.token_for(block);
            let at = extraction.clean_markdown[search_from..]
                .find(&token)
                .map(|pos| pos + search_from)
                .unwrap();
            search_from = at + token.len();
        }
        assert!(!extraction.clean_markdown.contains("```"));
    }

    #[test]
    fn test_other_languages_are_left_alone() {
        let markdown = "```mermaidx\nA\n```\n\n```python\nprint(1)\n```\n";
        let extraction = extractor("mermaid").extract(markdown);

        assert_eq!(extraction.clean_markdown, markdown);
        assert!(extraction.blocks.is_empty());
    }

    #[test]
    fn test_unterminated_fence_passes_through() {
        let markdown = "Intro\n\n```mermaid\ngraph TD; A-->B\n";
        let extraction = extractor("mermaid").extract(markdown);

        assert_eq!(extraction.clean_markdown, markdown);
        assert!(extraction.blocks.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let extraction = extractor("mermaid").extract("```mermaid\n```\n");

        assert_eq!(extraction.blocks.len(), 1);
        assert_eq!(extraction.blocks[0].content, "");
        assert_eq!(extraction.clean_markdown, "PLACEHOLDER_diagram-0\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let extraction = extractor("mermaid").extract("a\r\n\r\n```mermaid\r\nA-->B\r\n```\r\nb");

        assert_eq!(extraction.blocks[0].content, "A-->B");
        assert_eq!(extraction.clean_markdown, "a\r\n\r\nPLACEHOLDER_diagram-0\r\n\r\nb");
    }

    #[test]
    fn test_language_is_escaped() {
        let extraction = extractor("c++").extract("```c++\nx\n```\n```cc\ny\n```\n");

        assert_eq!(extraction.blocks.len(), 1);
        assert_eq!(extraction.blocks[0].content, "x");
    }

    #[test]
    fn test_colliding_text_salts_prefix() {
        let markdown = "Literal PLACEHOLDER_diagram-0 in prose.\n\n```mermaid\nA-->B\n```\n";
        let extraction = extractor("mermaid").extract(markdown);

        assert_ne!(extraction.token_prefix, DEFAULT_TOKEN_PREFIX);
        assert!(extraction.token_prefix.starts_with(DEFAULT_TOKEN_PREFIX));
        let token = extraction.token_for(&extraction.blocks[0]);
        assert_eq!(extraction.clean_markdown.matches(&token).count(), 1);
        assert!(
            extraction
                .clean_markdown
                .starts_with("Literal PLACEHOLDER_diagram-0 in prose.")
        );
    }

    #[test]
    fn test_salted_prefix_is_deterministic() {
        let markdown = "PLACEHOLDER_x\n```mermaid\nA\n```\n";
        let first = extractor("mermaid").extract(markdown);
        let second = extractor("mermaid").extract(markdown);

        assert_eq!(first, second);
    }

    #[test]
    fn test_token_is_separated_from_adjacent_lines() {
        let extraction = extractor("mermaid").extract("Intro\n```mermaid\nA-->B\n```\n---\n\nEnd.\n");

        assert_eq!(
            extraction.clean_markdown,
            "Intro\n\nPLACEHOLDER_diagram-0\n\n---\n\nEnd.\n"
        );
    }

    #[test]
    fn test_tokens_intact() {
        let extraction = extractor("mermaid").extract("```mermaid\nA\n```\n");

        assert!(extraction.tokens_intact("<p>PLACEHOLDER_diagram-0</p>\n"));
        assert!(!extraction.tokens_intact("<p>gone</p>\n"));
        assert!(!extraction.tokens_intact(
            "<p>PLACEHOLDER_diagram-0 x</p>\n<p>PLACEHOLDER_diagram-0</p>\n"
        ));
    }

    #[test]
    fn test_extract_avoiding_rendered_text() {
        let markdown = "See PLACEHOLDER\\_diagram-0 here.\n\n```mermaid\nA\n```\n";
        let rendered = "<p>See PLACEHOLDER_diagram-0 here.</p>\n<p>PLACEHOLDER_diagram-0</p>\n";

        let first = extractor("mermaid").extract(markdown);
        assert_eq!(first.token_prefix, DEFAULT_TOKEN_PREFIX);
        assert!(!first.tokens_intact(rendered));

        let second = extractor("mermaid").extract_avoiding(markdown, rendered);
        assert_ne!(second.token_prefix, DEFAULT_TOKEN_PREFIX);
        assert!(!rendered.contains(&second.token_prefix));
        assert_eq!(second.blocks, first.blocks);
    }
}
