//! Content composition.
//!
//! Splits transformed HTML at the extraction tokens and interleaves the
//! static HTML with [`Fragment::Diagram`] references.

use crate::block::{DiagramBlock, Fragment};
use crate::extract::Extraction;

const PARAGRAPH_OPEN: &str = "<p>";
const PARAGRAPH_CLOSE: &str = "</p>";

/// Build the render plan for `html`, which must be the transform of
/// `extraction.clean_markdown`.
///
/// Blocks are placed in extraction order. Each one splits the first HTML
/// fragment holding its token into `(prefix, diagram, suffix)`; a
/// `<p>TOKEN</p>` wrapper is consumed along with the token. Blocks whose
/// token is missing are skipped. Empty HTML pieces are dropped.
#[must_use]
pub fn compose(html: &str, extraction: &Extraction) -> Vec<Fragment> {
    let mut fragments = vec![Fragment::Html(html.to_owned())];

    for block in &extraction.blocks {
        let token = extraction.token_for(block);
        let Some((index, at)) = fragments.iter().enumerate().find_map(|(index, fragment)| {
            fragment
                .as_html()
                .and_then(|text| find_token(text, &token))
                .map(|at| (index, at))
        }) else {
            continue;
        };

        let Fragment::Html(text) = &fragments[index] else {
            continue;
        };
        let replacement = split_at_token(text, at, token.len(), block);
        fragments.splice(index..=index, replacement);
    }

    fragments
}

/// Byte offset of the first occurrence of `token` not followed by a digit.
pub(crate) fn find_token(haystack: &str, token: &str) -> Option<usize> {
    haystack.match_indices(token).map(|(at, _)| at).find(|&at| {
        !haystack
            .as_bytes()
            .get(at + token.len())
            .is_some_and(u8::is_ascii_digit)
    })
}

fn split_at_token(text: &str, at: usize, token_len: usize, block: &DiagramBlock) -> Vec<Fragment> {
    let mut prefix = &text[..at];
    let mut suffix = &text[at + token_len..];

    if prefix.ends_with(PARAGRAPH_OPEN) && suffix.starts_with(PARAGRAPH_CLOSE) {
        prefix = &prefix[..prefix.len() - PARAGRAPH_OPEN.len()];
        suffix = &suffix[PARAGRAPH_CLOSE.len()..];
    }

    let mut parts = Vec::with_capacity(3);
    if !prefix.is_empty() {
        parts.push(Fragment::Html(prefix.to_owned()));
    }
    parts.push(Fragment::Diagram(block.clone()));
    if !suffix.is_empty() {
        parts.push(Fragment::Html(suffix.to_owned()));
    }
    parts
}
