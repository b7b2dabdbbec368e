//! Markdown renderer built on `pulldown-cmark`'s HTML writer.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::heading::{HeadingState, TocEntry};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Title extracted from first H1 heading (if `extract_title` was enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
}

/// Markdown to HTML renderer.
///
/// GFM (tables, strikethrough, task lists, footnotes, alerts) is on by
/// default. Every heading is given an `id` anchor.
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    gfm: bool,
    extract_title: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A heading whose inner events are buffered until its id is known.
struct OpenHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    inner: Vec<Event<'a>>,
    text: String,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            extract_title: false,
        }
    }

    /// Extract the first H1 as the page title (it is still rendered).
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options for the current configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text to HTML.
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut headings = HeadingState::new(self.extract_title);
        let events = anchor_headings(parser, &mut headings);

        let mut html = String::with_capacity(markdown.len() + markdown.len() / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        RenderResult {
            html,
            title: headings.take_title(),
            toc: headings.take_toc(),
        }
    }
}

/// Rewrite heading start tags so each carries a unique `id`.
///
/// Heading content is buffered until the end tag because the id is derived
/// from the heading's full text.
fn anchor_headings<'a>(
    events: impl Iterator<Item = Event<'a>>,
    headings: &mut HeadingState,
) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut open: Option<OpenHeading<'a>> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                open = Some(OpenHeading {
                    level,
                    id,
                    classes,
                    attrs,
                    inner: Vec::new(),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(end_level)) => {
                if let Some(heading) = open.take() {
                    let anchor = headings.complete(
                        heading.level as u8,
                        &heading.text,
                        heading.id.as_deref(),
                    );
                    out.push(Event::Start(Tag::Heading {
                        level: heading.level,
                        id: Some(CowStr::from(anchor)),
                        classes: heading.classes,
                        attrs: heading.attrs,
                    }));
                    out.extend(heading.inner);
                }
                out.push(Event::End(TagEnd::Heading(end_level)));
            }
            other => match open.as_mut() {
                Some(heading) => {
                    if let Event::Text(text) | Event::Code(text) = &other {
                        heading.text.push_str(text);
                    }
                    heading.inner.push(other);
                }
                None => out.push(other),
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new()
            .with_title_extraction()
            .render_markdown(markdown)
    }

    #[test]
    fn test_heading_gets_anchor() {
        let result = render("# Title\n\n## Risk Management\n");
        assert_eq!(
            result.html,
            "<h1 id=\"title\">Title</h1>\n<h2 id=\"risk-management\">Risk Management</h2>\n"
        );
        assert_eq!(result.title.as_deref(), Some("Title"));
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].id, "risk-management");
    }

    #[test]
    fn test_heading_with_inline_formatting() {
        let result = render("## The `fast` **path**\n");
        assert_eq!(
            result.html,
            "<h2 id=\"the-fast-path\">The <code>fast</code> <strong>path</strong></h2>\n"
        );
        assert_eq!(result.toc[0].title, "The fast path");
    }

    #[test]
    fn test_paragraph_text_passes_through() {
        let result = render("Hello PLACEHOLDER_diagram-0 world\n");
        assert_eq!(result.html, "<p>Hello PLACEHOLDER_diagram-0 world</p>\n");
    }

    #[test]
    fn test_gfm_table() {
        let result = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_gfm_strikethrough_and_tasklist() {
        let result = render("~~old~~\n\n- [x] done\n");
        assert!(result.html.contains("<del>old</del>"));
        assert!(result.html.contains("checkbox"));
    }

    #[test]
    fn test_gfm_disabled() {
        let result = MarkdownRenderer::new()
            .with_gfm(false)
            .render_markdown("~~old~~\n");
        assert_eq!(result.html, "<p>~~old~~</p>\n");
    }

    #[test]
    fn test_no_title_extraction_puts_h1_in_toc() {
        let result = MarkdownRenderer::new().render_markdown("# Only\n");
        assert!(result.title.is_none());
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 1);
    }

    #[test]
    fn test_code_block_is_escaped() {
        let result = render("```rust\nlet a = 1 < 2;\n```\n");
        assert!(result.html.contains("language-rust"));
        assert!(result.html.contains("1 &lt; 2"));
    }
}
