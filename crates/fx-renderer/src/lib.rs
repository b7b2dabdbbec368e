//! Markdown to HTML transform for fxsite.
//!
//! Wraps `pulldown-cmark` with GitHub Flavored Markdown enabled, adds
//! stable `id` anchors to every heading, and collects a table of contents
//! plus the page title (first H1) while rendering.
//!
//! # Example
//!
//! ```
//! use fx_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\n**Bold** text");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert!(result.html.contains("<strong>Bold</strong>"));
//! ```

mod heading;
mod renderer;
mod util;

pub use heading::{TocEntry, slugify};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use util::escape_html;
