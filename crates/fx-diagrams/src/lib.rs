//! Diagram handling for fxsite.
//!
//! Diagram fences are lifted out of the markdown before it is transformed,
//! then put back in as typed fragments once the HTML exists:
//!
//! ```text
//! raw markdown ──► BlockExtractor::extract ──► (clean markdown, blocks)
//!                                                   │
//!                               markdown transform ◄┘
//!                              │
//!                              ▼
//!                   compose(html, extraction) ──► [Html | Diagram]*
//!                                                      │
//!                         render_fragments(renderer) ◄─┘ (parallel, with fallback)
//! ```
//!
//! - [`extract`]: [`BlockExtractor`] swaps every diagram fence for a token
//! - [`compose`](mod@compose): [`compose()`] splits the HTML at the tokens
//! - [`kroki`]: [`KrokiRenderer`] renders a block to SVG over HTTP
//! - [`output`]: [`render_fragments`] assembles the final HTML
//!
//! # Example
//!
//! ```
//! use fx_diagrams::{BlockExtractor, Fragment, compose};
//!
//! let extractor = BlockExtractor::new("mermaid").unwrap();
//! let extraction = extractor.extract("Intro\n\n```mermaid\nA-->B\n```\n");
//! assert_eq!(extraction.clean_markdown, "Intro\n\nPLACEHOLDER_diagram-0\n");
//!
//! let html = "<p>Intro</p>\n<p>PLACEHOLDER_diagram-0</p>\n";
//! let fragments = compose(html, &extraction);
//! assert!(matches!(fragments[1], Fragment::Diagram(_)));
//! ```

mod block;
pub mod compose;
mod consts;
mod error;
pub mod extract;
pub mod kroki;
pub mod output;

pub use block::{DiagramBlock, Fragment};
pub use compose::compose;
pub use error::{DiagramError, DiagramErrorKind, PatternError};
pub use extract::{BlockExtractor, DEFAULT_TOKEN_PREFIX, Extraction};
pub use kroki::{DiagramRenderer, KrokiRenderer};
pub use output::{RenderedHtml, fallback_figure, render_fragments};
