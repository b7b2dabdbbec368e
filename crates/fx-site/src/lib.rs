//! Document loading and page rendering for fxsite.
//!
//! This crate provides:
//! - [`Document`]: front matter and body of the markdown file
//! - [`Site`]: the render pipeline and the latest published page
//! - [`render_page`]: the HTML shell around a rendered page
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use fx_site::{ContentStore, Site};
//!
//! let site = Site::new(ContentStore::new("content.md"), "mermaid", None)?;
//! let page = site.current_page()?;
//! println!("{}", page.html);
//! # Ok(())
//! # }
//! ```

mod document;
mod metadata;
mod page_slot;
mod site;
mod template;

pub use document::{ContentStore, Document, DocumentError};
pub use metadata::{MetadataError, PageMetadata};
pub use page_slot::{PageSlot, Ticket};
pub use site::{RenderedPage, Site, SiteError};
pub use template::{ShellMode, render_page};

pub use fx_renderer::TocEntry;
