//! Page rendering for the single-document site.
//!
//! [`Site`] owns the render pipeline:
//!
//! ```text
//! raw ─► Document::parse ─► BlockExtractor::extract ─► MarkdownRenderer
//!     ─► compose ─► render_fragments ─► RenderedPage
//! ```
//!
//! Every pass starts from scratch. The extraction of a pass is only ever
//! combined with the HTML produced from that same extraction. If the HTML
//! shows that document text spells a token, the pass is redone once with a
//! prefix absent from that HTML.

use std::sync::Arc;

use fx_config::Config;
use fx_diagrams::{
    BlockExtractor, DiagramRenderer, Fragment, KrokiRenderer, PatternError, compose,
    render_fragments,
};
use fx_renderer::{MarkdownRenderer, TocEntry};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::document::{ContentStore, Document, DocumentError};
use crate::metadata::PageMetadata;
use crate::page_slot::PageSlot;

/// Error returned when the site cannot be built or a page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Document could not be read, parsed or written.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// Configured diagram language is not usable.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Result of one render pass.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedPage {
    /// Front matter.
    pub metadata: PageMetadata,
    /// Front matter title, else the first H1.
    pub title: Option<String>,
    /// Table of contents (first H1 excluded).
    pub toc: Vec<TocEntry>,
    /// Render plan.
    #[serde(skip)]
    pub fragments: Vec<Fragment>,
    /// Final HTML with diagrams in place.
    pub html: String,
    /// Diagrams that could not be placed or rendered.
    pub warnings: Vec<String>,
    /// SHA-256 of the raw source (hex).
    pub source_hash: String,
}

/// The rendered site: one document, one page.
pub struct Site {
    store: ContentStore,
    extractor: BlockExtractor,
    markdown: MarkdownRenderer,
    diagrams: Option<Box<dyn DiagramRenderer>>,
    slot: PageSlot<RenderedPage>,
}

impl Site {
    /// Create a site over `store`, extracting fences tagged `diagram_language`.
    ///
    /// Without a `diagrams` renderer every diagram is shown as its source.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Pattern`] if `diagram_language` cannot be matched.
    pub fn new(
        store: ContentStore,
        diagram_language: &str,
        diagrams: Option<Box<dyn DiagramRenderer>>,
    ) -> Result<Self, SiteError> {
        Ok(Self {
            store,
            extractor: BlockExtractor::new(diagram_language)?,
            markdown: MarkdownRenderer::new().with_title_extraction(),
            diagrams,
            slot: PageSlot::new(),
        })
    }

    /// Build a site from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Pattern`] if the diagram language cannot be matched.
    pub fn from_config(config: &Config) -> Result<Self, SiteError> {
        let diagrams = config.diagrams.kroki_url.as_ref().map(|url| {
            Box::new(
                KrokiRenderer::new(url.as_str(), &config.diagrams.language)
                    .with_timeout(config.diagrams.timeout()),
            ) as Box<dyn DiagramRenderer>
        });
        Self::new(
            ContentStore::new(&config.site_resolved.content_file),
            &config.diagrams.language,
            diagrams,
        )
    }

    #[must_use]
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Read the raw document, front matter included.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    pub fn raw_source(&self) -> Result<String, SiteError> {
        Ok(self.store.read()?)
    }

    /// Run the full pipeline on `raw` without touching the stored page.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is invalid.
    pub fn render_source(&self, raw: &str) -> Result<RenderedPage, SiteError> {
        let document = Document::parse(raw)?;
        let mut extraction = self.extractor.extract(document.body());
        let mut result = self.markdown.render_markdown(&extraction.clean_markdown);
        if !extraction.tokens_intact(&result.html) {
            tracing::debug!(
                prefix = %extraction.token_prefix,
                "Rendered text collides with diagram tokens, salting"
            );
            extraction = self
                .extractor
                .extract_avoiding(document.body(), &result.html);
            result = self.markdown.render_markdown(&extraction.clean_markdown);
        }
        let fragments = compose(&result.html, &extraction);

        let mut warnings = Vec::new();
        let placed = fragments.iter().filter_map(Fragment::as_diagram).count();
        if placed < extraction.blocks.len() {
            let missing = extraction.blocks.len() - placed;
            tracing::warn!(missing, "Diagram placeholders lost in markdown transform");
            warnings.push(format!("{missing} diagram(s) could not be placed"));
        }

        let output = render_fragments(&fragments, self.diagrams.as_deref());
        warnings.extend(output.warnings);

        let metadata = document.metadata().clone();
        let title = metadata.title.clone().or(result.title);

        Ok(RenderedPage {
            metadata,
            title,
            toc: result.toc,
            fragments,
            html: output.html,
            warnings,
            source_hash: source_hash(raw),
        })
    }

    /// Page for the document as it is on disk.
    ///
    /// The last published page is reused when the source is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed.
    pub fn current_page(&self) -> Result<Arc<RenderedPage>, SiteError> {
        let raw = self.store.read()?;
        self.page_for_source(&raw)
    }

    /// Page for `raw`, a source already read from the store.
    ///
    /// Reuses the last published page when it was rendered from the same
    /// source, otherwise renders and publishes `raw`.
    ///
    /// # Errors
    ///
    /// Returns an error if the front matter is invalid.
    pub fn page_for_source(&self, raw: &str) -> Result<Arc<RenderedPage>, SiteError> {
        let hash = source_hash(raw);
        if let Some(page) = self.slot.current()
            && page.source_hash == hash
        {
            return Ok(page);
        }

        self.render_and_publish(raw)
    }

    /// Persist `content` verbatim, then render and publish it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. A document that saves but
    /// fails to render returns the render error; the file keeps the new content.
    pub fn save(&self, content: &str) -> Result<Arc<RenderedPage>, SiteError> {
        self.store.save(content)?;
        tracing::info!(path = %self.store.path().display(), bytes = content.len(), "Saved document");
        self.render_and_publish(content)
    }

    fn render_and_publish(&self, raw: &str) -> Result<Arc<RenderedPage>, SiteError> {
        let ticket = self.slot.begin();
        let page = Arc::new(self.render_source(raw)?);
        self.slot.publish(ticket, Arc::clone(&page));
        Ok(page)
    }
}

fn source_hash(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
