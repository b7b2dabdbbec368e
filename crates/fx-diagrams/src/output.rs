//! Final HTML assembly for a render plan.

use fx_renderer::escape_html;
use rayon::prelude::*;

use crate::block::{DiagramBlock, Fragment};
use crate::error::{DiagramError, DiagramErrorKind};
use crate::kroki::DiagramRenderer;

/// HTML for a whole render plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedHtml {
    /// Fragments concatenated in plan order.
    pub html: String,
    /// One message per diagram that fell back to its source.
    pub warnings: Vec<String>,
}

/// Render every fragment of `fragments` and join the results in order.
///
/// Diagrams are rendered in parallel. A diagram that fails, or any diagram
/// when `renderer` is `None`, is shown as its escaped source in a `<pre>`;
/// the remaining fragments are unaffected.
#[must_use]
pub fn render_fragments(
    fragments: &[Fragment],
    renderer: Option<&dyn DiagramRenderer>,
) -> RenderedHtml {
    let pieces: Vec<Result<String, (String, DiagramError)>> = fragments
        .par_iter()
        .map(|fragment| match fragment {
            Fragment::Html(html) => Ok(html.clone()),
            Fragment::Diagram(block) => render_diagram(block, renderer),
        })
        .collect();

    let mut output = RenderedHtml::default();
    for piece in pieces {
        match piece {
            Ok(html) => output.html.push_str(&html),
            Err((fallback, error)) => {
                if !matches!(error.kind, DiagramErrorKind::Disabled) {
                    tracing::warn!(%error, "diagram rendering failed, showing source");
                    output.warnings.push(error.to_string());
                }
                output.html.push_str(&fallback);
            }
        }
    }
    output
}

fn render_diagram(
    block: &DiagramBlock,
    renderer: Option<&dyn DiagramRenderer>,
) -> Result<String, (String, DiagramError)> {
    let Some(renderer) = renderer else {
        return Err((
            fallback_figure(block),
            DiagramError::new(&block.id, DiagramErrorKind::Disabled),
        ));
    };

    match renderer.render(block) {
        Ok(svg) => Ok(format!(
            r#"<figure class="diagram" id="{}">{svg}</figure>"#,
            escape_html(&block.id)
        )),
        Err(error) => Err((fallback_figure(block), error)),
    }
}

/// Preformatted source shown in place of a diagram that could not be rendered.
#[must_use]
pub fn fallback_figure(block: &DiagramBlock) -> String {
    format!(
        r#"<figure class="diagram diagram-fallback" id="{}"><pre>{}</pre></figure>"#,
        escape_html(&block.id),
        escape_html(block.content.trim())
    )
}
