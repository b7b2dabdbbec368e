//! Diagram blocks and render-plan fragments.

/// A diagram fence lifted out of the document.
///
/// Created during extraction and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Generation-ordered id (`diagram-0`, `diagram-1`, ...).
    pub id: String,
    /// Trimmed diagram source.
    pub content: String,
}

/// One unit of the render plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// Transformed markup, emitted as-is.
    Html(String),
    /// A diagram rendered separately and placed here.
    Diagram(DiagramBlock),
}

impl Fragment {
    /// Markup of an `Html` fragment.
    #[must_use]
    pub fn as_html(&self) -> Option<&str> {
        match self {
            Self::Html(html) => Some(html),
            Self::Diagram(_) => None,
        }
    }

    /// Block of a `Diagram` fragment.
    #[must_use]
    pub fn as_diagram(&self) -> Option<&DiagramBlock> {
        match self {
            Self::Html(_) => None,
            Self::Diagram(block) => Some(block),
        }
    }
}
