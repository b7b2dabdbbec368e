//! HTML page shell around the rendered document.
//!
//! The interactive shell carries the editor form, the edit toggle and the
//! chat widget mount point, and loads `app.js`. The static shell is plain
//! HTML with relative asset links, suitable for export.

use std::fmt::Write;

use fx_config::SiteConfig;
use fx_renderer::escape_html as escape;

use crate::site::RenderedPage;

/// How the page is going to be served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellMode {
    /// Served by the live server: editor and optional chat widget.
    Interactive {
        /// Raw document loaded into the editor.
        source: String,
        /// Mount the chat widget.
        chat_enabled: bool,
    },
    /// Exported file: no editor, no chat, relative asset paths.
    Static,
}

impl ShellMode {
    fn asset_base(&self) -> &'static str {
        match self {
            Self::Interactive { .. } => "/assets/",
            Self::Static => "assets/",
        }
    }
}

/// Render a complete HTML page.
#[must_use]
pub fn render_page(site: &SiteConfig, page: &RenderedPage, mode: &ShellMode) -> String {
    let mut html = String::with_capacity(page.html.len() + 4096);
    let assets = mode.asset_base();

    let title = match &page.title {
        Some(page_title) => format!("{} - {page_title}", site.title),
        None => site.title.clone(),
    };
    let description = page
        .metadata
        .description
        .as_deref()
        .unwrap_or(&site.description);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&title));
    let _ = writeln!(
        html,
        "<meta name=\"description\" content=\"{}\">",
        escape(description)
    );
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{assets}style.css\">");
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");

    render_header(&mut html, site);

    html.push_str("<main class=\"main\">\n");
    if !site.description.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"intro\"><p>{}</p></div>",
            escape(&site.description)
        );
    }
    html.push_str("<div class=\"content-section\">\n");
    html.push_str("<article class=\"markdown-content\" id=\"content\">\n");
    html.push_str(&page.html);
    html.push_str("</article>\n");

    if let ShellMode::Interactive {
        source,
        chat_enabled,
    } = mode
    {
        render_editor(&mut html, source);
        html.push_str("</div>\n</main>\n");
        render_interactive_controls(&mut html, *chat_enabled);
        let _ = writeln!(html, "<script src=\"{assets}app.js\" defer></script>");
    } else {
        html.push_str("</div>\n</main>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, site: &SiteConfig) {
    html.push_str("<header class=\"header\">\n<div class=\"header-content\">\n");
    let _ = writeln!(
        html,
        "<div class=\"logo\"><h1>{}</h1><p class=\"tagline\">{}</p></div>",
        escape(&site.title),
        escape(&site.tagline),
    );
    if !site.features.is_empty() {
        html.push_str("<div class=\"features\">\n");
        for feature in &site.features {
            let _ = writeln!(
                html,
                "<div class=\"feature\"><span>{}</span></div>",
                escape(feature)
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</header>\n");
}

fn render_editor(html: &mut String, source: &str) {
    html.push_str("<form class=\"editor-section\" id=\"editor\" hidden>\n");
    let _ = writeln!(
        html,
        "<textarea class=\"markdown-editor\" name=\"content\" \
         placeholder=\"Edit your markdown content here...\">{}</textarea>",
        escape(source)
    );
    html.push_str("<div class=\"editor-actions\">\n");
    html.push_str("<button type=\"submit\" class=\"btn btn-primary\">Save Changes</button>\n");
    html.push_str(
        "<button type=\"button\" class=\"btn btn-secondary\" data-action=\"cancel\">Cancel</button>\n",
    );
    html.push_str("</div>\n</form>\n");
}

fn render_interactive_controls(html: &mut String, chat_enabled: bool) {
    html.push_str("<div class=\"floating-actions\">\n");
    html.push_str(
        "<button type=\"button\" class=\"edit-btn\" id=\"edit-toggle\" title=\"Edit Mode\">Edit</button>\n",
    );
    html.push_str("</div>\n");
    if chat_enabled {
        html.push_str("<div class=\"ai-chat\" id=\"chat\" data-endpoint=\"/api/chat\"></div>\n");
    }
}
