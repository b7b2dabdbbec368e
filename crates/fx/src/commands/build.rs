//! `fx build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use fx_config::{CliSettings, Config, SiteConfig};
use fx_site::{ShellMode, Site, render_page};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover fx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the exported page.
    #[arg(short, long, default_value = "dist")]
    out: PathBuf,

    /// Markdown document to export (overrides config).
    #[arg(long)]
    content: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            content_file: self.content,
            kroki_url: self.kroki_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.field("Content", config.site_resolved.content_file.display());
        output.field("Output", self.out.display());

        let site = Site::from_config(&config)?;
        let warnings = export(&site, &config.site_resolved, &self.out)?;
        for warning in &warnings {
            output.warn(&format!("Warning: {warning}"));
        }

        output.done(&format!(
            "Exported {}",
            self.out.join("index.html").display()
        ));
        Ok(())
    }
}

/// Write `index.html` and the embedded assets into `out`.
///
/// Returns the render warnings of the exported page.
fn export(site: &Site, site_info: &SiteConfig, out: &Path) -> Result<Vec<String>, CliError> {
    let page = site.current_page()?;
    let html = render_page(site_info, &page, &ShellMode::Static);

    fs::create_dir_all(out)?;
    fs::write(out.join("index.html"), html)?;

    let assets_dir = out.join("assets");
    for name in fx_assets::iter() {
        if let Some(content) = fx_assets::get(&name) {
            let target = assets_dir.join(&*name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, content)?;
        }
    }

    tracing::info!(out = %out.display(), "Static export written");
    Ok(page.warnings.clone())
}
