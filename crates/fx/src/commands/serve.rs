//! `fx serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use fx_config::{CliSettings, Config};
use fx_server::run_server;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover fx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown document to serve and edit (overrides config).
    #[arg(long)]
    content: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,

    /// Disable the chat assistant.
    #[arg(long)]
    no_chat: bool,

    /// Enable verbose output (show diagram warnings and request logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            content_file: self.content,
            kroki_url: self.kroki_url,
            chat_enabled: self.no_chat.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.field(
            "Listening",
            format!("http://{}:{}", config.server.host, config.server.port),
        );
        output.field("Content", config.site_resolved.content_file.display());

        match &config.diagrams.kroki_url {
            Some(kroki_url) => output.field("Diagrams", kroki_url),
            None => output.warn("Diagram rendering disabled (no kroki_url), showing sources"),
        }

        if config.chat.enabled {
            output.field("Chat", &config.chat.model);
        } else {
            output.field("Chat", "disabled");
        }

        run_server(&config, self.verbose).await?;

        Ok(())
    }
}
