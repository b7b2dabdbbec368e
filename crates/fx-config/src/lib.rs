//! Configuration management for fxsite.
//!
//! Parses `fx.toml` with serde and auto-discovers the file in the current
//! directory or any parent. CLI flags are layered on top via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! The following string values accept `${VAR}` and `${VAR:-default}`:
//!
//! - `server.host`
//! - `diagrams.kroki_url`
//! - `chat.api_key`
//! - `chat.api_url`
//!
//! The chat API key is meant to live only in the environment:
//!
//! ```toml
//! [chat]
//! api_key = "${GEMINI_API_KEY}"
//! ```

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only `Some` values are applied.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the markdown document path.
    pub content_file: Option<PathBuf>,
    /// Override Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
    /// Override chat enabled flag.
    pub chat_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "fx.toml";

/// Default diagram fence language.
const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

/// Default generative-language API base URL.
const DEFAULT_CHAT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default chat model.
const DEFAULT_CHAT_MODEL: &str = "gemini-1.5-flash";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site configuration (content file is a relative string from TOML).
    site: SiteConfigRaw,
    /// Diagram rendering configuration.
    pub diagrams: DiagramsConfig,
    /// Chat configuration.
    pub chat: ChatConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    title: Option<String>,
    tagline: Option<String>,
    description: Option<String>,
    features: Option<Vec<String>>,
    content_file: Option<String>,
}

/// Resolved site configuration.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Product name shown in the header and `<title>`.
    pub title: String,
    /// Line under the title.
    pub tagline: String,
    /// `<meta name="description">` value.
    pub description: String,
    /// Short feature badges shown in the header.
    pub features: Vec<String>,
    /// Absolute path of the markdown document.
    pub content_file: PathBuf,
}

impl SiteConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            title: "ForteXa Tech".to_owned(),
            tagline: "High-Frequency Trading System".to_owned(),
            description: "High-Frequency Trading System".to_owned(),
            features: vec![
                "Blazing fast".to_owned(),
                "Always available".to_owned(),
                "Lighthouse 100".to_owned(),
            ],
            content_file: base.join("content.md"),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Fence language tag that marks a diagram block.
    pub language: String,
    /// Kroki server URL (`None` renders every diagram as its source).
    pub kroki_url: Option<String>,
    /// Per-diagram HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl DiagramsConfig {
    /// Per-diagram HTTP timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_DIAGRAM_LANGUAGE.to_owned(),
            kroki_url: None,
            timeout_secs: 30,
        }
    }
}

/// Chat configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether the chat endpoint calls the upstream API.
    pub enabled: bool,
    /// API key (normally `${GEMINI_API_KEY}`).
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// API base URL.
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// System prompt override (`None` keeps the built-in product prompt).
    pub system_prompt: Option<String>,
}

impl ChatConfig {
    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: DEFAULT_CHAT_MODEL.to_owned(),
            api_url: DEFAULT_CHAT_API_URL.to_owned(),
            timeout_secs: 30,
            system_prompt: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`chat.api_key`").
        field: String,
        /// Error message (e.g., "${`GEMINI_API_KEY`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_positive(value: u64, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `fx.toml` in the current directory and its parents, falling back
    /// to defaults rooted at the current directory.
    ///
    /// CLI settings are applied after path resolution and validated again.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing
    /// fails, or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(content_file) = &settings.content_file {
            self.site_resolved.content_file.clone_from(content_file);
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams.kroki_url = Some(kroki_url.clone());
        }
        if let Some(chat_enabled) = settings.chat_enabled {
            self.chat.enabled = chat_enabled;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_diagrams()?;
        self.validate_chat()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        let language = &self.diagrams.language;
        require_non_empty(language, "diagrams.language")?;
        if language.chars().any(char::is_whitespace) || language.contains('`') {
            return Err(ConfigError::Validation(
                "diagrams.language must be a single fence tag".to_owned(),
            ));
        }

        if let Some(ref kroki_url) = self.diagrams.kroki_url {
            require_non_empty(kroki_url, "diagrams.kroki_url")?;
            require_http_url(kroki_url, "diagrams.kroki_url")?;
        }

        require_positive(self.diagrams.timeout_secs, "diagrams.timeout_secs")
    }

    fn validate_chat(&self) -> Result<(), ConfigError> {
        require_http_url(&self.chat.api_url, "chat.api_url")?;
        require_non_empty(&self.chat.model, "chat.model")?;
        require_positive(self.chat.timeout_secs, "chat.timeout_secs")?;

        if self.chat.enabled {
            let key = self.chat.api_key.as_deref().unwrap_or_default();
            require_non_empty(key, "chat.api_key")?;
        }

        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            diagrams: DiagramsConfig::default(),
            chat: ChatConfig::default(),
            site_resolved: SiteConfig::with_base(base),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_opt(&mut self.diagrams.kroki_url, "diagrams.kroki_url")?;
        expand::expand_opt(&mut self.chat.api_key, "chat.api_key")?;
        self.chat.api_url = expand::expand_env(&self.chat.api_url, "chat.api_url")?;
        Ok(())
    }

    /// Resolve `[site]` against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = SiteConfig::with_base(config_dir);
        let raw = std::mem::take(&mut self.site);

        self.site_resolved = SiteConfig {
            title: raw.title.unwrap_or(defaults.title),
            tagline: raw.tagline.unwrap_or(defaults.tagline),
            description: raw.description.unwrap_or(defaults.description),
            features: raw.features.unwrap_or(defaults.features),
            content_file: raw
                .content_file
                .map_or(defaults.content_file, |file| config_dir.join(file)),
        };
    }
}
