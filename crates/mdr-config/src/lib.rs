//! Configuration management for mdr.
//!
//! Parses `mdr.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `diagrams.plantuml_server`
//! - `diagrams.mermaid_server`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdr.toml";

pub use mdr_diagrams::{DEFAULT_MERMAID_COMMAND, DEFAULT_PLANTUML_SERVER};

/// Default HTML-to-PDF engine executable.
pub const DEFAULT_PDF_COMMAND: &str = "weasyprint";

/// Default upper bound on a single PDF conversion.
pub const DEFAULT_PDF_TIMEOUT: Duration = Duration::from_secs(120);

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Diagram rendering configuration as parsed from TOML.
    diagrams: DiagramsConfigRaw,
    /// PDF engine configuration as parsed from TOML.
    pdf: PdfConfigRaw,

    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Resolved PDF configuration (set after loading).
    #[serde(skip)]
    pub pdf_resolved: PdfConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
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
            host: "0.0.0.0".to_owned(),
            port: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    plantuml_server: Option<String>,
    mermaid_server: Option<String>,
    mermaid_command: Option<String>,
    mermaid_timeout_secs: Option<u64>,
}

/// Resolved diagram rendering configuration.
#[derive(Debug, Clone)]
pub struct DiagramsConfig {
    /// `PlantUML` server base URL, without trailing slash.
    pub plantuml_server: String,
    /// Optional Mermaid rendering server used when the local CLI fails.
    pub mermaid_server: Option<String>,
    /// Mermaid CLI executable.
    pub mermaid_command: String,
    /// Upper bound on a single Mermaid CLI invocation.
    pub mermaid_timeout: Duration,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            plantuml_server: DEFAULT_PLANTUML_SERVER.to_owned(),
            mermaid_server: None,
            mermaid_command: DEFAULT_MERMAID_COMMAND.to_owned(),
            mermaid_timeout: mdr_diagrams::DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PdfConfigRaw {
    command: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved HTML-to-PDF engine configuration.
#[derive(Debug, Clone)]
pub struct PdfConfig {
    /// Engine executable, invoked as `<command> --stylesheet <css> <in> <out>`.
    pub command: String,
    /// Upper bound on a single conversion.
    pub timeout: Duration,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PDF_COMMAND.to_owned(),
            timeout: DEFAULT_PDF_TIMEOUT,
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
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`MDR_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_positive(duration: Duration, field: &str) -> Result<(), ConfigError> {
    if duration.is_zero() {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdr.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied last and take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
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
            Self::default()
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

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.resolve();
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_diagrams()?;
        require_non_empty(&self.pdf_resolved.command, "pdf.command")?;
        require_positive(self.pdf_resolved.timeout, "pdf.timeout_secs")?;
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
        let diagrams = &self.diagrams_resolved;
        require_non_empty(&diagrams.plantuml_server, "diagrams.plantuml_server")?;
        require_http_url(&diagrams.plantuml_server, "diagrams.plantuml_server")?;
        if let Some(ref url) = diagrams.mermaid_server {
            require_non_empty(url, "diagrams.mermaid_server")?;
            require_http_url(url, "diagrams.mermaid_server")?;
        }
        require_non_empty(&diagrams.mermaid_command, "diagrams.mermaid_command")?;
        require_positive(diagrams.mermaid_timeout, "diagrams.mermaid_timeout_secs")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref url) = self.diagrams.plantuml_server {
            self.diagrams.plantuml_server =
                Some(expand::expand_env(url, "diagrams.plantuml_server")?);
        }
        if let Some(ref url) = self.diagrams.mermaid_server {
            self.diagrams.mermaid_server =
                Some(expand::expand_env(url, "diagrams.mermaid_server")?);
        }

        Ok(())
    }

    /// Fill resolved sections from raw TOML values and defaults.
    fn resolve(&mut self) {
        let defaults = DiagramsConfig::default();
        let raw = &self.diagrams;
        self.diagrams_resolved = DiagramsConfig {
            plantuml_server: raw
                .plantuml_server
                .as_deref()
                .map_or(defaults.plantuml_server, |url| {
                    url.trim_end_matches('/').to_owned()
                }),
            mermaid_server: raw
                .mermaid_server
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_owned()),
            mermaid_command: raw
                .mermaid_command
                .clone()
                .unwrap_or(defaults.mermaid_command),
            mermaid_timeout: raw
                .mermaid_timeout_secs
                .map_or(defaults.mermaid_timeout, Duration::from_secs),
        };

        let defaults = PdfConfig::default();
        self.pdf_resolved = PdfConfig {
            command: self.pdf.command.clone().unwrap_or(defaults.command),
            timeout: self
                .pdf
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };
    }
}
