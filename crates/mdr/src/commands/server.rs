//! `mdr server` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdr_config::{CliSettings, Config};
use mdr_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the server command.
#[derive(Args)]
pub(crate) struct ServerArgs {
    /// Path to configuration file (default: auto-discover mdr.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind to (overrides config, default 5000).
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config, default 0.0.0.0).
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl ServerArgs {
    /// Execute the server command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Using config: {}", path.display()));
        }
        output.highlight(&format!(
            "Starting mdr server on {}:{}",
            config.server.host, config.server.port
        ));

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))
    }
}
