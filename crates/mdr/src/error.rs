//! CLI error types.

use std::path::PathBuf;

use mdr_config::ConfigError;
use mdr_export::RenderError;

/// CLI error type.
///
/// Messages are printed as-is to stderr before exiting with status 1.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("Error: {0}")]
    Config(#[from] ConfigError),

    #[error("Error: Input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("Error: Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error rendering file: {0}")]
    Render(#[from] RenderError),

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error: {0}")]
    Server(String),
}
