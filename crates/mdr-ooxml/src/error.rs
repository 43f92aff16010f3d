//! OOXML error types.

/// Error writing an OOXML package.
#[derive(Debug, thiserror::Error)]
pub enum OoxmlError {
    /// ZIP container error.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;
