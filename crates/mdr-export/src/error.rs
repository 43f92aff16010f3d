use mdr_ooxml::OoxmlError;

use crate::pdf::PdfError;

/// Error from a render pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("Office document error: {0}")]
    Ooxml(#[from] OoxmlError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
