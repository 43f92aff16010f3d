//! PDF output through an external HTML-to-PDF engine.

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use mdr_config::PdfConfig;
use mdr_diagrams::{ToolError, run_with_timeout};

use crate::html::HtmlRenderer;
use crate::options::RenderOptions;

/// Print stylesheet passed to the engine alongside the document.
pub const PRINT_CSS: &str = "@page { size: A4; margin: 2cm; }\nbody { font-size: 12pt; }\n";

/// PDF conversion error.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// Engine could not run or failed.
    #[error("PDF engine error: {0}")]
    Engine(#[from] ToolError),
    /// Engine exited successfully without writing a PDF.
    #[error("PDF engine produced no output")]
    MissingOutput,
    /// Temporary file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts an HTML document to PDF bytes.
pub trait PdfEngine: Send + Sync {
    fn convert(&self, html: &str, stylesheet: &str) -> Result<Vec<u8>, PdfError>;
}

/// Command-line engine invoked as `<command> --stylesheet <css> <in.html> <out.pdf>`.
#[derive(Debug, Clone)]
pub struct CommandPdfEngine {
    command: String,
    timeout: Duration,
}

impl CommandPdfEngine {
    #[must_use]
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(config.command.clone(), config.timeout)
    }
}

impl Default for CommandPdfEngine {
    fn default() -> Self {
        Self::from_config(&PdfConfig::default())
    }
}

impl PdfEngine for CommandPdfEngine {
    fn convert(&self, html: &str, stylesheet: &str) -> Result<Vec<u8>, PdfError> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("document.html");
        let css = dir.path().join("print.css");
        let output = dir.path().join("document.pdf");
        std::fs::write(&input, html)?;
        std::fs::write(&css, stylesheet)?;

        let mut command = Command::new(&self.command);
        command
            .arg("--stylesheet")
            .arg(&css)
            .arg(&input)
            .arg(&output)
            .current_dir(dir.path());
        run_with_timeout(&mut command, &dir.path().join("stderr.log"), self.timeout)?;

        match std::fs::read(&output) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PdfError::MissingOutput),
            Err(e) => Err(e.into()),
        }
    }
}

/// Renders markdown to PDF via the HTML path.
///
/// The client-side Mermaid script is always omitted since PDF engines do not
/// execute JavaScript.
#[derive(Clone)]
pub struct PdfRenderer {
    html: HtmlRenderer,
    engine: Arc<dyn PdfEngine>,
}

impl PdfRenderer {
    #[must_use]
    pub fn new(html: HtmlRenderer, engine: Arc<dyn PdfEngine>) -> Self {
        Self { html, engine }
    }

    pub fn render(&self, markdown: &str, options: &RenderOptions) -> Result<Vec<u8>, PdfError> {
        let options = RenderOptions {
            include_mermaid_js: false,
            fragment: false,
            ..options.clone()
        };
        let html = self.html.render(markdown, &options);
        tracing::debug!(bytes = html.len(), "Converting HTML to PDF");
        self.engine.convert(&html, PRINT_CSS)
    }
}
