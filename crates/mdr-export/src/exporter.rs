//! Format dispatch.

use std::path::Path;
use std::sync::Arc;

use mdr_config::Config;
use mdr_diagrams::{DiagramResolver, MmdcRunner};

use crate::error::RenderError;
use crate::format::OutputFormat;
use crate::html::HtmlRenderer;
use crate::office::{ExcelRenderer, WordRenderer};
use crate::options::RenderOptions;
use crate::pdf::{CommandPdfEngine, PdfEngine, PdfRenderer};

/// Rendered document ready to be written or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// `{title}.{ext}`, safe for a `Content-Disposition` header.
    pub filename: String,
}

impl Rendered {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Renders markdown to any [`OutputFormat`].
///
/// Cheap to clone. Every render call builds its own engine, so one exporter
/// can serve concurrent requests.
#[derive(Clone)]
pub struct Exporter {
    resolver: DiagramResolver,
    pdf_engine: Arc<dyn PdfEngine>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(
            DiagramResolver::default(),
            Arc::new(CommandPdfEngine::default()),
        )
    }
}

impl Exporter {
    #[must_use]
    pub fn new(resolver: DiagramResolver, pdf_engine: Arc<dyn PdfEngine>) -> Self {
        Self {
            resolver,
            pdf_engine,
        }
    }

    /// Wire diagram tools and the PDF engine from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let diagrams = &config.diagrams_resolved;
        let runner = MmdcRunner::new(diagrams.mermaid_command.clone())
            .timeout(diagrams.mermaid_timeout);
        let resolver = DiagramResolver::new(Arc::new(runner), &diagrams.plantuml_server)
            .with_mermaid_server(diagrams.mermaid_server.clone());
        Self::new(
            resolver,
            Arc::new(CommandPdfEngine::from_config(&config.pdf_resolved)),
        )
    }

    pub fn html(&self) -> HtmlRenderer {
        HtmlRenderer::new(self.resolver.clone())
    }

    pub fn pdf(&self) -> PdfRenderer {
        PdfRenderer::new(self.html(), Arc::clone(&self.pdf_engine))
    }

    /// Render `markdown` as `format`.
    pub fn render(
        &self,
        markdown: &str,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> Result<Rendered, RenderError> {
        tracing::debug!(%format, title = %options.title, "Rendering document");

        let bytes = match format {
            OutputFormat::Html => self.html().render(markdown, options).into_bytes(),
            OutputFormat::Pdf => self.pdf().render(markdown, options)?,
            OutputFormat::Docx => WordRenderer.render(markdown, options)?,
            OutputFormat::Xlsx => ExcelRenderer.render(markdown, options)?,
        };

        Ok(Rendered {
            bytes,
            format,
            filename: attachment_filename(&options.title, format),
        })
    }

    /// Render and write the result to `path`.
    pub fn render_to_file(
        &self,
        markdown: &str,
        format: OutputFormat,
        options: &RenderOptions,
        path: &Path,
    ) -> Result<Rendered, RenderError> {
        let rendered = self.render(markdown, format, options)?;
        std::fs::write(path, &rendered.bytes)?;
        Ok(rendered)
    }
}

/// `{title}.{ext}` with quotes, backslashes and control characters removed.
pub fn attachment_filename(title: &str, format: OutputFormat) -> String {
    let stem: String = title
        .chars()
        .filter(|c| !matches!(c, '"' | '\\') && !c.is_control())
        .collect();
    format!("{stem}.{}", format.extension())
}
