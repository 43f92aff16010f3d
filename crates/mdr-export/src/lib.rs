//! Markdown export to HTML, PDF, DOCX and XLSX.
//!
//! [`Exporter`] is the entry point: it dispatches an [`OutputFormat`] to the
//! matching renderer.
//!
//! - HTML and PDF go through the CommonMark engine with diagrams resolved.
//! - DOCX and XLSX go through the line scanner in `mdr-blocks`.
//!
//! ```no_run
//! use mdr_export::{Exporter, OutputFormat, RenderOptions};
//!
//! let exporter = Exporter::default();
//! let options = RenderOptions::default().with_title("Guide");
//! let rendered = exporter.render("# Guide", OutputFormat::Docx, &options)?;
//! std::fs::write(&rendered.filename, &rendered.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod exporter;
mod format;
mod html;
mod office;
mod options;
mod pdf;

pub use error::RenderError;
pub use exporter::{Exporter, Rendered, attachment_filename};
pub use format::{OutputFormat, UnsupportedFormat};
pub use html::{DEFAULT_CSS, HtmlRenderer, MERMAID_SCRIPT};
pub use office::{ExcelRenderer, WordRenderer};
pub use options::{DEFAULT_TITLE, RenderOptions};
pub use pdf::{CommandPdfEngine, PRINT_CSS, PdfEngine, PdfError, PdfRenderer};
