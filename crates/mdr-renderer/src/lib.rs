//! Markdown to HTML rendering for mdr.
//!
//! [`HtmlEngine`] runs registered [`Preprocessor`] passes over raw markdown,
//! parses the result with pulldown-cmark and renders it with
//! [`MarkdownRenderer`]. The engine keeps the table of contents of the last
//! document it parsed.
//!
//! # Example
//!
//! ```
//! use pulldown_cmark::Parser;
//! use mdr_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new().render(Parser::new("## Usage\n\n**Bold** text"));
//! assert_eq!(result.toc[0].id, "usage");
//! ```

mod engine;
mod html_block;
mod images;
mod renderer;
mod state;
mod util;

pub use engine::{HtmlEngine, Preprocessor};
pub use images::{ImageRef, extract_images};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
