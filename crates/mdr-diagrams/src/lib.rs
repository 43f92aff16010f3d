//! Mermaid and `PlantUML` diagram resolution for mdr.
//!
//! Fenced `mermaid` and `plantuml` blocks are replaced in the raw markdown
//! before it reaches the HTML engine:
//! - [`MermaidPreprocessor`] renders inline SVG through a [`DiagramToolRunner`]
//!   (the `mmdc` CLI by default) and falls back to client-side rendering
//! - [`PlantUmlPreprocessor`] points an `<img>` at a `PlantUML` server using
//!   the server's compressed URL encoding
//!
//! [`DiagramResolver`] bundles both passes.
//!
//! # Example
//!
//! ```
//! use mdr_diagrams::plantuml;
//!
//! let url = plantuml::svg_url("http://www.plantuml.com/plantuml", "A -> B").unwrap();
//! assert!(url.starts_with("http://www.plantuml.com/plantuml/svg/"));
//! ```

mod consts;
mod kind;
mod mermaid;
pub mod plantuml;
mod resolver;
mod runner;

pub use consts::{
    DEFAULT_MERMAID_COMMAND, DEFAULT_PLANTUML_SERVER, DEFAULT_TIMEOUT, MERMAID_PRIORITY,
    PLANTUML_PRIORITY,
};
pub use kind::{DiagramBlock, DiagramKind, replace_blocks};
pub use mermaid::{MermaidPreprocessor, client_placeholder, placeholder_id, server_image};
pub use plantuml::PlantUmlPreprocessor;
pub use resolver::DiagramResolver;
pub use runner::{DiagramToolRunner, MmdcRunner, ToolError, run_with_timeout};
