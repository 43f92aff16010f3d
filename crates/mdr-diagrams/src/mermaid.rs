//! Mermaid diagram resolution.
//!
//! Each fenced `mermaid` block is rendered to inline SVG through a
//! [`DiagramToolRunner`]. When the tool is unavailable or fails, the block
//! degrades to a server image (if a Mermaid server is configured) or to a
//! `<pre class="mermaid">` placeholder for client-side rendering.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use md5::{Digest, Md5};
use mdr_renderer::{Preprocessor, escape_html};

use crate::consts::{MERMAID_PRIORITY, PLACEHOLDER_ID_LEN};
use crate::kind::{DiagramKind, replace_blocks};
use crate::runner::{DiagramToolRunner, MmdcRunner};

/// Preprocessor replacing fenced `mermaid` blocks with rendered markup.
#[derive(Clone)]
pub struct MermaidPreprocessor {
    runner: Arc<dyn DiagramToolRunner>,
    server: Option<String>,
}

impl MermaidPreprocessor {
    #[must_use]
    pub fn new(runner: Arc<dyn DiagramToolRunner>) -> Self {
        Self {
            runner,
            server: None,
        }
    }

    /// Use a Mermaid rendering server as the first fallback.
    #[must_use]
    pub fn with_server(mut self, server: Option<String>) -> Self {
        self.server = server.map(|s| s.trim_end_matches('/').to_owned());
        self
    }

    /// Markup for one diagram. Never fails.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self.runner.render_svg(source) {
            Ok(svg) => format!(r#"<div class="mermaid-diagram">{svg}</div>"#),
            Err(e) => {
                tracing::debug!(error = %e, "Mermaid CLI failed; using fallback");
                match &self.server {
                    Some(server) => server_image(server, source),
                    None => client_placeholder(source),
                }
            }
        }
    }
}

impl Default for MermaidPreprocessor {
    fn default() -> Self {
        Self::new(Arc::new(MmdcRunner::default()))
    }
}

impl Preprocessor for MermaidPreprocessor {
    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn priority(&self) -> i32 {
        MERMAID_PRIORITY
    }

    fn run(&self, text: &str) -> String {
        replace_blocks(DiagramKind::Mermaid, text, |block| self.render(&block.source))
    }
}

/// Stable placeholder id derived from the diagram source.
#[must_use]
pub fn placeholder_id(source: &str) -> String {
    let digest = hex::encode(Md5::digest(source.as_bytes()));
    digest[..PLACEHOLDER_ID_LEN].to_owned()
}

/// `<pre class="mermaid">` block picked up by the client-side Mermaid script.
#[must_use]
pub fn client_placeholder(source: &str) -> String {
    format!(
        r#"<pre class="mermaid" id="mermaid-{}">{}</pre>"#,
        placeholder_id(source),
        escape_html(source)
    )
}

/// Image served by a Mermaid server (`{server}/svg/{base64url(source)}`).
#[must_use]
pub fn server_image(server: &str, source: &str) -> String {
    let encoded = URL_SAFE.encode(source.as_bytes());
    format!(
        r#"<div class="mermaid-diagram"><img src="{}/svg/{}" alt="Mermaid Diagram" /></div>"#,
        escape_html(server),
        encoded
    )
}
