/// Title used when the caller provides none.
pub const DEFAULT_TITLE: &str = "Document";

/// Per-render options.
///
/// Not every option applies to every format: Word output only reads
/// `title` and `table_style`, and Excel output only `title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
    pub include_toc: bool,
    /// Embed the default stylesheet.
    pub include_css: bool,
    /// Load Mermaid from a CDN for client-side diagram rendering.
    pub include_mermaid_js: bool,
    /// Return the rendered body without the document wrapper (HTML only).
    pub fragment: bool,
    /// Extra CSS for HTML output, or a Word table style name for DOCX.
    pub table_style: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            include_toc: false,
            include_css: true,
            include_mermaid_js: true,
            fragment: false,
            table_style: None,
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
