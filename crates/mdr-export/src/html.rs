//! Standalone HTML documents.

use mdr_diagrams::DiagramResolver;
use mdr_renderer::{HtmlEngine, escape_html};

use crate::options::RenderOptions;

/// Stylesheet embedded when `include_css` is set.
pub const DEFAULT_CSS: &str = r"body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    max-width: 900px;
    margin: 0 auto;
    padding: 20px;
    color: #333;
}
h1, h2, h3, h4, h5, h6 { margin-top: 1.5em; margin-bottom: 0.5em; font-weight: 600; }
h1 { font-size: 2em; border-bottom: 1px solid #eee; padding-bottom: 0.3em; }
h2 { font-size: 1.5em; border-bottom: 1px solid #eee; padding-bottom: 0.3em; }
h3 { font-size: 1.25em; }
code {
    background-color: #f4f4f4;
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: 'SF Mono', Consolas, monospace;
    font-size: 0.9em;
}
pre { background-color: #f4f4f4; padding: 16px; border-radius: 6px; overflow-x: auto; }
pre code { background: none; padding: 0; }
table { border-collapse: collapse; width: 100%; margin: 1em 0; }
th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: left; }
th { background-color: #f4f4f4; font-weight: 600; }
tr:nth-child(even) { background-color: #f9f9f9; }
blockquote {
    margin: 1em 0;
    padding: 0.5em 1em;
    border-left: 4px solid #ddd;
    color: #666;
    background-color: #f9f9f9;
}
img { max-width: 100%; height: auto; }
.mermaid-diagram, .plantuml-diagram { margin: 1em 0; text-align: center; }
.mermaid { background-color: white; }
.highlight { background-color: #f4f4f4; padding: 16px; border-radius: 6px; overflow-x: auto; }
.highlight .comment { color: #6a737d; font-style: italic; }
.highlight .keyword, .highlight .storage { color: #d73a49; }
.highlight .string { color: #032f62; }
.highlight .constant { color: #005cc5; }
.highlight .entity.name { color: #6f42c1; }
a { color: #0366d6; text-decoration: none; }
a:hover { text-decoration: underline; }
a.headerlink { visibility: hidden; margin-left: 0.3em; color: #999; }
h1:hover a.headerlink, h2:hover a.headerlink, h3:hover a.headerlink,
h4:hover a.headerlink, h5:hover a.headerlink, h6:hover a.headerlink { visibility: visible; }
.toc { background-color: #f9f9f9; padding: 1em; border-radius: 6px; margin-bottom: 2em; }
.toc ul { margin: 0; padding-left: 1.5em; }
";

/// Client-side Mermaid loader for `<pre class="mermaid">` placeholders.
pub const MERMAID_SCRIPT: &str = concat!(
    r#"<script src="https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js"></script>"#,
    "\n<script>mermaid.initialize({ startOnLoad: true, theme: 'default' });</script>"
);

/// Renders markdown to HTML with diagrams resolved.
///
/// A fresh engine is built for every call, so no state carries over between
/// documents.
#[derive(Clone, Default)]
pub struct HtmlRenderer {
    resolver: DiagramResolver,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(resolver: DiagramResolver) -> Self {
        Self { resolver }
    }

    fn engine(&self) -> HtmlEngine {
        self.resolver.clone().install(HtmlEngine::new())
    }

    /// Render the document body only.
    #[must_use]
    pub fn render_fragment(&self, markdown: &str) -> String {
        self.engine().parse(markdown)
    }

    /// Render a complete document, or the fragment when `options.fragment`.
    #[must_use]
    pub fn render(&self, markdown: &str, options: &RenderOptions) -> String {
        let mut engine = self.engine();
        let content = engine.parse(markdown);
        if options.fragment {
            return content;
        }

        let toc = if options.include_toc {
            let toc = engine.table_of_contents();
            if toc.is_empty() {
                String::new()
            } else {
                format!(r#"<div class="toc"><strong>Table of Contents</strong>{toc}</div>"#)
            }
        } else {
            String::new()
        };

        let mut styles = String::new();
        if options.include_css {
            styles.push_str(DEFAULT_CSS);
        }
        if let Some(extra) = &options.table_style {
            styles.push_str(extra);
            styles.push('\n');
        }
        let style_block = if styles.is_empty() {
            String::new()
        } else {
            format!("<style>\n{styles}</style>")
        };

        let script = if options.include_mermaid_js {
            MERMAID_SCRIPT
        } else {
            ""
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
{style_block}
</head>
<body>
{toc}
{content}
{script}
</body>
</html>
"#,
            title = escape_html(&options.title),
        )
    }
}
