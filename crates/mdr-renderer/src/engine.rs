//! Markdown-to-HTML engine with preprocessing passes and table of contents.

use std::cmp::Reverse;
use std::fmt::Write;

use pulldown_cmark::{Options, Parser};

use crate::html_block::{self, Segment};
use crate::renderer::MarkdownRenderer;
use crate::state::{TocEntry, escape_html};

/// Text pass applied to raw markdown before parsing.
///
/// Passes run in descending [`priority`](Self::priority) order. Each pass
/// receives the output of the previous one.
pub trait Preprocessor: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Ordering key; higher values run first.
    fn priority(&self) -> i32;

    /// Transform markdown text.
    fn run(&self, text: &str) -> String;
}

/// Markdown-to-HTML engine.
///
/// Holds registered preprocessors and the table of contents of the last
/// [`parse`](Self::parse) call. Per-document state is rebuilt on every call,
/// so headings from an earlier document never leak into a later one.
///
/// # Example
///
/// ```
/// use mdr_renderer::HtmlEngine;
///
/// let mut engine = HtmlEngine::new();
/// let html = engine.parse("# Intro\n\nText");
/// assert!(html.contains(r#"<h1 id="intro">"#));
/// assert!(engine.table_of_contents().contains(r##"<a href="#intro">Intro</a>"##));
/// ```
#[derive(Default)]
pub struct HtmlEngine {
    preprocessors: Vec<Box<dyn Preprocessor>>,
    toc: Vec<TocEntry>,
}

impl HtmlEngine {
    /// Create an engine without preprocessors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preprocessor, keeping passes ordered by priority.
    #[must_use]
    pub fn with_preprocessor<P: Preprocessor + 'static>(mut self, preprocessor: P) -> Self {
        self.register(Box::new(preprocessor));
        self
    }

    /// Register a boxed preprocessor.
    ///
    /// Passes with equal priority keep registration order.
    pub fn register(&mut self, preprocessor: Box<dyn Preprocessor>) {
        self.preprocessors.push(preprocessor);
        self.preprocessors.sort_by_key(|p| Reverse(p.priority()));
    }

    /// Names of registered passes in execution order.
    pub fn preprocessor_names(&self) -> Vec<&'static str> {
        self.preprocessors.iter().map(|p| p.name()).collect()
    }

    /// Convert markdown to an HTML fragment.
    pub fn parse(&mut self, markdown: &str) -> String {
        self.toc.clear();

        let mut text = markdown.to_owned();
        for preprocessor in &self.preprocessors {
            text = preprocessor.run(&text);
        }

        let mut renderer = MarkdownRenderer::new();
        render_segments(&mut renderer, &text);
        let result = renderer.finish();
        self.toc = result.toc;
        result.html
    }

    /// Headings collected by the last [`parse`](Self::parse) call.
    pub fn toc_entries(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Nested table of contents for the last [`parse`](Self::parse) call.
    ///
    /// Empty when the document has no headings.
    pub fn table_of_contents(&self) -> String {
        render_toc(&self.toc)
    }
}

/// Render `text`, parsing the content of `markdown="1"` elements as markdown.
fn render_segments(renderer: &mut MarkdownRenderer, text: &str) {
    for segment in html_block::split(text) {
        match segment {
            Segment::Markdown(markdown) => {
                renderer.feed(Parser::new_ext(markdown, parser_options()));
            }
            Segment::Element { open, inner, close } => {
                renderer.push_raw(&open);
                render_segments(renderer, inner);
                renderer.push_raw(close);
            }
        }
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render TOC entries as nested lists.
///
/// A heading deeper than its predecessor opens a sublist. A shallower heading
/// closes sublists until it reaches a list at or above its own level.
fn render_toc(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<div class="toc">"#);
    // Levels of currently open <ul> elements; each has an open <li>.
    let mut open: Vec<u8> = Vec::new();

    for entry in entries {
        match open.last().copied() {
            None => {
                out.push_str("<ul>");
                open.push(entry.level);
            }
            Some(top) if entry.level > top => {
                out.push_str("<ul>");
                open.push(entry.level);
            }
            Some(_) => {
                out.push_str("</li>");
                while open.len() > 1 && entry.level <= open[open.len() - 2] {
                    open.pop();
                    out.push_str("</ul></li>");
                }
                if let Some(top) = open.last_mut() {
                    *top = entry.level;
                }
            }
        }
        write!(
            out,
            r##"<li><a href="#{}">{}</a>"##,
            escape_html(&entry.id),
            escape_html(&entry.title)
        )
        .unwrap();
    }

    while open.pop().is_some() {
        out.push_str("</li></ul>");
    }
    out.push_str("</div>");
    out
}
