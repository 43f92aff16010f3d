//! Flow document projection for word-processor output.

use crate::inline::{InlineRun, tokenize};
use crate::scanner::{BlockEvent, BlockScanner};
use crate::table::Table;

/// Glyph repeated to draw a horizontal rule.
pub const RULE_GLYPH: char = '─';

/// Number of glyphs in a rule.
pub const RULE_WIDTH: usize = 50;

/// Paragraph-level node of a flow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowNode {
    Heading { level: u8, text: String },
    Paragraph(Vec<InlineRun>),
    Table(Table),
    BulletItem(String),
    NumberedItem(String),
    CodeBlock(String),
    Quote(String),
    Rule,
}

impl FlowNode {
    /// Rule text as drawn in the output document.
    #[must_use]
    pub fn rule_text() -> String {
        std::iter::repeat_n(RULE_GLYPH, RULE_WIDTH).collect()
    }
}

impl From<BlockEvent> for FlowNode {
    fn from(event: BlockEvent) -> Self {
        match event {
            BlockEvent::Heading { level, text } => Self::Heading { level, text },
            BlockEvent::Table(table) => Self::Table(table),
            BlockEvent::CodeBlock { lines, .. } => Self::CodeBlock(lines.join("\n")),
            BlockEvent::Rule => Self::Rule,
            BlockEvent::Blockquote { text } => Self::Quote(text),
            BlockEvent::BulletItem { text } => Self::BulletItem(text),
            BlockEvent::OrderedItem { text } => Self::NumberedItem(text),
            BlockEvent::Paragraph { raw_line } => Self::Paragraph(tokenize(&raw_line)),
        }
    }
}

/// Titled sequence of flow nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDocument {
    pub title: String,
    pub nodes: Vec<FlowNode>,
}

impl FlowDocument {
    /// Map block events one-to-one onto flow nodes.
    pub fn project(title: impl Into<String>, events: impl IntoIterator<Item = BlockEvent>) -> Self {
        Self {
            title: title.into(),
            nodes: events.into_iter().map(FlowNode::from).collect(),
        }
    }

    /// Scan and project in one step.
    pub fn from_markdown(title: impl Into<String>, markdown: &str) -> Self {
        Self::project(title, BlockScanner::new(markdown))
    }
}
