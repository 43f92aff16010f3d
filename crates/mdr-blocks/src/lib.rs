//! Line-oriented markdown structure for word-processor and spreadsheet output.
//!
//! The HTML path goes through a full CommonMark parser. Office formats only
//! need coarse structure, so they use [`BlockScanner`], which classifies one
//! line at a time, and project the resulting [`BlockEvent`]s into a
//! [`FlowDocument`] or a [`Spreadsheet`].
//!
//! ```
//! use mdr_blocks::{FlowDocument, FlowNode};
//!
//! let doc = FlowDocument::from_markdown("Guide", "# Hello World");
//! assert_eq!(doc.nodes.len(), 1);
//! assert!(matches!(&doc.nodes[0], FlowNode::Heading { level: 1, .. }));
//! ```

mod flow;
mod inline;
mod scanner;
mod sheet;
mod table;

pub use flow::{FlowDocument, FlowNode, RULE_GLYPH, RULE_WIDTH};
pub use inline::{Emphasis, InlineRun, tokenize};
pub use scanner::{BlockEvent, BlockScanner, scan};
pub use sheet::{
    Cell, CellStyle, MAX_COLUMN_WIDTH, MAX_SHEET_NAME_LEN, SheetContent, SheetLayout, Spreadsheet,
};
pub use table::{Table, TableRow};
