//! Single-pass structural line scanner.
//!
//! Classifies each line of a markdown document into a [`BlockEvent`]. Unlike
//! the HTML engine this does not build a syntax tree: fenced code and pipe
//! tables are accumulated by a small mode machine, and every other line is
//! matched against [`CLASSIFIERS`] in order.

use std::collections::VecDeque;
use std::str::Lines;
use std::sync::LazyLock;

use regex::Regex;

use crate::table::{Table, TableRow};

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.+)$").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+(.+)$").unwrap());

const FENCE: &str = "```";

/// One classified structural unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    Heading { level: u8, text: String },
    Table(Table),
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Rule,
    Blockquote { text: String },
    BulletItem { text: String },
    OrderedItem { text: String },
    /// Residual non-blank line, untrimmed.
    Paragraph { raw_line: String },
}

/// Line classifier; `None` passes the line to the next one.
type Classifier = fn(&str) -> Option<BlockEvent>;

/// Evaluated in order, first match wins.
const CLASSIFIERS: &[Classifier] = &[
    heading,
    rule,
    blockquote,
    bullet_item,
    ordered_item,
    paragraph,
];

fn heading(line: &str) -> Option<BlockEvent> {
    let caps = HEADING.captures(line)?;
    #[allow(clippy::cast_possible_truncation)]
    let level = caps[1].len() as u8;
    Some(BlockEvent::Heading {
        level,
        text: caps[2].trim().to_owned(),
    })
}

fn rule(line: &str) -> Option<BlockEvent> {
    RULE.is_match(line.trim()).then_some(BlockEvent::Rule)
}

fn blockquote(line: &str) -> Option<BlockEvent> {
    let rest = line.trim().strip_prefix('>')?;
    Some(BlockEvent::Blockquote {
        text: rest.trim().to_owned(),
    })
}

fn bullet_item(line: &str) -> Option<BlockEvent> {
    let caps = BULLET.captures(line)?;
    Some(BlockEvent::BulletItem {
        text: caps[1].to_owned(),
    })
}

fn ordered_item(line: &str) -> Option<BlockEvent> {
    let caps = ORDERED.captures(line)?;
    Some(BlockEvent::OrderedItem {
        text: caps[1].to_owned(),
    })
}

fn paragraph(line: &str) -> Option<BlockEvent> {
    (!line.trim().is_empty()).then(|| BlockEvent::Paragraph {
        raw_line: line.to_owned(),
    })
}

/// Scanner state between lines.
#[derive(Debug, Default)]
enum Mode {
    #[default]
    Normal,
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Table(Table),
}

/// Opening or closing fence line.
struct Fence {
    language: Option<String>,
}

impl Fence {
    fn parse(line: &str) -> Option<Self> {
        let tag = line.trim().strip_prefix(FENCE)?.trim();
        Some(Self {
            language: (!tag.is_empty()).then(|| tag.to_owned()),
        })
    }
}

/// Iterator over the block events of a document.
///
/// A code fence left open at end of input is flushed as a code block, and an
/// open table is emitted.
pub struct BlockScanner<'a> {
    lines: Lines<'a>,
    mode: Mode,
    pending: VecDeque<BlockEvent>,
    finished: bool,
}

impl<'a> BlockScanner<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            mode: Mode::Normal,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn feed(&mut self, line: &str) {
        if let Some(fence) = Fence::parse(line) {
            self.toggle_fence(fence);
            return;
        }

        match &mut self.mode {
            Mode::Code { lines, .. } => {
                lines.push(line.to_owned());
                return;
            }
            Mode::Table(table) if line.contains('|') => {
                table.push(TableRow::parse(line));
                return;
            }
            Mode::Table(_) => self.close_table(),
            Mode::Normal => {}
        }

        if line.contains('|') {
            let mut table = Table::default();
            table.push(TableRow::parse(line));
            self.mode = Mode::Table(table);
            return;
        }

        if let Some(event) = CLASSIFIERS.iter().find_map(|classify| classify(line)) {
            self.pending.push_back(event);
        }
    }

    fn toggle_fence(&mut self, fence: Fence) {
        match std::mem::take(&mut self.mode) {
            Mode::Code { language, lines } => {
                self.pending
                    .push_back(BlockEvent::CodeBlock { language, lines });
            }
            Mode::Table(table) => {
                self.emit_table(table);
                self.open_code(fence);
            }
            Mode::Normal => self.open_code(fence),
        }
    }

    fn open_code(&mut self, fence: Fence) {
        self.mode = Mode::Code {
            language: fence.language,
            lines: Vec::new(),
        };
    }

    fn close_table(&mut self) {
        if let Mode::Table(table) = std::mem::take(&mut self.mode) {
            self.emit_table(table);
        }
    }

    fn emit_table(&mut self, table: Table) {
        if !table.is_empty() {
            self.pending.push_back(BlockEvent::Table(table));
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        match std::mem::take(&mut self.mode) {
            Mode::Code { language, lines } => {
                self.pending
                    .push_back(BlockEvent::CodeBlock { language, lines });
            }
            Mode::Table(table) => self.emit_table(table),
            Mode::Normal => {}
        }
    }
}

impl Iterator for BlockScanner<'_> {
    type Item = BlockEvent;

    fn next(&mut self) -> Option<BlockEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.feed(line),
                None => self.finish(),
            }
        }
    }
}

/// Collect every block event of `text`.
#[must_use]
pub fn scan(text: &str) -> Vec<BlockEvent> {
    BlockScanner::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn test_single_heading() {
        assert_eq!(
            scan("# Hello World"),
            vec![BlockEvent::Heading {
                level: 1,
                text: "Hello World".to_owned()
            }]
        );
    }

    #[test]
    fn test_heading_levels_and_limits() {
        let events = scan("###### Six\n####### Seven\n#NoSpace");
        assert_eq!(
            events,
            vec![
                BlockEvent::Heading {
                    level: 6,
                    text: "Six".to_owned()
                },
                BlockEvent::Paragraph {
                    raw_line: "####### Seven".to_owned()
                },
                BlockEvent::Paragraph {
                    raw_line: "#NoSpace".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_simple_table() {
        let events = scan("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            events,
            vec![BlockEvent::Table(Table::new(vec![
                row(&["A", "B"]),
                row(&["1", "2"])
            ]))]
        );
    }

    #[test]
    fn test_one_table_per_contiguous_block() {
        let text = "| A |\n|---|\n| 1 |\n\n| B |\n| 2 |\n| 3 |";
        let tables: Vec<_> = scan(text)
            .into_iter()
            .filter_map(|e| match e {
                BlockEvent::Table(t) => Some(t.rows().len()),
                _ => None,
            })
            .collect();
        assert_eq!(tables, vec![2, 3]);
    }

    #[test]
    fn test_line_after_table_is_reclassified() {
        let events = scan("| A |\n| 1 |\n## Next");
        assert_eq!(
            events,
            vec![
                BlockEvent::Table(Table::new(vec![row(&["A"]), row(&["1"])])),
                BlockEvent::Heading {
                    level: 2,
                    text: "Next".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_separator_only_table_is_dropped() {
        assert_eq!(scan("|---|---|\ntext"), vec![BlockEvent::Paragraph {
            raw_line: "text".to_owned()
        }]);
    }

    #[test]
    fn test_pipe_in_prose_opens_table() {
        // Opens a table that yields no cells, so the line is swallowed.
        assert_eq!(scan("use a | b here\nnext"), vec![BlockEvent::Paragraph {
            raw_line: "next".to_owned()
        }]);
        assert_eq!(
            scan("x | y | z"),
            vec![BlockEvent::Table(Table::new(vec![row(&["y"])]))]
        );
    }

    #[test]
    fn test_code_block_is_verbatim() {
        let events = scan("```rust\n# not a heading\n| not | table |\n```\nafter");
        assert_eq!(
            events,
            vec![
                BlockEvent::CodeBlock {
                    language: Some("rust".to_owned()),
                    lines: vec![
                        "# not a heading".to_owned(),
                        "| not | table |".to_owned()
                    ],
                },
                BlockEvent::Paragraph {
                    raw_line: "after".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_unclosed_code_block_is_flushed() {
        assert_eq!(
            scan("```\nline one\n  line two"),
            vec![BlockEvent::CodeBlock {
                language: None,
                lines: vec!["line one".to_owned(), "  line two".to_owned()],
            }]
        );
    }

    #[test]
    fn test_fence_closes_open_table() {
        let events = scan("| A |\n```\ncode\n```");
        assert_eq!(
            events,
            vec![
                BlockEvent::Table(Table::new(vec![row(&["A"])])),
                BlockEvent::CodeBlock {
                    language: None,
                    lines: vec!["code".to_owned()],
                },
            ]
        );
    }

    #[test]
    fn test_line_kinds() {
        let text = "---\n> quoted  \n- bullet\n  * nested\n3. third\nplain *text*\n\n";
        assert_eq!(
            scan(text),
            vec![
                BlockEvent::Rule,
                BlockEvent::Blockquote {
                    text: "quoted".to_owned()
                },
                BlockEvent::BulletItem {
                    text: "bullet".to_owned()
                },
                BlockEvent::BulletItem {
                    text: "nested".to_owned()
                },
                BlockEvent::OrderedItem {
                    text: "third".to_owned()
                },
                BlockEvent::Paragraph {
                    raw_line: "plain *text*".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_rule_wins_over_bullet() {
        assert_eq!(scan("* * *"), vec![BlockEvent::BulletItem {
            text: "* *".to_owned()
        }]);
        assert_eq!(scan("***"), vec![BlockEvent::Rule]);
    }

    #[test]
    fn test_paragraph_keeps_indentation() {
        assert_eq!(scan("   indented"), vec![BlockEvent::Paragraph {
            raw_line: "   indented".to_owned()
        }]);
    }

    #[test]
    fn test_empty_input() {
        assert!(scan("").is_empty());
        assert!(scan("\n\n   \n").is_empty());
    }
}
