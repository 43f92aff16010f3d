//! Pipe table rows.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[\s\-:|]+\|$").unwrap());

/// One `|`-delimited line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Trimmed cells between the outer pipes.
    pub cells: Vec<String>,
    /// Header/body divider such as `|---|:--:|`.
    pub is_separator: bool,
}

impl TableRow {
    /// Parse a line containing `|`.
    ///
    /// Cells are the pieces between the first and last `|`-split segment.
    /// A line without leading and trailing pipes (`a | b`) therefore has no
    /// cells.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let pieces: Vec<&str> = line.split('|').collect();
        let cells = if pieces.len() > 2 {
            pieces[1..pieces.len() - 1]
                .iter()
                .map(|cell| cell.trim().to_owned())
                .collect()
        } else {
            Vec::new()
        };

        Self {
            cells,
            is_separator: SEPARATOR_ROW.is_match(line.trim()),
        }
    }
}

/// Table accumulated from consecutive pipe lines.
///
/// The first row is the header. Separator rows are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row; ragged rows are padded by consumers.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Append a parsed row unless it is a separator or has no cells.
    pub(crate) fn push(&mut self, row: TableRow) {
        if !row.is_separator && !row.cells.is_empty() {
            self.rows.push(row.cells);
        }
    }
}
