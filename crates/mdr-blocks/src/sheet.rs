//! Spreadsheet projection.
//!
//! Only tables survive. Documents without tables degrade to one line per row
//! under a title cell.

use crate::scanner::{BlockEvent, BlockScanner};
use crate::table::Table;

/// Excel's worksheet name limit.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Cap on computed column widths.
pub const MAX_COLUMN_WIDTH: usize = 50;

const FALLBACK_SHEET_NAME: &str = "Sheet1";
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
/// Name Excel reserves for its change-tracking sheet.
const RESERVED_SHEET_NAME: &str = "History";

/// Blank rows left between stacked tables.
const TABLE_GAP: u32 = 2;

/// First row of the line listing when there are no tables.
const LINES_START_ROW: u32 = 3;

/// What the sheet holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetContent {
    Tables(Vec<Table>),
    Lines(Vec<String>),
}

/// Single-sheet workbook model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spreadsheet {
    pub title: String,
    pub content: SheetContent,
}

/// Cell formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    /// Bold, centered.
    Header,
    /// Bold, 14pt.
    Title,
}

/// Positioned cell. Rows and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub column: u32,
    pub value: String,
    pub style: CellStyle,
}

/// Grid placement of a [`Spreadsheet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetLayout {
    pub cells: Vec<Cell>,
    /// Width per column, starting at column 1.
    pub column_widths: Vec<usize>,
}

impl SheetLayout {
    fn put(&mut self, row: u32, column: u32, value: &str, style: CellStyle) {
        self.cells.push(Cell {
            row,
            column,
            value: value.to_owned(),
            style,
        });
    }

    fn compute_widths(&mut self) {
        let mut widths: Vec<usize> = Vec::new();
        for cell in &self.cells {
            let index = (cell.column - 1) as usize;
            if widths.len() <= index {
                widths.resize(index + 1, 0);
            }
            let width = (cell.value.chars().count() + 2).min(MAX_COLUMN_WIDTH);
            widths[index] = widths[index].max(width);
        }
        self.column_widths = widths;
    }
}

impl Spreadsheet {
    /// Keep the `Table` events.
    pub fn project(title: impl Into<String>, events: impl IntoIterator<Item = BlockEvent>) -> Self {
        let tables = events
            .into_iter()
            .filter_map(|event| match event {
                BlockEvent::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        Self {
            title: title.into(),
            content: SheetContent::Tables(tables),
        }
    }

    /// Project `markdown`, falling back to its lines when it has no tables.
    pub fn from_markdown(title: impl Into<String>, markdown: &str) -> Self {
        let mut sheet = Self::project(title, BlockScanner::new(markdown));
        if matches!(&sheet.content, SheetContent::Tables(tables) if tables.is_empty()) {
            sheet.content = SheetContent::Lines(
                markdown.trim().lines().map(str::to_owned).collect(),
            );
        }
        sheet
    }

    /// Worksheet name derived from the title.
    #[must_use]
    pub fn sheet_name(&self) -> String {
        let name: String = self
            .title
            .chars()
            .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
            .take(MAX_SHEET_NAME_LEN)
            .collect();
        let name = name.trim().trim_matches('\'').trim();
        if name.is_empty() || name.eq_ignore_ascii_case(RESERVED_SHEET_NAME) {
            FALLBACK_SHEET_NAME.to_owned()
        } else {
            name.to_owned()
        }
    }

    /// Place the content on the grid.
    #[must_use]
    pub fn layout(&self) -> SheetLayout {
        let mut layout = SheetLayout::default();

        match &self.content {
            SheetContent::Tables(tables) => {
                let mut row = 1;
                for table in tables {
                    for (index, cells) in table.rows().iter().enumerate() {
                        let style = if index == 0 {
                            CellStyle::Header
                        } else {
                            CellStyle::Plain
                        };
                        for (column, value) in (1..).zip(cells) {
                            layout.put(row, column, value, style);
                        }
                        row += 1;
                    }
                    row += TABLE_GAP;
                }
            }
            SheetContent::Lines(lines) => {
                layout.put(1, 1, &self.title, CellStyle::Title);
                for (row, line) in (LINES_START_ROW..).zip(lines) {
                    if !line.is_empty() {
                        layout.put(row, 1, line, CellStyle::Plain);
                    }
                }
            }
        }

        layout.compute_widths();
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(row: u32, column: u32, value: &str, style: CellStyle) -> Cell {
        Cell {
            row,
            column,
            value: value.to_owned(),
            style,
        }
    }

    #[test]
    fn test_single_table_layout() {
        let sheet = Spreadsheet::from_markdown("Data", "| A | B |\n|---|---|\n| 1 | 2 |");
        let layout = sheet.layout();
        assert_eq!(
            layout.cells,
            vec![
                cell(1, 1, "A", CellStyle::Header),
                cell(1, 2, "B", CellStyle::Header),
                cell(2, 1, "1", CellStyle::Plain),
                cell(2, 2, "2", CellStyle::Plain),
            ]
        );
        assert_eq!(layout.column_widths, vec![3, 3]);
    }

    #[test]
    fn test_tables_are_stacked_with_gap() {
        let markdown = "| A |\n| 1 |\n\ntext between\n\n| B |\n| 2 |";
        let layout = Spreadsheet::from_markdown("T", markdown).layout();
        let rows: Vec<_> = layout.cells.iter().map(|c| (c.row, c.value.as_str())).collect();
        assert_eq!(rows, vec![(1, "A"), (2, "1"), (5, "B"), (6, "2")]);
        assert_eq!(layout.cells[2].style, CellStyle::Header);
    }

    #[test]
    fn test_no_tables_lists_lines() {
        let sheet = Spreadsheet::from_markdown("Notes", "\n# Heading\n\nbody line\n");
        assert_eq!(
            sheet.content,
            SheetContent::Lines(vec![
                "# Heading".to_owned(),
                String::new(),
                "body line".to_owned()
            ])
        );
        assert_eq!(
            sheet.layout().cells,
            vec![
                cell(1, 1, "Notes", CellStyle::Title),
                cell(3, 1, "# Heading", CellStyle::Plain),
                cell(5, 1, "body line", CellStyle::Plain),
            ]
        );
    }

    #[test]
    fn test_column_width_is_capped() {
        let long = "x".repeat(80);
        let sheet = Spreadsheet::project(
            "T",
            vec![BlockEvent::Table(Table::new(vec![vec![long], vec!["y".to_owned()]]))],
        );
        assert_eq!(sheet.layout().column_widths, vec![MAX_COLUMN_WIDTH]);
    }

    #[test]
    fn test_sheet_name_sanitized() {
        let sheet = |title: &str| Spreadsheet {
            title: title.to_owned(),
            content: SheetContent::Lines(Vec::new()),
        };
        assert_eq!(sheet("Q1 [draft]: a/b").sheet_name(), "Q1 draft ab");
        assert_eq!(sheet("???").sheet_name(), "Sheet1");
        assert_eq!(sheet(&"n".repeat(40)).sheet_name().len(), MAX_SHEET_NAME_LEN);
        assert_eq!(sheet("'Budget' 2024'").sheet_name(), "Budget' 2024");
        assert_eq!(sheet("''").sheet_name(), "Sheet1");
        assert_eq!(sheet("History").sheet_name(), "Sheet1");
        assert_eq!(sheet(" history ").sheet_name(), "Sheet1");
        assert_eq!(sheet("History 2024").sheet_name(), "History 2024");
    }
}
