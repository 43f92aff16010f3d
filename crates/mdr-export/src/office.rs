//! Word and Excel output.

use mdr_blocks::{FlowDocument, Spreadsheet};
use mdr_ooxml::{DocxWriter, OoxmlError, XlsxWriter};

use crate::options::RenderOptions;

/// Renders markdown to a `.docx` document.
///
/// Diagrams are not resolved: fenced diagram sources appear as code blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordRenderer;

impl WordRenderer {
    pub fn render(self, markdown: &str, options: &RenderOptions) -> Result<Vec<u8>, OoxmlError> {
        let document = FlowDocument::from_markdown(&options.title, markdown);
        tracing::debug!(nodes = document.nodes.len(), "Writing DOCX");
        DocxWriter::new()
            .with_table_style(options.table_style.as_deref())
            .write(&document)
    }
}

/// Renders the tables of a markdown document to an `.xlsx` workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelRenderer;

impl ExcelRenderer {
    pub fn render(self, markdown: &str, options: &RenderOptions) -> Result<Vec<u8>, OoxmlError> {
        let sheet = Spreadsheet::from_markdown(&options.title, markdown);
        tracing::debug!(sheet = %sheet.sheet_name(), "Writing XLSX");
        XlsxWriter.write(&sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn part(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut contents = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    #[test]
    fn test_word_document() {
        let options = RenderOptions {
            table_style: Some("Light Grid".to_owned()),
            ..RenderOptions::default().with_title("Weekly")
        };
        let bytes = WordRenderer
            .render("# Hello World\n\n| A | B |\n|---|---|\n| 1 | 2 |", &options)
            .unwrap();

        let document = part(bytes.clone(), "word/document.xml");
        assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(document.contains(r#"<w:tblStyle w:val="LightGrid"/>"#));
        assert!(part(bytes, "docProps/core.xml").contains("<dc:title>Weekly</dc:title>"));
    }

    #[test]
    fn test_excel_workbook() {
        let bytes = ExcelRenderer
            .render("| A | B |\n|---|---|\n| 1 | 2 |", &RenderOptions::default())
            .unwrap();
        let sheet = part(bytes.clone(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<c r="A1" s="1" t="inlineStr">"#));
        assert!(sheet.contains(r#"<c r="B2" t="inlineStr">"#));
        assert!(part(bytes, "xl/workbook.xml").contains(r#"<sheet name="Document""#));
    }
}
