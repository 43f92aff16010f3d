//! SpreadsheetML writer.

use std::collections::BTreeMap;

use mdr_blocks::{Cell, CellStyle, Spreadsheet};

use crate::error::Result;
use crate::package::{
    DocumentProperties, Override, Package, XML_DECLARATION, content_types, escape_xml,
    relationships, root_relationships,
};

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Serializes a [`Spreadsheet`] into a single-sheet `.xlsx` package.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    /// Build the package bytes.
    pub fn write(self, sheet: &Spreadsheet) -> Result<Vec<u8>> {
        let mut package = Package::default();
        package.set_string(
            "[Content_Types].xml",
            content_types(&[
                Override {
                    part: "/xl/workbook.xml",
                    content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
                },
                Override {
                    part: "/xl/worksheets/sheet1.xml",
                    content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
                },
                Override {
                    part: "/xl/styles.xml",
                    content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml",
                },
            ]),
        );
        package.set_string("_rels/.rels", root_relationships("xl/workbook.xml"));
        package.set_string("xl/workbook.xml", workbook_xml(&sheet.sheet_name()));
        package.set_string(
            "xl/_rels/workbook.xml.rels",
            relationships(&[
                (
                    "rId1",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet",
                    "worksheets/sheet1.xml",
                ),
                (
                    "rId2",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
                    "styles.xml",
                ),
            ]),
        );
        package.set_string("xl/worksheets/sheet1.xml", worksheet_xml(sheet));
        package.set_string("xl/styles.xml", STYLES_XML);
        package.set_properties(&DocumentProperties::new(&sheet.title));

        package.to_bytes()
    }
}

/// Spreadsheet column name for a 1-based index (`1` → `A`, `27` → `AA`).
#[must_use]
pub fn column_letter(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(remainder).unwrap_or(0)));
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<workbook xmlns="{ns}" xmlns:r="{rel}"><sheets>"#,
            r#"<sheet name="{name}" sheetId="1" r:id="rId1"/>"#,
            "</sheets></workbook>"
        ),
        decl = XML_DECLARATION,
        ns = SHEET_NS,
        rel = REL_NS,
        name = escape_xml(sheet_name),
    )
}

/// Style index into `cellXfs`.
fn style_index(style: CellStyle) -> u32 {
    match style {
        CellStyle::Plain => 0,
        CellStyle::Header => 1,
        CellStyle::Title => 2,
    }
}

fn worksheet_xml(sheet: &Spreadsheet) -> String {
    let layout = sheet.layout();

    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<worksheet xmlns="{SHEET_NS}">"#));

    if !layout.column_widths.is_empty() {
        xml.push_str("<cols>");
        for (column, width) in (1..).zip(&layout.column_widths) {
            xml.push_str(&format!(
                r#"<col min="{column}" max="{column}" width="{width}" customWidth="1"/>"#
            ));
        }
        xml.push_str("</cols>");
    }

    let mut rows: BTreeMap<u32, Vec<&Cell>> = BTreeMap::new();
    for cell in &layout.cells {
        rows.entry(cell.row).or_default().push(cell);
    }

    xml.push_str("<sheetData>");
    for (row, mut cells) in rows {
        cells.sort_by_key(|cell| cell.column);
        xml.push_str(&format!(r#"<row r="{row}">"#));
        for cell in cells {
            let reference = format!("{}{}", column_letter(cell.column), cell.row);
            let style = match style_index(cell.style) {
                0 => String::new(),
                index => format!(r#" s="{index}""#),
            };
            xml.push_str(&format!(
                r#"<c r="{reference}"{style} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                escape_xml(&cell.value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="3">"#,
    r#"<font><sz val="11"/><name val="Calibri"/></font>"#,
    r#"<font><b/><sz val="11"/><name val="Calibri"/></font>"#,
    r#"<font><b/><sz val="14"/><name val="Calibri"/></font>"#,
    "</fonts>",
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="3">"#,
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
    r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1" applyAlignment="1"><alignment horizontal="center"/></xf>"#,
    r#"<xf numFmtId="0" fontId="2" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#,
    "</cellXfs>",
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    "</styleSheet>"
);
