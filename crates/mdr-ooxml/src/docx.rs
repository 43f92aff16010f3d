//! WordprocessingML writer.

use mdr_blocks::{Emphasis, FlowDocument, FlowNode, InlineRun, Table};

use crate::error::Result;
use crate::package::{
    DocumentProperties, Override, Package, XML_DECLARATION, content_types, escape_xml,
    relationships, root_relationships,
};

/// Table style used when none is configured.
pub const DEFAULT_TABLE_STYLE: &str = "TableGrid";

const CODE_FONT: &str = "Consolas";
/// Half-points.
const CODE_FONT_SIZE: u32 = 20;

const BULLET_NUM_ID: u32 = 1;
const DECIMAL_NUM_ID: u32 = 2;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Serializes a [`FlowDocument`] into a `.docx` package.
#[derive(Debug, Clone)]
pub struct DocxWriter {
    table_style: String,
    output: String,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table_style: DEFAULT_TABLE_STYLE.to_owned(),
            output: String::new(),
        }
    }

    /// Use a named Word table style such as `Light Shading`.
    ///
    /// Spaces are removed to form the style id.
    #[must_use]
    pub fn with_table_style(mut self, name: Option<&str>) -> Self {
        if let Some(name) = name {
            let id: String = name.chars().filter(|c| !c.is_whitespace()).collect();
            if !id.is_empty() {
                self.table_style = id;
            }
        }
        self
    }

    pub fn table_style(&self) -> &str {
        &self.table_style
    }

    /// Build the package bytes.
    pub fn write(mut self, document: &FlowDocument) -> Result<Vec<u8>> {
        let document_xml = self.document_xml(document);
        let styles_xml = styles_xml(&self.table_style);

        let mut package = Package::default();
        package.set_string(
            "[Content_Types].xml",
            content_types(&[
                Override {
                    part: "/word/document.xml",
                    content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                },
                Override {
                    part: "/word/styles.xml",
                    content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
                },
                Override {
                    part: "/word/numbering.xml",
                    content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
                },
            ]),
        );
        package.set_string("_rels/.rels", root_relationships("word/document.xml"));
        package.set_string(
            "word/_rels/document.xml.rels",
            relationships(&[
                (
                    "rId1",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
                    "styles.xml",
                ),
                (
                    "rId2",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering",
                    "numbering.xml",
                ),
            ]),
        );
        package.set_string("word/document.xml", document_xml);
        package.set_string("word/styles.xml", styles_xml);
        package.set_string("word/numbering.xml", numbering_xml());
        package.set_properties(&DocumentProperties::new(&document.title));

        package.to_bytes()
    }

    fn document_xml(&mut self, document: &FlowDocument) -> String {
        self.output.clear();
        self.output.push_str(XML_DECLARATION);
        self.output
            .push_str(&format!(r#"<w:document xmlns:w="{WORD_NS}"><w:body>"#));

        self.styled_paragraph("Title", &document.title);
        for node in &document.nodes {
            self.generate_node(node);
        }

        self.output.push_str(concat!(
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#,
            "</w:sectPr></w:body></w:document>"
        ));
        std::mem::take(&mut self.output)
    }

    fn generate_node(&mut self, node: &FlowNode) {
        match node {
            FlowNode::Heading { level, text } => {
                self.styled_paragraph(&format!("Heading{level}"), text);
            }
            FlowNode::Paragraph(runs) => self.paragraph(runs),
            FlowNode::Table(table) => self.generate_table(table),
            FlowNode::BulletItem(text) => self.styled_paragraph("ListBullet", text),
            FlowNode::NumberedItem(text) => self.styled_paragraph("ListNumber", text),
            FlowNode::CodeBlock(code) => self.code_block(code),
            FlowNode::Quote(text) => self.styled_paragraph("Quote", text),
            FlowNode::Rule => {
                self.output.push_str("<w:p>");
                self.text_run(&FlowNode::rule_text(), Emphasis::Plain);
                self.output.push_str("</w:p>");
            }
        }
    }

    fn styled_paragraph(&mut self, style: &str, text: &str) {
        self.output.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            escape_xml(style)
        ));
        self.text_run(text, Emphasis::Plain);
        self.output.push_str("</w:p>");
    }

    fn paragraph(&mut self, runs: &[InlineRun]) {
        self.output.push_str("<w:p>");
        for run in runs {
            self.text_run(&run.text, run.emphasis);
        }
        self.output.push_str("</w:p>");
    }

    fn code_block(&mut self, code: &str) {
        self.output
            .push_str(r#"<w:p><w:pPr><w:pStyle w:val="Code"/></w:pPr><w:r>"#);
        self.code_run_properties();
        for (index, line) in code.split('\n').enumerate() {
            if index > 0 {
                self.output.push_str("<w:br/>");
            }
            self.text(line);
        }
        self.output.push_str("</w:r></w:p>");
    }

    fn text_run(&mut self, text: &str, emphasis: Emphasis) {
        self.output.push_str("<w:r>");
        match emphasis {
            Emphasis::Plain => {}
            Emphasis::Bold => self.output.push_str("<w:rPr><w:b/></w:rPr>"),
            Emphasis::Italic => self.output.push_str("<w:rPr><w:i/></w:rPr>"),
            Emphasis::Code => self.code_run_properties(),
        }
        self.text(text);
        self.output.push_str("</w:r>");
    }

    fn code_run_properties(&mut self) {
        self.output.push_str(&format!(
            r#"<w:rPr><w:rFonts w:ascii="{CODE_FONT}" w:hAnsi="{CODE_FONT}" w:cs="{CODE_FONT}"/><w:sz w:val="{CODE_FONT_SIZE}"/><w:szCs w:val="{CODE_FONT_SIZE}"/></w:rPr>"#
        ));
    }

    fn text(&mut self, text: &str) {
        self.output.push_str(r#"<w:t xml:space="preserve">"#);
        self.output.push_str(&escape_xml(text));
        self.output.push_str("</w:t>");
    }

    fn generate_table(&mut self, table: &Table) {
        let columns = table.column_count();
        if columns == 0 {
            return;
        }

        self.output.push_str(&format!(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="{}"/><w:tblW w:w="5000" w:type="pct"/></w:tblPr>"#,
            escape_xml(&self.table_style)
        ));
        self.output.push_str("<w:tblGrid>");
        for _ in 0..columns {
            self.output.push_str(r#"<w:gridCol w:w="2000"/>"#);
        }
        self.output.push_str("</w:tblGrid>");

        for (index, row) in table.rows().iter().enumerate() {
            let is_header = index == 0;
            self.output.push_str("<w:tr>");
            if is_header {
                self.output.push_str("<w:trPr><w:tblHeader/></w:trPr>");
            }
            for column in 0..columns {
                let value = row.get(column).map_or("", String::as_str);
                self.output.push_str("<w:tc><w:p>");
                if !value.is_empty() {
                    let emphasis = if is_header {
                        Emphasis::Bold
                    } else {
                        Emphasis::Plain
                    };
                    self.text_run(value, emphasis);
                }
                self.output.push_str("</w:p></w:tc>");
            }
            self.output.push_str("</w:tr>");
        }

        self.output.push_str("</w:tbl>");
        // Word merges adjacent tables without a paragraph between them.
        self.output.push_str("<w:p/>");
    }
}

fn styles_xml(table_style: &str) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<w:styles xmlns:w="{WORD_NS}">"#));
    xml.push_str(concat!(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#,
        r#"<w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault>"#,
        r#"<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
        "</w:docDefaults>",
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/>"#,
        r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:jc w:val="center"/><w:spacing w:after="240"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr></w:style>"#,
    ));

    for (level, size) in (1..=6).zip([32, 28, 26, 24, 22, 22]) {
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/>"#,
                r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
                r#"<w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{outline}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:style>"#
            ),
            level = level,
            outline = level - 1,
            size = size,
        ));
    }

    xml.push_str(&format!(
        concat!(
            r#"<w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/><w:basedOn w:val="Normal"/>"#,
            r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:ind w:left="864" w:right="864"/></w:pPr>"#,
            r#"<w:rPr><w:i/><w:color w:val="404040"/></w:rPr></w:style>"#,
            r#"<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/>"#,
            r#"<w:pPr><w:numPr><w:numId w:val="{bullet}"/></w:numPr><w:spacing w:after="0"/></w:pPr></w:style>"#,
            r#"<w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/><w:basedOn w:val="Normal"/>"#,
            r#"<w:pPr><w:numPr><w:numId w:val="{decimal}"/></w:numPr><w:spacing w:after="0"/></w:pPr></w:style>"#,
            r#"<w:style w:type="paragraph" w:styleId="Code"><w:name w:val="Code"/><w:basedOn w:val="Normal"/>"#,
            r#"<w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr>"#,
            r#"<w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/><w:sz w:val="{size}"/></w:rPr></w:style>"#
        ),
        bullet = BULLET_NUM_ID,
        decimal = DECIMAL_NUM_ID,
        font = CODE_FONT,
        size = CODE_FONT_SIZE,
    ));

    xml.push_str(&table_style_xml(DEFAULT_TABLE_STYLE, "Table Grid", None));
    if table_style != DEFAULT_TABLE_STYLE {
        xml.push_str(&table_style_xml(
            table_style,
            table_style,
            Some(DEFAULT_TABLE_STYLE),
        ));
    }

    xml.push_str("</w:styles>");
    xml
}

fn table_style_xml(id: &str, name: &str, based_on: Option<&str>) -> String {
    let id = escape_xml(id);
    let name = escape_xml(name);
    let based_on = based_on
        .map(|b| format!(r#"<w:basedOn w:val="{}"/>"#, escape_xml(b)))
        .unwrap_or_default();
    let border = |side: &str| format!(r#"<w:{side} w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#);
    let borders: String = ["top", "left", "bottom", "right", "insideH", "insideV"]
        .into_iter()
        .map(border)
        .collect();
    format!(
        concat!(
            r#"<w:style w:type="table" w:styleId="{id}"><w:name w:val="{name}"/>{based_on}"#,
            r#"<w:tblPr><w:tblBorders>{borders}</w:tblBorders>"#,
            r#"<w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar>"#,
            "</w:tblPr></w:style>"
        ),
        id = id,
        name = name,
        based_on = based_on,
        borders = borders,
    )
}

fn numbering_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<w:numbering xmlns:w="{WORD_NS}">"#));
    xml.push_str(concat!(
        r#"<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/>"#,
        r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/>"#,
        r#"<w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>"#,
        r#"<w:abstractNum w:abstractNumId="1"><w:multiLevelType w:val="singleLevel"/>"#,
        r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/>"#,
        r#"<w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>"#,
    ));
    xml.push_str(&format!(
        r#"<w:num w:numId="{BULLET_NUM_ID}"><w:abstractNumId w:val="0"/></w:num><w:num w:numId="{DECIMAL_NUM_ID}"><w:abstractNumId w:val="1"/></w:num>"#
    ));
    xml.push_str("</w:numbering>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut contents = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    fn document(markdown: &str) -> String {
        let mut writer = DocxWriter::new();
        writer.document_xml(&FlowDocument::from_markdown("Report", markdown))
    }

    #[test]
    fn test_package_parts() {
        let bytes = DocxWriter::new()
            .write(&FlowDocument::from_markdown("Report", "# Hello"))
            .unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<_> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/numbering.xml",
                "word/styles.xml",
            ]
        );
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Report</dc:title>"));
    }

    #[test]
    fn test_title_and_heading() {
        let xml = document("## Section");
        assert!(xml.contains(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t xml:space="preserve">Report</w:t></w:r></w:p>"#
        ));
        assert!(xml.contains(
            r#"<w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t xml:space="preserve">Section</w:t>"#
        ));
    }

    #[test]
    fn test_inline_runs() {
        let xml = document("a **b** *c* `d`");
        assert!(xml.contains(r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">b</w:t></w:r>"#));
        assert!(xml.contains(r#"<w:r><w:rPr><w:i/></w:rPr><w:t xml:space="preserve">c</w:t></w:r>"#));
        assert!(xml.contains(r#"<w:rFonts w:ascii="Consolas""#));
    }

    #[test]
    fn test_table_header_bold_and_padded() {
        let xml = document("| A | B |\n|---|---|\n| 1 |");
        assert!(xml.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));
        assert_eq!(xml.matches("<w:gridCol ").count(), 2);
        assert_eq!(xml.matches("<w:tc>").count(), 4);
        assert!(xml.contains(r#"<w:rPr><w:b/></w:rPr><w:t xml:space="preserve">A</w:t>"#));
        assert!(xml.contains(r#"<w:r><w:t xml:space="preserve">1</w:t></w:r>"#));
    }

    #[test]
    fn test_code_block_lines() {
        let xml = document("```\nx < 1\ny\n```");
        assert!(xml.contains(r#"<w:pStyle w:val="Code"/>"#));
        assert!(xml.contains(
            r#"<w:t xml:space="preserve">x &lt; 1</w:t><w:br/><w:t xml:space="preserve">y</w:t>"#
        ));
    }

    #[test]
    fn test_list_quote_and_rule_styles() {
        let xml = document("- a\n1. b\n> c\n---");
        assert!(xml.contains(r#"<w:pStyle w:val="ListBullet"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="ListNumber"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Quote"/>"#));
        assert!(xml.contains(&FlowNode::rule_text()));
    }

    #[test]
    fn test_custom_table_style() {
        let writer = DocxWriter::new().with_table_style(Some("Light Shading"));
        assert_eq!(writer.table_style(), "LightShading");
        let styles = styles_xml(writer.table_style());
        assert!(styles.contains(r#"w:styleId="LightShading"><w:name w:val="LightShading"/><w:basedOn w:val="TableGrid"/>"#));

        let writer = DocxWriter::new().with_table_style(Some("  "));
        assert_eq!(writer.table_style(), DEFAULT_TABLE_STYLE);
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let bytes = DocxWriter::new()
            .write(&FlowDocument::from_markdown(
                "Form\u{C}feed",
                "page one\u{C}page two\u{1}\n\n| a\u{8} | b |",
            ))
            .unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("page onepage two"));
        assert!(xml.contains(r#"<w:t xml:space="preserve">a</w:t>"#));
        assert!(!xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Formfeed</dc:title>"));
    }

    #[test]
    fn test_numbering_definitions() {
        let xml = numbering_xml();
        assert!(xml.contains(r#"<w:numFmt w:val="bullet"/>"#));
        assert!(xml.contains(r#"<w:numFmt w:val="decimal"/>"#));
        assert!(xml.contains(r#"<w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>"#));
    }
}
