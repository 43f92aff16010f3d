//! OPC package assembly.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::Result;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CORE_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const EXTENDED_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(crate) const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// In-memory set of package parts, written in path order.
#[derive(Debug, Default)]
pub(crate) struct Package {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    pub(crate) fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.parts.insert(path.into(), contents.into().into_bytes());
    }

    /// Add `docProps/core.xml` and `docProps/app.xml`.
    pub(crate) fn set_properties(&mut self, properties: &DocumentProperties) {
        self.set_string("docProps/core.xml", properties.core_xml());
        self.set_string("docProps/app.xml", app_xml());
    }

    pub(crate) fn write_to<W: Write + std::io::Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (path, contents) in &self.parts {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        Ok(zip.finish()?)
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }
}

/// Content-type override for one part.
pub(crate) struct Override<'a> {
    pub part: &'a str,
    pub content_type: &'a str,
}

/// `[Content_Types].xml` with the property parts appended.
pub(crate) fn content_types(overrides: &[Override<'_>]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    let properties = [
        Override {
            part: "/docProps/core.xml",
            content_type: "application/vnd.openxmlformats-package.core-properties+xml",
        },
        Override {
            part: "/docProps/app.xml",
            content_type: "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        },
    ];
    for o in overrides.iter().chain(&properties) {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            o.part, o.content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// Relationship part listing `(id, type, target)` entries.
pub(crate) fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Package-level `_rels/.rels` pointing at the main part and the properties.
pub(crate) fn root_relationships(main_part: &str) -> String {
    relationships(&[
        ("rId1", OFFICE_DOCUMENT_REL, main_part),
        ("rId2", CORE_PROPERTIES_REL, "docProps/core.xml"),
        ("rId3", EXTENDED_PROPERTIES_REL, "docProps/app.xml"),
    ])
}

/// Metadata stored in `docProps/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentProperties {
    pub title: String,
    pub created: DateTime<Utc>,
}

impl DocumentProperties {
    /// Properties stamped with the current time.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created: Utc::now(),
        }
    }

    fn core_xml(&self) -> String {
        let created = self.created.format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            concat!(
                "{decl}",
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{title}</dc:title>",
                "<dc:creator>mdr</dc:creator>",
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
                r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>"#,
                "</cp:coreProperties>"
            ),
            decl = XML_DECLARATION,
            title = escape_xml(&self.title),
            created = created,
        )
    }
}

fn app_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            "<Application>mdr</Application>",
            "</Properties>"
        ),
        XML_DECLARATION
    )
}

/// Escape text for XML content and attribute values.
///
/// Characters outside the XML 1.0 `Char` production are dropped, since a
/// single one makes Word and Excel reject the whole package.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if is_xml_char(c) => escaped.push(c),
            _ => {}
        }
    }
    escaped
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_xml_drops_forbidden_chars() {
        assert_eq!(
            escape_xml("a\u{0}b\u{1}c\u{8}d\u{B}\u{C}e\u{1F}f\u{FFFE}\u{FFFF}g"),
            "abcdefg"
        );
        assert_eq!(escape_xml("tab\tnl\ncr\r"), "tab\tnl\ncr\r");
        assert_eq!(escape_xml("é \u{1F600}"), "é \u{1F600}");
    }

    #[test]
    fn test_package_roundtrip_sorted() {
        let mut package = Package::default();
        package.set_string("b.xml", "<b/>");
        package.set_string("a.xml", "<a/>");
        let bytes = package.to_bytes().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.file_names().count(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "a.xml");
        let mut contents = String::new();
        archive
            .by_name("b.xml")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "<b/>");
    }

    #[test]
    fn test_core_properties() {
        let properties = DocumentProperties {
            title: "R&D".to_owned(),
            created: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };
        let xml = properties.core_xml();
        assert!(xml.contains("<dc:title>R&amp;D</dc:title>"));
        assert!(xml.contains(">2024-05-01T12:30:00Z</dcterms:created>"));
    }

    #[test]
    fn test_content_types_include_properties() {
        let xml = content_types(&[Override {
            part: "/word/document.xml",
            content_type: "doc",
        }]);
        assert!(xml.contains(r#"<Override PartName="/word/document.xml" ContentType="doc"/>"#));
        assert!(xml.contains(r#"PartName="/docProps/core.xml""#));
        assert!(xml.ends_with("</Types>"));
    }
}
