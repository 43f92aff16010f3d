//! Output formats.

use std::fmt;
use std::str::FromStr;

/// Target document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Html,
    Pdf,
    Docx,
    Xlsx,
}

impl OutputFormat {
    /// Every supported format, in display order.
    pub const ALL: [Self; 4] = [Self::Html, Self::Pdf, Self::Docx, Self::Xlsx];

    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Whether the output is served as a download.
    #[must_use]
    pub fn is_attachment(self) -> bool {
        self != Self::Html
    }

    /// `html, pdf, docx, xlsx`
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|format| format.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Format name that matches no [`OutputFormat`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported format: {name}. Supported formats: {}", OutputFormat::supported_list())]
pub struct UnsupportedFormat {
    pub name: String,
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedFormat { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("Docx".parse::<OutputFormat>(), Ok(OutputFormat::Docx));
        assert_eq!("xlsx".parse::<OutputFormat>(), Ok(OutputFormat::Xlsx));
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported format: invalid. Supported formats: html, pdf, docx, xlsx"
        );
    }

    #[test]
    fn test_attachment_formats() {
        assert!(!OutputFormat::Html.is_attachment());
        assert!(OutputFormat::Pdf.is_attachment());
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
    }
}
