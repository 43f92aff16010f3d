//! `PlantUML` server URL encoding.
//!
//! Diagrams are never rendered locally. The source is normalized, compressed
//! with raw DEFLATE and written in `PlantUML`'s URL alphabet, producing an
//! `<img>` that points at `{server}/svg/{encoded}`.

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use mdr_renderer::{Preprocessor, escape_html};

use crate::consts::{DEFAULT_PLANTUML_SERVER, PLANTUML_PRIORITY};
use crate::kind::{DiagramKind, replace_blocks};

/// `PlantUML` URL alphabet: digits, upper, lower, `-`, `_`.
const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Error decoding a `PlantUML` encoded string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid symbol {0:?}")]
    InvalidSymbol(char),
    #[error("dangling symbol at end of input")]
    DanglingSymbol,
}

/// Wrap source in `@startuml`/`@enduml` unless it already opens with `@start`.
#[must_use]
pub fn normalize_source(source: &str) -> String {
    if source.starts_with("@start") {
        source.to_owned()
    } else {
        format!("@startuml\n{source}\n@enduml")
    }
}

/// Encode bytes with the `PlantUML` alphabet.
///
/// Every 3 bytes become 4 symbols. A trailing 2-byte group becomes 3
/// symbols and a trailing single byte becomes 2.
#[must_use]
pub fn encode64(data: &[u8]) -> String {
    let symbol = |index: u8| char::from(ALPHABET[usize::from(index & 0x3F)]);
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        match *chunk {
            [b1, b2, b3] => {
                out.push(symbol(b1 >> 2));
                out.push(symbol(((b1 & 0x3) << 4) | (b2 >> 4)));
                out.push(symbol(((b2 & 0xF) << 2) | (b3 >> 6)));
                out.push(symbol(b3));
            }
            [b1, b2] => {
                out.push(symbol(b1 >> 2));
                out.push(symbol(((b1 & 0x3) << 4) | (b2 >> 4)));
                out.push(symbol((b2 & 0xF) << 2));
            }
            [b1] => {
                out.push(symbol(b1 >> 2));
                out.push(symbol((b1 & 0x3) << 4));
            }
            _ => {}
        }
    }

    out
}

/// Decode a string produced by [`encode64`].
pub fn decode64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let values = encoded
        .chars()
        .map(|c| {
            u8::try_from(c)
                .ok()
                .and_then(|b| ALPHABET.iter().position(|&a| a == b))
                .and_then(|pos| u8::try_from(pos).ok())
                .ok_or(DecodeError::InvalidSymbol(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let mut out = Vec::with_capacity(values.len() * 3 / 4);
    for group in values.chunks(4) {
        match *group {
            [s1, s2, s3, s4] => {
                out.push((s1 << 2) | (s2 >> 4));
                out.push((s2 << 4) | (s3 >> 2));
                out.push((s3 << 6) | s4);
            }
            [s1, s2, s3] => {
                out.push((s1 << 2) | (s2 >> 4));
                out.push((s2 << 4) | (s3 >> 2));
            }
            [s1, s2] => out.push((s1 << 2) | (s2 >> 4)),
            _ => return Err(DecodeError::DanglingSymbol),
        }
    }

    Ok(out)
}

/// Compress with raw DEFLATE (no zlib header or checksum trailer).
fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Encode diagram source into the path segment used by `PlantUML` servers.
///
/// The source is normalized first.
pub fn encode_source(source: &str) -> std::io::Result<String> {
    let compressed = deflate(normalize_source(source).as_bytes())?;
    Ok(encode64(&compressed))
}

/// Build the SVG URL for a diagram on a `PlantUML` server.
pub fn svg_url(server: &str, source: &str) -> std::io::Result<String> {
    Ok(format!(
        "{}/svg/{}",
        server.trim_end_matches('/'),
        encode_source(source)?
    ))
}

/// Preprocessor replacing fenced `plantuml` blocks with server-rendered images.
#[derive(Debug, Clone)]
pub struct PlantUmlPreprocessor {
    server: String,
}

impl PlantUmlPreprocessor {
    #[must_use]
    pub fn new(server: impl Into<String>) -> Self {
        let server: String = server.into();
        Self {
            server: server.trim_end_matches('/').to_owned(),
        }
    }

    /// Server base URL without trailing slash.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Markup for one diagram.
    ///
    /// Compression into memory cannot fail in practice. If it does, the
    /// source is kept visible as a code block instead.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match svg_url(&self.server, source) {
            Ok(url) => format!(
                r#"<div class="plantuml-diagram"><img src="{}" alt="PlantUML Diagram" /></div>"#,
                escape_html(&url)
            ),
            Err(e) => {
                tracing::debug!(error = %e, "PlantUML encoding failed; keeping source");
                format!(
                    r#"<pre class="plantuml">{}</pre>"#,
                    escape_html(source)
                )
            }
        }
    }
}

impl Default for PlantUmlPreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_PLANTUML_SERVER)
    }
}

impl Preprocessor for PlantUmlPreprocessor {
    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn priority(&self) -> i32 {
        PLANTUML_PRIORITY
    }

    fn run(&self, text: &str) -> String {
        replace_blocks(DiagramKind::PlantUml, text, |block| self.render(&block.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn inflate(data: &[u8]) -> String {
        let mut out = String::new();
        DeflateDecoder::new(data).read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_normalize_wraps_bare_source() {
        assert_eq!(
            normalize_source("Alice -> Bob"),
            "@startuml\nAlice -> Bob\n@enduml"
        );
        assert_eq!(
            normalize_source("@startmindmap\n* root\n@endmindmap"),
            "@startmindmap\n* root\n@endmindmap"
        );
    }

    #[test]
    fn test_encode64_groups() {
        assert_eq!(encode64(&[]), "");
        assert_eq!(encode64(&[0, 0, 0]), "0000");
        assert_eq!(encode64(&[0xFF, 0xFF, 0xFF]), "____");
        assert_eq!(encode64(&[0xFF, 0xFF]), "__y");
        assert_eq!(encode64(&[0xFF]), "_m");
        assert_eq!(encode64(b"Man"), "JM5k");
    }

    #[test]
    fn test_decode64_inverts_encode64() {
        for len in 0..=10u8 {
            let data: Vec<u8> = (0..len).map(|i| i.wrapping_mul(37).wrapping_add(200)).collect();
            assert_eq!(decode64(&encode64(&data)).unwrap(), data);
        }
    }

    #[test]
    fn test_decode64_rejects_bad_input() {
        assert_eq!(decode64("ab+c"), Err(DecodeError::InvalidSymbol('+')));
        assert_eq!(decode64("abcde"), Err(DecodeError::DanglingSymbol));
    }

    #[test]
    fn test_encoded_source_inflates_to_normalized_source() {
        let encoded = encode_source("Alice -> Bob: hello").unwrap();
        let compressed = decode64(&encoded).unwrap();
        assert_eq!(inflate(&compressed), "@startuml\nAlice -> Bob: hello\n@enduml");
    }

    #[test]
    fn test_svg_url_trims_server_slash() {
        let url = svg_url("https://puml.example.com/plantuml/", "A -> B").unwrap();
        assert!(url.starts_with("https://puml.example.com/plantuml/svg/"));
        assert!(!url.contains("plantuml//svg"));
    }

    #[test]
    fn test_run_replaces_block() {
        let preprocessor = PlantUmlPreprocessor::default();
        let output = preprocessor.run("Before\n\n```plantuml\nA -> B\n```\n\nAfter");
        let expected_url = svg_url(DEFAULT_PLANTUML_SERVER, "A -> B").unwrap();
        assert_eq!(
            output,
            format!(
                "Before\n\n<div class=\"plantuml-diagram\"><img src=\"{expected_url}\" alt=\"PlantUML Diagram\" /></div>\n\nAfter"
            )
        );
    }

    #[test]
    fn test_run_leaves_other_fences() {
        let preprocessor = PlantUmlPreprocessor::default();
        let text = "```rust\nfn main() {}\n```";
        assert_eq!(preprocessor.run(text), text);
    }
}
