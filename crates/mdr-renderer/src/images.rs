//! Image reference extraction from raw markdown.

use std::sync::LazyLock;

use regex::Regex;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Image reference found in markdown source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    /// Alt text between the brackets.
    pub alt: String,
    /// Raw link target, including any title part.
    pub src: String,
}

/// Collect every inline image reference in document order.
#[must_use]
pub fn extract_images(markdown: &str) -> Vec<ImageRef> {
    IMAGE_RE
        .captures_iter(markdown)
        .map(|caps| ImageRef {
            alt: caps[1].to_owned(),
            src: caps[2].to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_images() {
        let images = extract_images("Intro ![Logo](img/logo.png) and ![](chart.svg)\n");
        assert_eq!(
            images,
            vec![
                ImageRef {
                    alt: "Logo".to_owned(),
                    src: "img/logo.png".to_owned(),
                },
                ImageRef {
                    alt: String::new(),
                    src: "chart.svg".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_links_are_not_images() {
        assert!(extract_images("[Docs](https://example.com)").is_empty());
    }
}
