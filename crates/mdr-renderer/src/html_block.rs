//! Markdown inside block-level HTML.
//!
//! An HTML element that opens at the start of a line and carries
//! `markdown="1"` has its content parsed as markdown. Everything else is raw
//! HTML and passes through untouched.

use std::sync::LazyLock;

use regex::Regex;

static MARKDOWN_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^<([A-Za-z][A-Za-z0-9-]*)([^>]*?)\s+markdown=["']?1["']?([^>]*)>"#).unwrap()
});

/// Piece of a document split at markdown-enabled HTML elements.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Markdown(&'a str),
    Element {
        /// Opening tag with the `markdown` attribute removed.
        open: String,
        /// Element content, itself split again by the caller.
        inner: &'a str,
        close: &'a str,
    },
}

/// Split `text` into markdown runs and markdown-enabled elements.
///
/// An opening tag without a matching close tag is left as markdown.
pub(crate) fn split(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut markdown_start = 0;
    let mut search_from = 0;

    while let Some(caps) = MARKDOWN_ELEMENT.captures_at(text, search_from) {
        let Some(open_tag) = caps.get(0) else {
            break;
        };
        let tag = &caps[1];
        let Some((close_start, close_end)) = find_close(text, open_tag.end(), tag) else {
            search_from = open_tag.end();
            continue;
        };

        if open_tag.start() > markdown_start {
            segments.push(Segment::Markdown(&text[markdown_start..open_tag.start()]));
        }
        segments.push(Segment::Element {
            open: format!("<{tag}{}{}>", &caps[2], &caps[3]),
            inner: &text[open_tag.end()..close_start],
            close: &text[close_start..close_end],
        });
        markdown_start = close_end;
        search_from = close_end;
    }

    if markdown_start < text.len() {
        segments.push(Segment::Markdown(&text[markdown_start..]));
    }
    segments
}

/// Byte range of the close tag balancing an element opened before `from`.
fn find_close(text: &str, from: usize, tag: &str) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(offset) = text[pos..].find('<') {
        let at = pos + offset;
        let rest = &text[at..];
        if starts_tag(rest, &close) {
            depth -= 1;
            if depth == 0 {
                return Some((at, at + rest.find('>')? + 1));
            }
        } else if starts_tag(rest, &open) {
            depth += 1;
        }
        pos = at + 1;
    }
    None
}

fn starts_tag(rest: &str, prefix: &str) -> bool {
    rest.strip_prefix(prefix)
        .is_some_and(|after| after.starts_with(|c: char| c == '>' || c.is_whitespace()))
}
