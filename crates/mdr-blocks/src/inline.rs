//! Inline emphasis tokenizer for flow documents.

use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*[^*]+\*\*|\*[^*]+\*|`[^`]+`").unwrap());

/// Run style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Bold,
    Italic,
    Code,
}

/// Span of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub emphasis: Emphasis,
}

impl InlineRun {
    fn new(text: &str, emphasis: Emphasis) -> Self {
        Self {
            text: text.to_owned(),
            emphasis,
        }
    }
}

/// Split a line into styled runs.
///
/// `**bold**`, `*italic*` and `` `code` `` lose their delimiters. Everything
/// else, including unmatched delimiters, stays as plain text. Spans do not
/// nest.
#[must_use]
pub fn tokenize(line: &str) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for m in EMPHASIS.find_iter(line) {
        if m.start() > last {
            runs.push(InlineRun::new(&line[last..m.start()], Emphasis::Plain));
        }
        runs.push(classify(m.as_str()));
        last = m.end();
    }
    if last < line.len() {
        runs.push(InlineRun::new(&line[last..], Emphasis::Plain));
    }

    runs
}

fn classify(span: &str) -> InlineRun {
    if let Some(inner) = span.strip_prefix("**").and_then(|s| s.strip_suffix("**")) {
        InlineRun::new(inner, Emphasis::Bold)
    } else if let Some(inner) = span.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        InlineRun::new(inner, Emphasis::Code)
    } else {
        InlineRun::new(&span[1..span.len() - 1], Emphasis::Italic)
    }
}
