//! Supported diagram kinds and their fenced block patterns.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static MERMAID_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\s*\n(.*?)```").unwrap());

static PLANTUML_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```plantuml\s*\n(.*?)```").unwrap());

/// Diagram languages resolved before markdown parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Mermaid,
    PlantUml,
}

impl DiagramKind {
    /// Code fence tag for this kind. Matching is case-sensitive.
    #[must_use]
    pub fn fence_tag(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
        }
    }

    /// Pattern matching a fenced block of this kind.
    ///
    /// Group 1 captures the untrimmed source. Matching is non-greedy, so the
    /// first closing fence ends the block.
    fn block_pattern(self) -> &'static Regex {
        match self {
            Self::Mermaid => &MERMAID_BLOCK,
            Self::PlantUml => &PLANTUML_BLOCK,
        }
    }
}

/// Diagram block extracted from markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    pub kind: DiagramKind,
    /// Trimmed diagram source.
    pub source: String,
}

impl DiagramBlock {
    fn from_captures(kind: DiagramKind, caps: &Captures<'_>) -> Self {
        Self {
            kind,
            source: caps[1].trim().to_owned(),
        }
    }
}

/// Replace every fenced block of `kind` with the markup returned by `render`.
///
/// Blocks are visited in document order. Text outside the blocks is kept.
pub fn replace_blocks<F>(kind: DiagramKind, text: &str, mut render: F) -> String
where
    F: FnMut(&DiagramBlock) -> String,
{
    let mut count = 0usize;
    let replaced = kind
        .block_pattern()
        .replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            render(&DiagramBlock::from_captures(kind, caps))
        })
        .into_owned();
    if count > 0 {
        tracing::debug!(kind = kind.fence_tag(), count, "Resolved diagram blocks");
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(kind: DiagramKind, text: &str) -> (String, Vec<DiagramBlock>) {
        let mut blocks = Vec::new();
        let replaced = replace_blocks(kind, text, |block| {
            blocks.push(block.clone());
            format!("[{}]", blocks.len())
        });
        (replaced, blocks)
    }

    #[test]
    fn test_blocks_are_trimmed_in_order() {
        let text = "intro\n```mermaid\n\n  graph TD\n  A-->B\n\n```\nmid\n```mermaid\nsequenceDiagram\n```";
        let (replaced, blocks) = collect(DiagramKind::Mermaid, text);

        assert_eq!(replaced, "intro\n[1]\nmid\n[2]");
        assert_eq!(
            blocks,
            vec![
                DiagramBlock {
                    kind: DiagramKind::Mermaid,
                    source: "graph TD\n  A-->B".to_owned(),
                },
                DiagramBlock {
                    kind: DiagramKind::Mermaid,
                    source: "sequenceDiagram".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_other_kinds_untouched() {
        let text = "```plantuml\nA -> B\n```";
        let (replaced, blocks) = collect(DiagramKind::Mermaid, text);
        assert_eq!(replaced, text);
        assert!(blocks.is_empty());

        let (replaced, blocks) = collect(DiagramKind::PlantUml, text);
        assert_eq!(replaced, "[1]");
        assert_eq!(blocks[0].kind, DiagramKind::PlantUml);
    }

    #[test]
    fn test_fence_tag_is_case_sensitive() {
        let text = "```Mermaid\ngraph TD\n```";
        let (replaced, blocks) = collect(DiagramKind::Mermaid, text);
        assert_eq!(replaced, text);
        assert!(blocks.is_empty());
        assert_eq!(DiagramKind::Mermaid.fence_tag(), "mermaid");
    }
}
