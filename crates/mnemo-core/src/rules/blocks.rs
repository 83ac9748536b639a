//! Level-1 heading block parser for instruction documents
//!
//! Splits a markdown document into a preamble plus one block per level-1
//! heading. Untouched blocks reassemble byte-exact, which keeps repeated
//! merges idempotent.

/// One parsed block of an instruction document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Heading text without the `# ` prefix; `None` for the preamble
    pub heading: Option<String>,
    /// Raw block text, heading line included, line endings preserved
    pub text: String,
}

/// Parse a document into a sequence of level-1 blocks.
///
/// Only lines starting with `# ` outside fenced code open a block. Text
/// before the first heading becomes a single preamble block. An empty
/// document parses to no blocks.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut in_fence = false;

    for line in text.split_inclusive('\n') {
        let stripped = line.trim_end_matches(['\n', '\r']);
        if stripped.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        let heading = if in_fence {
            None
        } else {
            stripped.strip_prefix("# ")
        };

        match heading {
            Some(heading) => blocks.push(Block {
                heading: Some(heading.to_string()),
                text: line.to_string(),
            }),
            None => match blocks.last_mut() {
                Some(last) => last.text.push_str(line),
                None => blocks.push(Block {
                    heading: None,
                    text: line.to_string(),
                }),
            },
        }
    }

    blocks
}

/// Reassemble blocks into a document
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(|b| b.text.as_str()).collect()
}

/// Demote level-1 headings to level-2, outside fenced code.
///
/// Applied to rule content before merging so a rule cannot terminate the
/// block it lives in.
pub fn demote_top_headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_fence = false;

    for line in text.split_inclusive('\n') {
        let stripped = line.trim_end_matches(['\n', '\r']);
        if stripped.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        if !in_fence && line.starts_with("# ") {
            out.push('#');
        }
        out.push_str(line);
    }

    out
}
