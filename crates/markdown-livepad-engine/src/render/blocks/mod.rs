//! # Block Parsing
//!
//! Line-oriented block recognition over the escaped, fence-extracted document.
//!
//! ## Passes
//!
//! 1. **Classification** (`classify`): every line gets a `LineKind` from local
//!    facts only. Fence placeholder lines become `CodeBlock`s directly.
//! 2. **Lists** (`list`): `ListStateMachine` claims runs of list items.
//! 3. **Tables** (`table`): `TableStateMachine` claims header + separator + rows.
//! 4. **Single-line blocks**: headings, rules and quotes are lifted in place.
//! 5. **Paragraphs** (`paragraph`): `ParagraphAssembler` joins what is left.
//!
//! Malformed input never errors. A line no machine claims falls through to the
//! paragraph pass as text.

pub mod classify;
pub mod list;
pub mod paragraph;
pub mod table;
pub mod types;

pub use classify::{ClassifiedLine, LineKind, classify};
pub use list::ListStateMachine;
pub use paragraph::ParagraphAssembler;
pub use table::TableStateMachine;
pub use types::{Alignment, Block, ListItem, Segment};

use super::fence::Extracted;

/// Classifies every line of the extracted document. Fence placeholders are
/// resolved to `CodeBlock`s so no later pass can claim them.
pub fn classify_lines(doc: &Extracted) -> Vec<Segment> {
    doc.text
        .split('\n')
        .map(|line| match doc.fence_for_line(line) {
            Some(fence) => Segment::Block(Block::CodeBlock {
                id: fence.id,
                language: fence.language.clone(),
                code: fence.code.clone(),
            }),
            None => Segment::Line(ClassifiedLine::new(line)),
        })
        .collect()
}

/// Converts heading, rule and quote lines into their blocks in place.
pub fn lift_single_line_blocks(segments: Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Line(line) => match line.kind {
                LineKind::Heading { level, text } => Segment::Block(Block::Heading { level, text }),
                LineKind::Hr => Segment::Block(Block::Hr),
                LineKind::Blockquote { text } => Segment::Block(Block::Blockquote { text }),
                kind => Segment::Line(ClassifiedLine {
                    text: line.text,
                    kind,
                }),
            },
            block => block,
        })
        .collect()
}

/// Runs every block pass except paragraph assembly.
pub fn group(doc: &Extracted) -> Vec<Segment> {
    let segments = classify_lines(doc);
    let segments = ListStateMachine::group(segments);
    let segments = TableStateMachine::group(segments);
    lift_single_line_blocks(segments)
}

/// Parses an extracted document into its block sequence.
pub fn parse(doc: &Extracted) -> Vec<Block> {
    ParagraphAssembler::assemble(group(doc))
}
