use super::types::{Block, Segment};

/// Turns the lines no other machine claimed into paragraphs.
///
/// Consecutive non-blank lines are joined with a single space. A blank line,
/// an already-built block or a line of raw HTML (starting with `<`) ends the
/// current paragraph without joining it. Raw lines pass through untouched.
pub struct ParagraphAssembler {
    pending: Vec<String>,
    out: Vec<Block>,
}

impl ParagraphAssembler {
    pub fn new() -> Self {
        Self {
            pending: vec![],
            out: vec![],
        }
    }

    pub fn assemble(segments: Vec<Segment>) -> Vec<Block> {
        let mut assembler = Self::new();
        for segment in segments {
            assembler.push(segment);
        }
        assembler.finish()
    }

    pub fn push(&mut self, segment: Segment) {
        match segment {
            Segment::Block(block) => {
                self.flush();
                self.out.push(block);
            }
            Segment::Line(line) if line.is_blank() => self.flush(),
            Segment::Line(line) if line.text.trim_start().starts_with('<') => {
                self.flush();
                self.out.push(Block::Raw { html: line.text });
            }
            Segment::Line(line) => self.pending.push(line.text.trim().to_string()),
        }
    }

    pub fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.out
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending).join(" ");
        self.out.push(Block::Paragraph { text });
    }
}

impl Default for ParagraphAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::blocks::classify::ClassifiedLine;
    use pretty_assertions::assert_eq;

    fn line(text: &str) -> Segment {
        Segment::Line(ClassifiedLine::new(text))
    }

    fn para(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn joins_consecutive_lines_with_a_space() {
        let out = ParagraphAssembler::assemble(vec![line("one"), line("  two  "), line("three")]);
        assert_eq!(out, vec![para("one two three")]);
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        let out = ParagraphAssembler::assemble(vec![line("a"), line(""), line("   "), line("b")]);
        assert_eq!(out, vec![para("a"), para("b")]);
    }

    #[test]
    fn blocks_end_the_paragraph_and_keep_their_place() {
        let out = ParagraphAssembler::assemble(vec![
            line("before"),
            Segment::Block(Block::Hr),
            line("after"),
        ]);
        assert_eq!(out, vec![para("before"), Block::Hr, para("after")]);
    }

    #[test]
    fn raw_html_line_is_a_boundary() {
        let out = ParagraphAssembler::assemble(vec![
            line("text"),
            line("<div>built</div>"),
            line("more"),
        ]);
        assert_eq!(
            out,
            vec![
                para("text"),
                Block::Raw {
                    html: "<div>built</div>".to_string()
                },
                para("more"),
            ]
        );
    }

    #[test]
    fn only_blank_lines_produce_nothing() {
        assert!(ParagraphAssembler::assemble(vec![line(""), line("")]).is_empty());
    }
}
