use super::classify::ClassifiedLine;

/// Horizontal alignment of a table column, taken from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` value, if the column has an explicit alignment.
    pub fn css(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}

/// One entry of a list block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    /// `true` for `- [ ]` / `- [x]` items.
    pub is_task: bool,
    pub checked: bool,
}

/// A structurally classified unit of the document, produced during one render.
///
/// Text fields hold escaped source text; inline rules are applied when the
/// block is turned into HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Hr,
    Blockquote {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Table {
        header: Vec<String>,
        alignments: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    },
    /// A fenced code block; `id` keys the placeholder left by fence extraction.
    CodeBlock {
        id: usize,
        language: Option<String>,
        code: String,
    },
    Paragraph {
        text: String,
    },
    Raw {
        html: String,
    },
}

/// Work item flowing through the block state machines: either a line no
/// machine has claimed yet, or a block some machine has already built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Line(ClassifiedLine),
    Block(Block),
}
