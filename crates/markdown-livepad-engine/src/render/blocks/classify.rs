use std::sync::OnceLock;

use regex::Regex;

/// What a single line looks like on its own, without surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading {
        level: u8,
        text: String,
    },
    Hr,
    Blockquote {
        text: String,
    },
    ListItem {
        ordered: bool,
        /// `Some` for task items, carrying whether the box is ticked.
        checked: Option<bool>,
        text: String,
    },
    TableRow {
        cells: Vec<String>,
    },
    PlainText,
}

/// A source line paired with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub text: String,
    pub kind: LineKind,
}

impl ClassifiedLine {
    pub fn new(text: &str) -> Self {
        Self {
            kind: classify(text),
            text: text.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

struct Patterns {
    heading: Regex,
    hr: Regex,
    blockquote: Regex,
    task: Regex,
    unordered: Regex,
    ordered: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        heading: Regex::new(r"^(#{1,6})\s+(.*)$").expect("Invalid heading regex"),
        hr: Regex::new(r"^\s*(-{3,}|\*{3,}|_{3,})\s*$").expect("Invalid hr regex"),
        // The pipeline classifies escaped text, where `>` reads `&gt;`.
        blockquote: Regex::new(r"^(?:>|&gt;)\s+(.*)$").expect("Invalid blockquote regex"),
        task: Regex::new(r"^\s*[-*+]\s+\[([ x])\]\s+(.*)$").expect("Invalid task regex"),
        unordered: Regex::new(r"^\s*[-*+]\s+(.*)$").expect("Invalid list regex"),
        ordered: Regex::new(r"^\s*\d+\.\s+(.*)$").expect("Invalid ordered list regex"),
    })
}

/// Classifies one line. Rules are tried in priority order; the first match wins.
pub fn classify(line: &str) -> LineKind {
    let p = patterns();

    if let Some(caps) = p.heading.captures(line) {
        return LineKind::Heading {
            level: caps[1].len() as u8,
            text: caps[2].trim().to_string(),
        };
    }
    if p.hr.is_match(line) {
        return LineKind::Hr;
    }
    if let Some(caps) = p.blockquote.captures(line) {
        return LineKind::Blockquote {
            text: caps[1].trim().to_string(),
        };
    }
    if let Some(caps) = p.task.captures(line) {
        return LineKind::ListItem {
            ordered: false,
            checked: Some(&caps[1] == "x"),
            text: caps[2].trim().to_string(),
        };
    }
    if let Some(caps) = p.unordered.captures(line) {
        return LineKind::ListItem {
            ordered: false,
            checked: None,
            text: caps[1].trim().to_string(),
        };
    }
    if let Some(caps) = p.ordered.captures(line) {
        return LineKind::ListItem {
            ordered: true,
            checked: None,
            text: caps[1].trim().to_string(),
        };
    }
    if let Some(cells) = table_cells(line) {
        return LineKind::TableRow { cells };
    }
    LineKind::PlainText
}

/// Splits a `| a | b |` line into trimmed cells. `\|` is a literal pipe.
fn table_cells(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('|') || !trimmed.ends_with('|') {
        return None;
    }
    let inner = &trimmed[1..trimmed.len() - 1];

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    Some(cells)
}
