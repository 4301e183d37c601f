use std::sync::OnceLock;

use regex::Regex;

use super::{
    classify::{ClassifiedLine, LineKind},
    types::{Alignment, Block, Segment},
};

fn separator_regex() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| {
        Regex::new(r"^\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?$").expect("Invalid table separator regex")
    })
}

/// Whether `line` is a header/body separator such as `|:---|---:|`.
pub fn is_separator(line: &str) -> bool {
    separator_regex().is_match(line.trim())
}

/// Column alignments read from a separator line.
pub fn alignments(separator: &str) -> Vec<Alignment> {
    let trimmed = separator.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed
        .split('|')
        .map(|cell| {
            let cell = cell.trim();
            match (cell.starts_with(':'), cell.ends_with(':')) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            }
        })
        .collect()
}

fn row_cells(segment: &Segment) -> Option<&Vec<String>> {
    match segment {
        Segment::Line(ClassifiedLine {
            kind: LineKind::TableRow { cells },
            ..
        }) => Some(cells),
        _ => None,
    }
}

/// Recognises tables: a `TableRow` line immediately followed by a separator
/// line opens a table, and every directly following `TableRow` becomes a body
/// row. A row with no separator after it is left untouched for the paragraph
/// pass.
pub struct TableStateMachine;

impl TableStateMachine {
    pub fn group(segments: Vec<Segment>) -> Vec<Segment> {
        let mut out = Vec::with_capacity(segments.len());
        let mut i = 0;

        while i < segments.len() {
            let header = row_cells(&segments[i]);
            let separator = match segments.get(i + 1) {
                Some(Segment::Line(line)) if is_separator(&line.text) => Some(line),
                _ => None,
            };

            let (Some(header), Some(separator)) = (header, separator) else {
                out.push(segments[i].clone());
                i += 1;
                continue;
            };

            let header = header.clone();
            let alignments = alignments(&separator.text);
            i += 2;

            let mut rows = Vec::new();
            while let Some(cells) = segments.get(i).and_then(row_cells) {
                rows.push(cells.clone());
                i += 1;
            }

            out.push(Segment::Block(Block::Table {
                header,
                alignments,
                rows,
            }));
        }

        out
    }
}
