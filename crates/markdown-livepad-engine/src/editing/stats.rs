/// Counts shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub chars: usize,
    pub words: usize,
    /// Number of `\n`-separated lines; an empty document has one.
    pub lines: usize,
}

impl DocumentStats {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
        }
    }
}

/// 1-based line and column of a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    /// Counted in characters, not bytes.
    pub column: usize,
}

impl CursorPosition {
    /// Position of byte `offset` in `text`. Offsets past the end or inside a
    /// multi-byte character are moved back to the nearest boundary.
    pub fn at(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &text[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", 0, 0, 1)]
    #[case("one", 3, 1, 1)]
    #[case("  two words  ", 13, 2, 1)]
    #[case("a\nb\n", 4, 2, 3)]
    #[case("héllo wörld", 11, 2, 1)]
    fn stats(
        #[case] text: &str,
        #[case] chars: usize,
        #[case] words: usize,
        #[case] lines: usize,
    ) {
        assert_eq!(DocumentStats::of(text), DocumentStats { chars, words, lines });
    }

    #[rstest]
    #[case("abc", 0, 1, 1)]
    #[case("abc", 2, 1, 3)]
    #[case("ab\ncd", 3, 2, 1)]
    #[case("ab\ncd", 5, 2, 3)]
    #[case("ab\ncd", 99, 2, 3)]
    #[case("é\nü", 5, 2, 2)]
    #[case("é\nü", 4, 2, 1)]
    #[case("é", 1, 1, 1)]
    fn cursor(
        #[case] text: &str,
        #[case] offset: usize,
        #[case] line: usize,
        #[case] column: usize,
    ) {
        assert_eq!(CursorPosition::at(text, offset), CursorPosition { line, column });
    }
}
