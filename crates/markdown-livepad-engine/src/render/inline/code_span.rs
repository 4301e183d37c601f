use std::ops::Range;

use super::{cursor::Cursor, stash::Stash};

/// The backtick that delimits code spans.
pub const TICK: u8 = b'`';

/// Byte ranges of a code span: `full` includes the backticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub full: Range<usize>,
    pub inner: Range<usize>,
}

/// Attempts to read a non-empty code span at the cursor.
///
/// Returns `None` if not at a backtick, if the span is empty or if it is
/// never closed. On failure the cursor position is restored.
fn try_code_span(cur: &mut Cursor<'_>) -> Option<CodeSpan> {
    if cur.peek() != Some(TICK) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump(); // `
    let inner_start = cur.pos();

    let inner_end = cur.skip_until(TICK);

    if cur.peek() != Some(TICK) || inner_end == inner_start {
        *cur = saved;
        return None;
    }
    cur.bump(); // closing `

    Some(CodeSpan {
        full: start..cur.pos(),
        inner: inner_start..inner_end,
    })
}

/// Finds every code span in `text`, left to right, without overlap.
pub fn find_code_spans(text: &str) -> Vec<CodeSpan> {
    let mut cur = Cursor::new(text);
    let mut spans = vec![];
    while !cur.eof() {
        if let Some(span) = try_code_span(&mut cur) {
            spans.push(span);
            continue;
        }
        cur.bump();
    }
    spans
}

/// Replaces each code span with a stash token holding `<code>…</code>`.
///
/// This runs before any other inline rule, so markup inside backticks is
/// never interpreted. The content is already escaped by the pipeline and is
/// kept verbatim.
pub fn protect(text: &str, stash: &mut Stash) -> String {
    let mut out = String::with_capacity(text.len());
    let mut text_start = 0;

    for span in find_code_spans(text) {
        out.push_str(&text[text_start..span.full.start]);
        out.push_str(&stash.push(format!("<code>{}</code>", &text[span.inner])));
        text_start = span.full.end;
    }

    out.push_str(&text[text_start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_single_span() {
        assert_eq!(
            find_code_spans("a `code` b"),
            vec![CodeSpan {
                full: 2..8,
                inner: 3..7
            }]
        );
    }

    #[test]
    fn unclosed_span_is_text() {
        assert!(find_code_spans("`unclosed code").is_empty());
    }

    #[test]
    fn empty_span_is_skipped() {
        // The second tick opens a span closed by the third.
        assert_eq!(
            find_code_spans("`` x`"),
            vec![CodeSpan {
                full: 1..5,
                inner: 2..4
            }]
        );
    }

    #[test]
    fn protect_hides_markup_from_later_rules() {
        let mut stash = Stash::default();
        let protected = protect("see `**bold**` here", &mut stash);
        assert!(!protected.contains("**"));
        assert_eq!(stash.restore(&protected), "see <code>**bold**</code> here");
    }

    #[test]
    fn multibyte_text_around_spans() {
        let mut stash = Stash::default();
        let protected = protect("héllo `ü` wörld", &mut stash);
        assert_eq!(stash.restore(&protected), "héllo <code>ü</code> wörld");
    }
}
