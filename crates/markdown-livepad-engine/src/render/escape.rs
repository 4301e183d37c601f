/// Escapes `&`, `<`, `>` and `"` into their named entities.
///
/// The orchestrator runs this exactly once over the whole document before any
/// block or inline substitution, so generated tags are never re-escaped.
pub fn escape(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Reverses [`escape`] for places that need the author's literal text back,
/// such as heading slugs.
pub fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
