//! Fenced code extraction.
//!
//! Fences are lifted out of the document before block classification and
//! replaced by a single placeholder line, so nothing downstream (block
//! grouping, inline rules, post-processing hooks) ever sees code content.
//! The orchestrator swaps the placeholders for `<pre><code>` as its final step.

use std::sync::OnceLock;

use regex::Regex;

const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';
const TOKEN_TAG: &str = "fence-";

/// A fenced code block lifted out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    /// Position in the extraction order, also the placeholder key.
    pub id: usize,
    /// Language token from the opening fence (```` ```rust ````).
    pub language: Option<String>,
    /// Lines between the fences, already HTML-escaped, joined with `\n`.
    pub code: String,
}

impl Fence {
    /// The opaque line that stands in for this fence until reinsertion.
    pub fn placeholder(&self) -> String {
        placeholder(self.id)
    }

    pub fn to_html(&self) -> String {
        match &self.language {
            Some(lang) => format!(
                "<pre><code class=\"language-{lang}\">{}</code></pre>",
                self.code
            ),
            None => format!("<pre><code>{}</code></pre>", self.code),
        }
    }
}

/// Result of [`extract`]: the document with placeholders plus the lifted fences.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub text: String,
    pub fences: Vec<Fence>,
}

impl Extracted {
    /// Returns the fence whose placeholder is exactly `line`.
    pub fn fence_for_line(&self, line: &str) -> Option<&Fence> {
        let id = line
            .strip_prefix(TOKEN_OPEN)?
            .strip_suffix(TOKEN_CLOSE)?
            .strip_prefix(TOKEN_TAG)?
            .parse::<usize>()
            .ok()?;
        self.fences.get(id)
    }

    /// Replaces every fence placeholder in `html` with the rendered code block.
    pub fn reinsert(&self, html: &str) -> String {
        let mut out = html.to_string();
        for fence in &self.fences {
            out = out.replacen(&fence.placeholder(), &fence.to_html(), 1);
        }
        out
    }
}

/// The placeholder line for the fence with `id`.
pub fn placeholder(id: usize) -> String {
    format!("{TOKEN_OPEN}{TOKEN_TAG}{id}{TOKEN_CLOSE}")
}

fn opening_fence(line: &str) -> Option<Option<String>> {
    static OPEN: OnceLock<Regex> = OnceLock::new();
    let open = OPEN.get_or_init(|| {
        Regex::new(r"^\s*```\s*([\w+#.-]+)?\s*$").expect("Invalid fence opener regex")
    });
    let caps = open.captures(line)?;
    Some(caps.get(1).map(|m| m.as_str().to_string()))
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == "```"
}

/// Lifts matched ```` ``` ```` pairs out of `doc`.
///
/// An opening fence without a closing partner is left in place as plain text.
pub fn extract(doc: &str) -> Extracted {
    let lines: Vec<&str> = doc.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fences = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if let Some(language) = opening_fence(lines[i]) {
            let close = (i + 1..lines.len()).find(|&j| is_closing_fence(lines[j]));
            if let Some(close) = close {
                let fence = Fence {
                    id: fences.len(),
                    language,
                    code: lines[i + 1..close].join("\n"),
                };
                out.push(fence.placeholder());
                fences.push(fence);
                i = close + 1;
                continue;
            }
            log::debug!("unterminated code fence at line {}", i + 1);
        }
        out.push(lines[i].to_string());
        i += 1;
    }

    Extracted {
        text: out.join("\n"),
        fences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_fence_with_language() {
        let ex = extract("before\n```rust\nfn main() {}\n```\nafter");
        assert_eq!(ex.fences.len(), 1);
        assert_eq!(ex.fences[0].language.as_deref(), Some("rust"));
        assert_eq!(ex.fences[0].code, "fn main() {}");
        assert_eq!(
            ex.text,
            format!("before\n{}\nafter", ex.fences[0].placeholder())
        );
    }

    #[test]
    fn extracts_fence_without_language() {
        let ex = extract("```\nplain\ncode\n```");
        assert_eq!(ex.fences[0].language, None);
        assert_eq!(ex.fences[0].code, "plain\ncode");
        assert_eq!(ex.fences[0].to_html(), "<pre><code>plain\ncode</code></pre>");
    }

    #[test]
    fn unterminated_fence_stays_plain_text() {
        let doc = "```python\nprint(1)\nstill going";
        let ex = extract(doc);
        assert!(ex.fences.is_empty());
        assert_eq!(ex.text, doc);
    }

    #[test]
    fn multiple_fences_get_distinct_placeholders() {
        let ex = extract("```\na\n```\ntext\n```sh\nb\n```");
        assert_eq!(ex.fences.len(), 2);
        assert_ne!(ex.fences[0].placeholder(), ex.fences[1].placeholder());
        let lines: Vec<&str> = ex.text.split('\n').collect();
        assert_eq!(ex.fence_for_line(lines[0]).map(|f| f.id), Some(0));
        assert_eq!(ex.fence_for_line(lines[1]), None);
        assert_eq!(ex.fence_for_line(lines[2]).map(|f| f.id), Some(1));
    }

    #[test]
    fn fence_contents_are_not_touched() {
        let ex = extract("```\n**not bold** # not heading\n```");
        assert_eq!(ex.fences[0].code, "**not bold** # not heading");
    }

    #[test]
    fn reinsert_swaps_placeholders_for_code_blocks() {
        let ex = extract("```js\nlet a = 1;\n```");
        let html = format!("<p>x</p>\n{}", ex.fences[0].placeholder());
        assert_eq!(
            ex.reinsert(&html),
            "<p>x</p>\n<pre><code class=\"language-js\">let a = 1;</code></pre>"
        );
    }

    #[test]
    fn opener_with_trailing_words_is_not_a_fence() {
        let ex = extract("```rust extra words\ncode\n```");
        // The first line is not an opener, but the last line opens a fence
        // that never closes, so everything stays as text.
        assert!(ex.fences.is_empty());
    }
}
