//! Hooks that rewrite rendered HTML before code blocks are put back.
//!
//! Hooks run in registration order during
//! [`RenderStage::PostProcessing`](crate::render::RenderStage::PostProcessing).
//! Fenced code is still a placeholder at that point, so a hook can never
//! alter it.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::PostProcessError;

pub trait PostProcessor {
    fn name(&self) -> &str;

    fn process(&self, html: String) -> Result<String, PostProcessError>;
}

/// Marks TeX for an external math renderer.
///
/// `$$…$$` becomes `<div class="math-block">…</div>` (replacing the
/// paragraph when it is the paragraph's only content) and `$…$` on a single
/// line becomes `<span class="math-inline">…</span>`. Only text between tags
/// is marked: attributes and `<code>…</code>` are left alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathDelimiters;

impl MathDelimiters {
    fn display(html: &str) -> String {
        static DISPLAY: OnceLock<Regex> = OnceLock::new();
        let display = DISPLAY
            .get_or_init(|| Regex::new(r"<p>\$\$([^$<>]+)\$\$</p>").expect("Invalid display math regex"));
        display
            .replace_all(html, r#"<div class="math-block">$1</div>"#)
            .into_owned()
    }

    fn mark(text: &str) -> String {
        static BLOCK: OnceLock<Regex> = OnceLock::new();
        static INLINE: OnceLock<Regex> = OnceLock::new();
        let block =
            BLOCK.get_or_init(|| Regex::new(r"\$\$([\s\S]+?)\$\$").expect("Invalid math block regex"));
        let inline =
            INLINE.get_or_init(|| Regex::new(r"\$([^$\n]+)\$").expect("Invalid inline math regex"));

        let text = block.replace_all(text, r#"<div class="math-block">$1</div>"#);
        inline
            .replace_all(&text, r#"<span class="math-inline">$1</span>"#)
            .into_owned()
    }

    /// Length of the markup at the start of `rest`: a whole `<code>` element,
    /// or a single tag. An unclosed tag runs to the end.
    fn markup_len(rest: &str) -> usize {
        if rest.starts_with("<code")
            && let Some(len) = rest.find("</code>")
        {
            return len + "</code>".len();
        }
        rest.find('>').map_or(rest.len(), |len| len + 1)
    }
}

impl PostProcessor for MathDelimiters {
    fn name(&self) -> &str {
        "math"
    }

    fn process(&self, html: String) -> Result<String, PostProcessError> {
        let html = Self::display(&html);
        let mut out = String::with_capacity(html.len());
        let mut rest = html.as_str();

        while let Some(start) = rest.find('<') {
            out.push_str(&Self::mark(&rest[..start]));
            let len = Self::markup_len(&rest[start..]);
            out.push_str(&rest[start..start + len]);
            rest = &rest[start + len..];
        }

        out.push_str(&Self::mark(rest));
        Ok(out)
    }
}
