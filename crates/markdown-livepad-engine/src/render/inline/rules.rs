use std::fmt;

use regex::{Captures, Regex};

/// Renders a match. The second argument renders text with the rules that
/// come after this one, for content such as link text or bold spans.
type RenderFn = dyn Fn(&Captures<'_>, &mut dyn FnMut(&str) -> String) -> String + Send + Sync;

/// A pattern → HTML substitution applied to escaped text.
pub struct InlineRule {
    name: String,
    pattern: Regex,
    render: Box<RenderFn>,
}

impl InlineRule {
    pub fn new<F>(name: impl Into<String>, pattern: &str, render: F) -> Result<Self, regex::Error>
    where
        F: Fn(&Captures<'_>, &mut dyn FnMut(&str) -> String) -> String + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            render: Box::new(render),
        })
    }

    /// A rule that wraps the first participating capture group in `<tag>`,
    /// rendering the wrapped text with the remaining rules.
    pub fn wrap(name: impl Into<String>, pattern: &str, tag: &'static str) -> Result<Self, regex::Error> {
        Self::new(name, pattern, move |caps, nested| {
            format!("<{tag}>{}</{tag}>", nested(first_group(caps)))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub(crate) fn render(
        &self,
        caps: &Captures<'_>,
        nested: &mut dyn FnMut(&str) -> String,
    ) -> String {
        (self.render)(caps, nested)
    }
}

impl fmt::Debug for InlineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn first_group<'t>(caps: &Captures<'t>) -> &'t str {
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Settings that change what the standard rules emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineOptions {
    /// Add `target="_blank" rel="noopener noreferrer"` to `http(s)` links.
    pub external_links_new_tab: bool,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            external_links_new_tab: true,
        }
    }
}

/// `![alt](url)`. Must run before [`link`], whose pattern matches its tail.
///
/// Alt text and urls never contain protected code spans (`\u{E002}`), which
/// would otherwise expand into markup inside the attribute.
pub fn image() -> InlineRule {
    InlineRule::new("image", r"!\[([^\]\x{E002}]*)\]\(([^)\x{E002}]+)\)", |caps, _| {
        let alt = &caps[1];
        let src = &caps[2];
        if alt.is_empty() {
            format!("<img src=\"{src}\" loading=\"lazy\">")
        } else {
            format!("<img src=\"{src}\" alt=\"{alt}\" loading=\"lazy\">")
        }
    })
    .expect("Invalid image regex")
}

/// `[text](url)`.
pub fn link(options: InlineOptions) -> InlineRule {
    InlineRule::new("link", r"\[([^\]]+)\]\(([^)\x{E002}]+)\)", move |caps, nested| {
        let href = &caps[2];
        let target = if options.external_links_new_tab && href.starts_with("http") {
            " target=\"_blank\" rel=\"noopener noreferrer\""
        } else {
            ""
        };
        format!("<a href=\"{href}\"{target}>{}</a>", nested(&caps[1]))
    })
    .expect("Invalid link regex")
}

/// `**x**` or `__x__`.
pub fn bold() -> InlineRule {
    InlineRule::wrap("bold", r"\*\*(.+?)\*\*|__(.+?)__", "strong").expect("Invalid bold regex")
}

/// `*x*` or `_x_`.
pub fn italic() -> InlineRule {
    InlineRule::wrap("italic", r"\*([^*]+)\*|_([^_]+)_", "em").expect("Invalid italic regex")
}

/// `~~x~~`.
pub fn strikethrough() -> InlineRule {
    InlineRule::wrap("strikethrough", r"~~(.+?)~~", "del").expect("Invalid strikethrough regex")
}

/// The standard rule set in its required order. Inline code is not listed:
/// the engine protects code spans before any rule runs.
pub fn standard_rules(options: InlineOptions) -> Vec<InlineRule> {
    vec![image(), link(options), bold(), italic(), strikethrough()]
}
