use super::{
    code_span,
    rules::{InlineOptions, InlineRule, standard_rules},
    stash::Stash,
};

/// Applies an ordered list of [`InlineRule`]s to escaped text.
///
/// Each rule makes one left-to-right, non-overlapping pass. Its output is
/// parked behind a stash token, so later rules never see generated tags; the
/// text a rule wraps (link text, emphasis) is rendered with the rules after it.
#[derive(Debug)]
pub struct InlineRuleEngine {
    rules: Vec<InlineRule>,
}

impl InlineRuleEngine {
    pub fn new(rules: Vec<InlineRule>) -> Self {
        Self { rules }
    }

    pub fn standard(options: InlineOptions) -> Self {
        Self::new(standard_rules(options))
    }

    /// Appends a rule; it runs after every rule already configured.
    pub fn with_rule(mut self, rule: InlineRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(InlineRule::name).collect()
    }

    /// Renders one line or span of already-escaped text to HTML.
    pub fn apply(&self, escaped: &str) -> String {
        let mut stash = Stash::default();
        let protected = code_span::protect(escaped, &mut stash);
        let substituted = self.apply_from(&protected, 0, &mut stash);
        stash.restore(&substituted)
    }

    fn apply_from(&self, text: &str, first: usize, stash: &mut Stash) -> String {
        let mut current = text.to_string();
        for index in first..self.rules.len() {
            current = self.apply_rule(index, &current, stash);
        }
        current
    }

    fn apply_rule(&self, index: usize, text: &str, stash: &mut Stash) -> String {
        let rule = &self.rules[index];
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in rule.pattern().captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);

            let fragment = {
                let mut nested = |inner: &str| self.apply_from(inner, index + 1, stash);
                rule.render(&caps, &mut nested)
            };
            out.push_str(&stash.push(fragment));
            last = whole.end();
        }

        out.push_str(&text[last..]);
        out
    }
}

impl Default for InlineRuleEngine {
    fn default() -> Self {
        Self::standard(InlineOptions::default())
    }
}
