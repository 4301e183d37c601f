const OPEN: char = '\u{E002}';
const CLOSE: char = '\u{E003}';

/// Holds generated HTML fragments behind opaque tokens.
///
/// Once a rule has produced a fragment, later rules only ever see its token,
/// so they cannot re-match markup characters inside generated tags or URLs.
#[derive(Debug, Default)]
pub struct Stash {
    fragments: Vec<String>,
}

impl Stash {
    /// Stores `fragment` and returns the token standing in for it.
    pub fn push(&mut self, fragment: String) -> String {
        let id = self.fragments.len();
        self.fragments.push(fragment);
        format!("{OPEN}{id}{CLOSE}")
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Expands every token in `text`, including tokens nested in fragments.
    pub fn restore(&self, text: &str) -> String {
        self.restore_below(text, self.fragments.len())
    }

    /// A fragment can only contain tokens created before it, so expansion is
    /// limited to ids below `limit`. Anything else is left as text.
    fn restore_below(&self, text: &str, limit: usize) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len_utf8()..];

            let token = after.find(CLOSE).and_then(|end| {
                let id = after[..end].parse::<usize>().ok()?;
                (id < limit).then_some((id, end))
            });

            match token {
                Some((id, end)) => {
                    out.push_str(&self.restore_below(&self.fragments[id], id));
                    rest = &after[end + CLOSE.len_utf8()..];
                }
                None => {
                    out.push(OPEN);
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn restores_plain_tokens() {
        let mut stash = Stash::default();
        let token = stash.push("<b>x</b>".to_string());
        assert_eq!(stash.restore(&format!("a {token} b")), "a <b>x</b> b");
    }

    #[test]
    fn restores_nested_tokens() {
        let mut stash = Stash::default();
        let inner = stash.push("<code>c</code>".to_string());
        let outer = stash.push(format!("<em>{inner}</em>"));
        assert_eq!(stash.restore(&outer), "<em><code>c</code></em>");
        assert_eq!(stash.len(), 2);
    }

    #[test]
    fn self_referencing_fragment_does_not_loop() {
        let mut stash = Stash::default();
        let token = format!("{OPEN}0{CLOSE}");
        stash.push(format!("<i>{token}</i>"));
        assert_eq!(stash.restore(&token), format!("<i>{token}</i>"));
    }

    #[test]
    fn unknown_tokens_are_left_alone() {
        let stash = Stash::default();
        let text = format!("{OPEN}7{CLOSE}");
        assert_eq!(stash.restore(&text), text);
        assert!(stash.is_empty());
    }
}
