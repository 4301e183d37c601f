//! Heading anchor ids.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use super::escape::unescape;

/// How repeated heading slugs are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingIdStrategy {
    /// Duplicate headings share one id; a browser jumps to the first.
    #[default]
    Preserve,
    /// Repeats get the lowest free `-1`, `-2`, … suffix in document order,
    /// so every id in a render is unique.
    Deduplicate,
}

/// Lower-cases, drops everything but word characters, whitespace and hyphens,
/// then collapses whitespace runs into single hyphens.
///
/// `text` is the escaped heading source, so entities are decoded first and
/// `Fish &amp; Chips` slugs to `fish-chips`.
pub fn slugify(text: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^\w\s-]").expect("Invalid slug strip regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("Invalid slug space regex"));

    let lower = unescape(text).to_lowercase();
    let stripped = strip.replace_all(&lower, "");
    spaces.replace_all(stripped.trim(), "-").into_owned()
}

/// Hands out heading ids for one render.
#[derive(Debug, Default)]
pub struct HeadingIds {
    strategy: HeadingIdStrategy,
    /// Last suffix tried, per base slug.
    counters: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl HeadingIds {
    pub fn new(strategy: HeadingIdStrategy) -> Self {
        Self {
            strategy,
            counters: HashMap::new(),
            issued: HashSet::new(),
        }
    }

    /// The id for the next heading with `text`. Empty slugs stay empty.
    pub fn next_id(&mut self, text: &str) -> String {
        let slug = slugify(text);
        if slug.is_empty() || self.strategy == HeadingIdStrategy::Preserve {
            return slug;
        }

        let counter = self.counters.entry(slug.clone()).or_insert(0);
        let mut id = slug.clone();
        while self.issued.contains(&id) {
            *counter += 1;
            id = format!("{slug}-{counter}");
        }
        self.issued.insert(id.clone());
        id
    }
}
