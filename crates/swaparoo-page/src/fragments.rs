use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use swaparoo_core::WordPair;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid word regex"));

/// Learning words keyed by lowercase source word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivePool {
    words: HashMap<String, String>,
}

impl ActivePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words(words: &[WordPair]) -> Self {
        words
            .iter()
            .map(|w| (w.source_word.clone(), w.target_word.clone()))
            .collect()
    }

    pub fn insert(&mut self, source: &str, target: impl Into<String>) {
        self.words
            .insert(source.trim().to_lowercase(), target.into());
    }

    pub fn remove(&mut self, source: &str) -> Option<String> {
        self.words.remove(&source.trim().to_lowercase())
    }

    /// Case-insensitive lookup
    pub fn get(&self, word: &str) -> Option<&str> {
        self.words.get(&word.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<(String, String)> for ActivePool {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut pool = Self::new();
        for (source, target) in iter {
            pool.insert(&source, target);
        }
        pool
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    Text(&'a str),
    /// `source` is the token exactly as it appeared on the page
    Marker { source: &'a str, target: &'a str },
}

impl Fragment<'_> {
    pub fn is_marker(&self) -> bool {
        matches!(self, Fragment::Marker { .. })
    }
}

/// Split `text` into plain runs and pool hits.
///
/// Words are maximal ASCII letter runs, so "water" matches in "water," but
/// not inside "waterfall". Concatenating the fragments, with markers read as
/// their `source`, gives back `text` unchanged.
pub fn compute_fragments<'a>(text: &'a str, pool: &'a ActivePool) -> Vec<Fragment<'a>> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for token in WORD_RE.find_iter(text) {
        let Some(target) = pool.get(token.as_str()) else {
            continue;
        };

        if token.start() > last {
            fragments.push(Fragment::Text(&text[last..token.start()]));
        }
        fragments.push(Fragment::Marker {
            source: token.as_str(),
            target,
        });
        last = token.end();
    }

    if last < text.len() {
        fragments.push(Fragment::Text(&text[last..]));
    }
    fragments
}
