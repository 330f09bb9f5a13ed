use std::sync::LazyLock;

use regex::Regex;
use swaparoo_types::Direction;

use crate::dom::Document;

static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence break regex"));

/// Sentence around the current selection, read from its nearest enclosing element
pub fn extract_sentence_context(doc: &Document, radius: usize) -> Option<String> {
    let selection = doc.selection()?;
    let selected = doc.selected_text()?.trim();
    if selected.is_empty() {
        return None;
    }

    let container = doc.parent(selection.node)?;
    let text = doc.text_content(container);
    sentence_containing(&text, selected, radius)
}

/// First sentence of `text` containing `selected` (case-insensitive).
///
/// Falls back to a window of `radius` characters each side of the first hit
/// when no sentence segment contains the selection whole.
pub fn sentence_containing(text: &str, selected: &str, radius: usize) -> Option<String> {
    let needle = selected.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut start = 0;
    let mut segments = Vec::new();
    for brk in SENTENCE_BREAK_RE.find_iter(text) {
        // punctuation is one ASCII byte
        segments.push(&text[start..brk.start() + 1]);
        start = brk.end();
    }
    segments.push(&text[start..]);

    if let Some(sentence) = segments
        .into_iter()
        .find(|s| s.to_lowercase().contains(&needle))
    {
        return Some(sentence.trim().to_string());
    }

    window_around(text, selected, radius)
}

/// Byte range in `text` of the first case-insensitive match of `needle`
fn find_ignore_case(text: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    text.char_indices().find_map(|(start, _)| {
        let mut folded = Vec::with_capacity(needle.len());
        for (offset, c) in text[start..].char_indices() {
            folded.extend(c.to_lowercase());
            if folded.len() >= needle.len() {
                return (folded == needle).then_some((start, start + offset + c.len_utf8()));
            }
        }
        None
    })
}

fn window_around(text: &str, selected: &str, radius: usize) -> Option<String> {
    let (at, end) = find_ignore_case(text, selected.trim())?;

    let before: Vec<(usize, char)> = text[..at].char_indices().collect();
    let from = before
        .len()
        .checked_sub(radius)
        .and_then(|i| before.get(i))
        .map_or(0, |(i, _)| *i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);

    let window = text[from..to].trim();
    (!window.is_empty()).then(|| window.to_string())
}

/// Pages written in the target language are read target-to-source
pub fn infer_direction(doc: &Document, target_lang: &str) -> Direction {
    let target = target_lang.to_lowercase();
    match doc.lang() {
        Some(lang) if !target.is_empty() && lang.to_lowercase().starts_with(&target) => {
            Direction::TargetToSource
        }
        _ => Direction::SourceToTarget,
    }
}
