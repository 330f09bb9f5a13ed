//! Rewrites page text so learning words show their translation.
//!
//! A replaced word becomes `<span class="swaparoo" data-source=".." data-target="..">`
//! holding the target text. `data-source` keeps the token's original casing,
//! which is what reversal puts back.

use crate::dom::{Document, NodeId};
use crate::fragments::{ActivePool, Fragment, compute_fragments};

pub const MARKER_CLASS: &str = "swaparoo";
pub const TOOLTIP_CLASS: &str = "swaparoo-tooltip";
pub const MODAL_CLASS: &str = "swaparoo-modal-overlay";
pub const SOURCE_ATTR: &str = "data-source";
pub const TARGET_ATTR: &str = "data-target";
pub const ERROR_ATTR: &str = "data-swaparoo-error";

const EXCLUDED_TAGS: [&str; 6] = ["script", "style", "textarea", "input", "code", "pre"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub nodes_rewritten: usize,
    pub markers_created: usize,
}

pub fn is_marker(doc: &Document, node: NodeId) -> bool {
    doc.tag(node) == Some("span") && doc.has_class(node, MARKER_CLASS)
}

/// Attached markers in document order
pub fn markers(doc: &Document) -> Vec<NodeId> {
    doc.elements_with_class(MARKER_CLASS)
        .into_iter()
        .filter(|&n| is_marker(doc, n))
        .collect()
}

/// Text nodes the scanner may rewrite
fn accepts(doc: &Document, node: NodeId) -> bool {
    let Some(text) = doc.text(node) else {
        return false;
    };
    if text.trim().is_empty() {
        return false;
    }

    // only the direct parent decides tag exclusion; <code><span> text is prose
    let excluded_parent = doc
        .parent(node)
        .and_then(|p| doc.tag(p))
        .is_some_and(|tag| EXCLUDED_TAGS.contains(&tag));
    if excluded_parent {
        return false;
    }

    doc.closest(node, |d, n| {
        is_marker(d, n) || d.has_class(n, TOOLTIP_CLASS) || d.has_class(n, MODAL_CLASS)
    })
    .is_none()
}

fn create_marker(doc: &mut Document, source: &str, target: &str) -> NodeId {
    let span = doc.create_element("span");
    doc.set_attr(span, "class", MARKER_CLASS);
    doc.set_attr(span, SOURCE_ATTR, source);
    doc.set_attr(span, TARGET_ATTR, target);
    let text = doc.create_text(target);
    doc.append_child(span, text);
    span
}

/// Replace every pool word under `<body>`.
///
/// Idempotent: existing markers are skipped, and a node without hits is left
/// exactly as it was.
pub fn scan(doc: &mut Document, pool: &ActivePool) -> ScanReport {
    let mut report = ScanReport::default();
    if pool.is_empty() {
        return report;
    }

    let candidates: Vec<NodeId> = doc
        .text_nodes(doc.body())
        .into_iter()
        .filter(|&n| accepts(doc, n))
        .collect();

    for node in candidates {
        let Some(text) = doc.text(node).map(str::to_string) else {
            continue;
        };

        let fragments = compute_fragments(&text, pool);
        if !fragments.iter().any(Fragment::is_marker) {
            continue;
        }

        let mut replacements = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let id = match fragment {
                Fragment::Text(t) => doc.create_text(t),
                Fragment::Marker { source, target } => {
                    report.markers_created += 1;
                    create_marker(doc, source, target)
                }
            };
            replacements.push(id);
        }

        doc.replace_with(node, &replacements);
        report.nodes_rewritten += 1;
    }

    if report.markers_created > 0 {
        tracing::debug!(
            "Scan rewrote {} node(s) with {} marker(s)",
            report.nodes_rewritten,
            report.markers_created
        );
    }
    report
}

fn restore(doc: &mut Document, marker: NodeId) {
    let source = doc.attr(marker, SOURCE_ATTR).unwrap_or_default().to_string();
    let text = doc.create_text(source);
    doc.replace_with(marker, &[text]);
}

/// Put the original token back for every marker of `word`; returns how many
pub fn reverse_word(doc: &mut Document, word: &str) -> usize {
    let word = word.trim().to_lowercase();
    let targets: Vec<NodeId> = markers(doc)
        .into_iter()
        .filter(|&m| {
            doc.attr(m, SOURCE_ATTR)
                .is_some_and(|s| s.to_lowercase() == word)
        })
        .collect();

    for &marker in &targets {
        restore(doc, marker);
    }
    targets.len()
}

pub fn reverse_all(doc: &mut Document) -> usize {
    let targets = markers(doc);
    for &marker in &targets {
        restore(doc, marker);
    }
    targets.len()
}

/// Flag every marker of `word` after a failed removal
pub fn mark_error(doc: &mut Document, word: &str, message: &str) {
    let word = word.trim().to_lowercase();
    for marker in markers(doc) {
        if doc
            .attr(marker, SOURCE_ATTR)
            .is_some_and(|s| s.to_lowercase() == word)
        {
            doc.set_attr(marker, ERROR_ATTR, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(words: &[(&str, &str)]) -> ActivePool {
        words
            .iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect()
    }

    fn page(text: &str) -> (Document, NodeId) {
        let mut doc = Document::new("example.com");
        let p = doc.append_element(doc.body(), "p");
        doc.append_text(p, text);
        (doc, p)
    }

    #[test]
    fn wraps_pool_words_in_markers() {
        let (mut doc, p) = page("The water is cold today.");
        let report = scan(&mut doc, &pool(&[("water", "agua")]));

        assert_eq!(report.markers_created, 1);
        assert_eq!(
            doc.outer_html(p),
            r#"<p>The <span class="swaparoo" data-source="water" data-target="agua">agua</span> is cold today.</p>"#
        );
    }

    #[test]
    fn second_scan_changes_nothing() {
        let (mut doc, p) = page("Water and more water.");
        let pool = pool(&[("water", "agua")]);
        scan(&mut doc, &pool);
        let html = doc.outer_html(p);
        let mutations = doc.mutation_count();

        let report = scan(&mut doc, &pool);
        assert_eq!(report, ScanReport::default());
        assert_eq!(doc.outer_html(p), html);
        assert_eq!(doc.mutation_count(), mutations);
    }

    #[test]
    fn skips_excluded_and_own_subtrees() {
        let mut doc = Document::new("example.com");
        let body = doc.body();
        for tag in EXCLUDED_TAGS {
            let el = doc.append_element(body, tag);
            doc.append_text(el, "water");
        }
        let tooltip = doc.append_element(body, "div");
        doc.set_attr(tooltip, "class", TOOLTIP_CLASS);
        doc.append_text(tooltip, "water");
        let modal = doc.append_element(body, "div");
        doc.set_attr(modal, "class", MODAL_CLASS);
        let inner = doc.append_element(modal, "h3");
        doc.append_text(inner, "water");
        doc.append_text(body, "   \n  ");

        let report = scan(&mut doc, &pool(&[("water", "agua")]));
        assert_eq!(report, ScanReport::default());
        assert!(markers(&doc).is_empty());
    }

    #[test]
    fn exclusion_follows_the_parent_element() {
        let mut doc = Document::new("example.com");
        let code = doc.append_element(doc.body(), "code");
        let span = doc.append_element(code, "span");
        doc.append_text(span, "water");

        let report = scan(&mut doc, &pool(&[("water", "agua")]));
        assert_eq!(report.markers_created, 1);
        assert_eq!(doc.text_content(code), "agua");
    }

    #[test]
    fn untouched_nodes_keep_identity() {
        let mut doc = Document::new("example.com");
        let p1 = doc.append_element(doc.body(), "p");
        let plain = doc.append_text(p1, "Nothing to see here.");
        let p2 = doc.append_element(doc.body(), "p");
        let hit = doc.append_text(p2, "Drink water.");

        scan(&mut doc, &pool(&[("water", "agua")]));
        assert!(doc.is_attached(plain));
        assert!(!doc.is_attached(hit));
    }

    #[test]
    fn reverse_word_restores_original_casing() {
        let (mut doc, p) = page("Water, water everywhere.");
        let pool = pool(&[("water", "agua"), ("everywhere", "en todas partes")]);
        scan(&mut doc, &pool);
        assert_eq!(markers(&doc).len(), 3);

        assert_eq!(reverse_word(&mut doc, "WATER"), 2);
        assert_eq!(markers(&doc).len(), 1);
        assert_eq!(doc.text_content(p), "Water, water en todas partes.");

        assert_eq!(reverse_all(&mut doc), 1);
        assert_eq!(doc.text_content(p), "Water, water everywhere.");
    }

    #[test]
    fn mark_error_flags_matching_markers_only() {
        let (mut doc, _) = page("water house");
        scan(&mut doc, &pool(&[("water", "agua"), ("house", "casa")]));
        mark_error(&mut doc, "water", "Failed to remove word.");

        let flagged: Vec<_> = markers(&doc)
            .into_iter()
            .filter(|&m| doc.attr(m, ERROR_ATTR).is_some())
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(doc.attr(flagged[0], SOURCE_ATTR), Some("water"));
    }
}
