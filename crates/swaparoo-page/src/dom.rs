//! Arena-backed page document.
//!
//! Nodes are never freed: detaching a node only unlinks it from its parent,
//! so a `NodeId` held by the tooltip or the add-word overlay stays valid (if
//! stale) after the page rewrites itself. Every structural or text change
//! bumps a mutation counter, which is how callers observe "no DOM churn".

use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Layout box in page coordinates, as reported by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    rect: Option<Rect>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Current user selection inside a single text node (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    hostname: String,
    scroll: (f64, f64),
    selection: Option<Selection>,
    mutations: u64,
}

impl Document {
    /// Empty `<html><head></head><body></body></html>` page served from `hostname`
    pub fn new(hostname: impl Into<String>) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            hostname: hostname.into(),
            scroll: (0.0, 0.0),
            selection: None,
            mutations: 0,
        };

        doc.root = doc.create_element("html");
        doc.append_element(doc.root, "head");
        doc.body = doc.append_element(doc.root, "body");
        doc.mutations = 0;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Declared page language (`<html lang>`)
    pub fn lang(&self) -> Option<&str> {
        self.attr(self.root, "lang")
    }

    pub fn set_lang(&mut self, lang: &str) {
        self.set_attr(self.root, "lang", lang);
    }

    pub fn scroll_offset(&self) -> (f64, f64) {
        self.scroll
    }

    pub fn set_scroll_offset(&mut self, x: f64, y: f64) {
        self.scroll = (x, y);
    }

    /// Number of structural or text changes applied so far
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            rect: None,
        }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.mutations += 1;
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.create_text(text);
        self.append_child(parent, id);
        id
    }

    /// Put `replacements` where `node` is, in order, and detach `node`
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) {
        let Some(parent) = self.nodes[node.0].parent else {
            return;
        };

        for &r in replacements {
            self.detach(r);
        }

        let siblings = &mut self.nodes[parent.0].children;
        let Some(index) = siblings.iter().position(|&c| c == node) else {
            return;
        };
        siblings.splice(index..=index, replacements.iter().copied());

        for &r in replacements {
            self.nodes[r.0].parent = Some(parent);
        }
        self.nodes[node.0].parent = None;
        self.mutations += 1;
    }

    pub fn remove(&mut self, node: NodeId) {
        if self.nodes[node.0].parent.is_some() {
            self.detach(node);
            self.mutations += 1;
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// True when `node` is reachable from the document root
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Element(_))
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    /// Text of a text node, `None` for elements
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let NodeData::Text(t) = &mut self.nodes[node.0].data {
            *t = text.into();
            self.mutations += 1;
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.element_mut(node) {
            e.attributes.insert(name.to_string(), value.into());
            self.mutations += 1;
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.element(node).and_then(|e| e.rect)
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(e) = self.element_mut(node) {
            e.rect = Some(rect);
        }
    }

    /// Nearest element at or above `node` (a text node starts at its parent)
    pub fn closest(&self, node: NodeId, matches: impl Fn(&Document, NodeId) -> bool) -> Option<NodeId> {
        let mut current = if self.is_element(node) {
            Some(node)
        } else {
            self.parent(node)
        };

        while let Some(id) = current {
            if matches(self, id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// `node` and everything below it, in document order
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn text_nodes(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| !self.is_element(id))
            .collect()
    }

    /// Attached elements carrying `class`, in document order
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Concatenated text below `node`
    pub fn text_content(&self, node: NodeId) -> String {
        self.text_nodes(node)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Select the first occurrence of `needle` inside `node`'s text
    pub fn select_in(&mut self, node: NodeId, needle: &str) -> bool {
        let Some(start) = self.text(node).and_then(|t| t.find(needle)) else {
            return false;
        };
        self.selection = Some(Selection {
            node,
            start,
            end: start + needle.len(),
        });
        true
    }

    pub fn selected_text(&self) -> Option<&str> {
        let selection = self.selection?;
        self.text(selection.node)?.get(selection.start..selection.end)
    }

    /// Markup rendering, mostly for logs and assertions
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => out.push_str(&escape(t, false)),
            NodeData::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (name, value) in &e.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
                }
                out.push('>');
                for &child in &self.nodes[node.0].children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_with_keeps_sibling_order() {
        let mut doc = Document::new("example.com");
        let p = doc.append_element(doc.body(), "p");
        let a = doc.append_text(p, "a");
        let b = doc.append_text(p, "b");
        let c = doc.append_text(p, "c");

        let x = doc.create_text("x");
        let y = doc.create_element("span");
        doc.replace_with(b, &[x, y]);

        assert_eq!(doc.children(p), &[a, x, y, c]);
        assert_eq!(doc.parent(b), None);
        assert!(!doc.is_attached(b));
        assert!(doc.is_attached(y));
        assert_eq!(doc.text_content(p), "axc");
    }

    #[test]
    fn mutation_counter_tracks_changes_only() {
        let mut doc = Document::new("example.com");
        assert_eq!(doc.mutation_count(), 0);
        let p = doc.append_element(doc.body(), "p");
        let t = doc.append_text(p, "hello");
        let count = doc.mutation_count();

        let _ = doc.text_content(doc.body());
        let _ = doc.closest(t, |d, n| d.tag(n) == Some("body"));
        assert_eq!(doc.mutation_count(), count);

        doc.set_text(t, "bye");
        assert_eq!(doc.mutation_count(), count + 1);
    }

    #[test]
    fn closest_starts_from_text_parent() {
        let mut doc = Document::new("example.com");
        let pre = doc.append_element(doc.body(), "pre");
        let b = doc.append_element(pre, "b");
        let t = doc.append_text(b, "x");

        assert_eq!(doc.closest(t, |d, n| d.tag(n) == Some("pre")), Some(pre));
        assert_eq!(doc.closest(t, |d, n| d.tag(n) == Some("b")), Some(b));
        assert_eq!(doc.closest(t, |d, n| d.tag(n) == Some("code")), None);
    }

    #[test]
    fn outer_html_escapes_and_sorts_attributes() {
        let mut doc = Document::new("example.com");
        let span = doc.append_element(doc.body(), "SPAN");
        doc.set_attr(span, "data-target", "a\"b");
        doc.set_attr(span, "class", "swaparoo");
        doc.append_text(span, "x < y");

        assert_eq!(
            doc.outer_html(span),
            r#"<span class="swaparoo" data-target="a&quot;b">x &lt; y</span>"#
        );
    }

    #[test]
    fn selection_reads_back_text() {
        let mut doc = Document::new("example.com");
        let p = doc.append_element(doc.body(), "p");
        let t = doc.append_text(p, "I like to run.");
        assert!(doc.select_in(t, "run"));
        assert_eq!(doc.selected_text(), Some("run"));
        assert!(!doc.select_in(t, "walk"));
    }
}
