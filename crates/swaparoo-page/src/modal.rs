use swaparoo_types::Direction;

use crate::add_word::{AddWordFlow, FlowStatus};
use crate::dom::{Document, NodeId};
use crate::scanner::MODAL_CLASS;

/// Controls of the rendered add-word overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalView {
    pub overlay: NodeId,
    pub dialog: NodeId,
    pub source_input: NodeId,
    pub target_input: NodeId,
    pub swap_button: NodeId,
    pub pos_select: NodeId,
    pub add_button: NodeId,
    pub cancel_button: NodeId,
}

/// What a click inside the overlay means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Swap,
    Confirm,
    Cancel,
}

/// Keys the overlay reacts to while it is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

/// Escape always dismisses; Enter confirms only once the pair is complete
pub fn key_action(key: Key, flow: &AddWordFlow) -> Option<ModalAction> {
    match key {
        Key::Escape => Some(ModalAction::Cancel),
        Key::Enter if flow.can_commit() => Some(ModalAction::Confirm),
        Key::Enter => None,
    }
}

impl ModalView {
    /// Clicks on the dimmed backdrop dismiss the flow like the cancel button
    pub fn action_for(&self, doc: &Document, node: NodeId) -> Option<ModalAction> {
        let within = |target: NodeId| doc.closest(node, |_, n| n == target).is_some();

        if within(self.add_button) {
            Some(ModalAction::Confirm)
        } else if within(self.cancel_button) {
            Some(ModalAction::Cancel)
        } else if within(self.swap_button) {
            Some(ModalAction::Swap)
        } else if node == self.overlay {
            Some(ModalAction::Cancel)
        } else {
            None
        }
    }

    pub fn teardown(&self, doc: &mut Document) {
        doc.remove(self.overlay);
    }
}

fn labelled(doc: &mut Document, parent: NodeId, tag: &str, class: &str, text: &str) -> NodeId {
    let node = doc.append_element(parent, tag);
    doc.set_attr(node, "class", class);
    if !text.is_empty() {
        doc.append_text(node, text);
    }
    node
}

fn input(doc: &mut Document, parent: NodeId, class: &str, label: &str, value: Option<&str>, busy: bool) -> NodeId {
    let field = labelled(doc, parent, "label", "swaparoo-field", label);
    let node = doc.append_element(field, "input");
    doc.set_attr(node, "class", class);
    doc.set_attr(node, "value", value.unwrap_or_default());
    if busy && value.is_none() {
        doc.set_attr(node, "placeholder", "Translating...");
    }
    node
}

/// Build the overlay for `flow` and attach it to `<body>`
pub fn render(doc: &mut Document, flow: &AddWordFlow, languages: (&str, &str)) -> ModalView {
    let overlay = doc.create_element("div");
    doc.set_attr(overlay, "class", MODAL_CLASS);

    let dialog = labelled(doc, overlay, "div", "swaparoo-modal", "");
    labelled(doc, dialog, "h3", "swaparoo-modal-title", "Add to Swaparoo");

    let busy = *flow.status() == FlowStatus::Translating;
    let (source, target) = flow.sides();
    let (source_label, target_label) = (languages.0.to_uppercase(), languages.1.to_uppercase());

    let row = labelled(doc, dialog, "div", "swaparoo-modal-inputs", "");
    let source_input = input(doc, row, "swaparoo-input-source", &source_label, source, busy);
    let swap_button = labelled(doc, row, "button", "swaparoo-btn swaparoo-btn-swap", "⇄");
    let target_input = input(doc, row, "swaparoo-input-target", &target_label, target, busy);

    let direction = match flow.direction() {
        Direction::SourceToTarget => format!("{} → {}", source_label, target_label),
        Direction::TargetToSource => format!("{} → {}", target_label, source_label),
    };
    labelled(doc, dialog, "div", "swaparoo-modal-direction", &direction);

    if let Some(sentence) = flow.sentence() {
        labelled(doc, dialog, "p", "swaparoo-modal-sentence", sentence);
    }
    if let Some(sentence) = flow.translated_sentence() {
        labelled(doc, dialog, "p", "swaparoo-modal-sentence-translated", sentence);
    }

    let pos_select = labelled(doc, dialog, "select", "swaparoo-pos-select", "");
    for (value, label) in [
        ("", "—"),
        ("noun", "Noun"),
        ("verb", "Verb"),
        ("adj", "Adjective"),
        ("adv", "Adverb"),
        ("other", "Other"),
    ] {
        let option = doc.append_element(pos_select, "option");
        doc.set_attr(option, "value", value);
        doc.append_text(option, label);
    }
    doc.set_attr(
        pos_select,
        "value",
        flow.part_of_speech().map(|p| p.as_str()).unwrap_or_default(),
    );

    let message = match (flow.status(), flow.save_error()) {
        (_, Some(error)) => Some(error),
        (FlowStatus::Failed(error), None) => Some(error.as_str()),
        _ => None,
    };
    if let Some(message) = message {
        labelled(doc, dialog, "div", "swaparoo-modal-error", message);
    }

    let actions = labelled(doc, dialog, "div", "swaparoo-modal-actions", "");
    let cancel_button = labelled(doc, actions, "button", "swaparoo-btn swaparoo-btn-cancel", "Cancel");
    let add_button = labelled(doc, actions, "button", "swaparoo-btn swaparoo-btn-add", "Add");
    if !flow.can_commit() {
        doc.set_attr(add_button, "disabled", "");
    }

    doc.append_child(doc.body(), overlay);

    ModalView {
        overlay,
        dialog,
        source_input,
        target_input,
        swap_button,
        pos_select,
        add_button,
        cancel_button,
    }
}
