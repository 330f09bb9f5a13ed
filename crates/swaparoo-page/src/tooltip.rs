use std::time::Duration;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

use crate::dom::{Document, NodeId, Rect};
use crate::instance::PageEvent;
use crate::scanner::{SOURCE_ATTR, TARGET_ATTR, TOOLTIP_CLASS, is_marker};

pub const REMOVE_BUTTON_CLASS: &str = "swaparoo-btn-remove";

/// The tooltip currently attached to the page
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub element: NodeId,
    pub remove_button: NodeId,
    pub marker: NodeId,
    /// Token as written on the page
    pub source: String,
    pub target: String,
    pub position: (f64, f64),
}

#[derive(Debug)]
struct PendingHide {
    generation: u64,
    cancel: CancellationToken,
}

/// At most one tooltip per page, hidden after a grace delay.
///
/// Every `show` and `schedule_hide` bumps the generation, so a timer that
/// fires after the pointer came back is recognised as stale and dropped.
#[derive(Debug)]
pub struct TooltipLayer {
    current: Option<Tooltip>,
    pending_hide: Option<PendingHide>,
    generation: u64,
    hide_delay: Duration,
    offset: f64,
}

impl TooltipLayer {
    pub fn new(hide_delay: Duration, offset: f64) -> Self {
        Self {
            current: None,
            pending_hide: None,
            generation: 0,
            hide_delay,
            offset,
        }
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.is_some()
    }

    /// True when `node` is the tooltip or inside it
    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tooltip) = &self.current else {
            return false;
        };
        doc.closest(node, |_, n| n == tooltip.element).is_some()
    }

    pub fn is_remove_button(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tooltip) = &self.current else {
            return false;
        };
        doc.closest(node, |_, n| n == tooltip.remove_button).is_some()
    }

    /// Replace any visible tooltip with one anchored under `marker`
    pub fn show(&mut self, doc: &mut Document, marker: NodeId) -> Option<&Tooltip> {
        if !is_marker(doc, marker) {
            return None;
        }

        self.cancel_hide();
        self.hide(doc);
        self.generation += 1;

        let source = doc.attr(marker, SOURCE_ATTR).unwrap_or_default().to_string();
        let target = doc.attr(marker, TARGET_ATTR).unwrap_or_default().to_string();

        let anchor = doc.rect(marker).unwrap_or_default();
        let (scroll_x, scroll_y) = doc.scroll_offset();
        let position = (
            anchor.left + scroll_x,
            anchor.bottom() + scroll_y + self.offset,
        );

        let element = doc.create_element("div");
        doc.set_attr(element, "class", TOOLTIP_CLASS);
        doc.set_attr(
            element,
            "style",
            format!("left: {}px; top: {}px", position.0, position.1),
        );
        doc.set_rect(element, Rect::new(position.0, position.1, 0.0, 0.0));

        let word = doc.append_element(element, "div");
        doc.set_attr(word, "class", "swaparoo-tooltip-word");
        doc.append_text(word, format!("{} → {}", target, source));

        let actions = doc.append_element(element, "div");
        doc.set_attr(actions, "class", "swaparoo-tooltip-actions");
        let remove_button = doc.append_element(actions, "button");
        doc.set_attr(remove_button, "class", format!("swaparoo-btn {}", REMOVE_BUTTON_CLASS));
        doc.append_text(remove_button, "✗ Remove");

        doc.append_child(doc.body(), element);

        self.current = Some(Tooltip {
            element,
            remove_button,
            marker,
            source,
            target,
            position,
        });
        self.current.as_ref()
    }

    /// Start the grace timer; the page hears back through `events`
    pub fn schedule_hide(&mut self, events: AsyncSender<PageEvent>) {
        if self.current.is_none() {
            return;
        }

        self.cancel_hide();
        self.generation += 1;

        let generation = self.generation;
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let delay = self.hide_delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Err(e) = events.send(PageEvent::HideTooltip { generation }).await {
                        tracing::debug!("Tooltip hide timer outlived its page: {}", e);
                    }
                }
            }
        });

        self.pending_hide = Some(PendingHide { generation, cancel });
    }

    pub fn cancel_hide(&mut self) {
        if let Some(pending) = self.pending_hide.take() {
            pending.cancel.cancel();
        }
    }

    /// Timer callback; hides only if nothing happened since it was armed
    pub fn hide_elapsed(&mut self, doc: &mut Document, generation: u64) -> bool {
        match &self.pending_hide {
            Some(pending) if pending.generation == generation => {
                self.pending_hide = None;
                self.hide(doc);
                true
            }
            _ => false,
        }
    }

    pub fn hide(&mut self, doc: &mut Document) {
        self.cancel_hide();
        if let Some(tooltip) = self.current.take() {
            doc.remove(tooltip.element);
        }
    }
}
