use super::PageInstance;
use crate::dom::NodeId;
use crate::scanner::{self, is_marker};

const REMOVE_FAILED_MESSAGE: &str = "Failed to remove word. Try again or reload the page.";

impl PageInstance {
    pub(super) fn pointer_enter(&mut self, node: NodeId) {
        if self.tooltip.contains(&self.document, node) {
            self.tooltip.cancel_hide();
            return;
        }

        let Some(marker) = self.document.closest(node, is_marker) else {
            return;
        };

        if self.tooltip.current().is_some_and(|t| t.marker == marker) {
            self.tooltip.cancel_hide();
        } else {
            self.tooltip.show(&mut self.document, marker);
        }
    }

    pub(super) fn pointer_leave(&mut self, node: NodeId) {
        let leaving = self.document.closest(node, is_marker).is_some()
            || self.tooltip.contains(&self.document, node);
        if leaving {
            self.tooltip.schedule_hide(self.events.clone());
        }
    }

    pub(super) async fn click(&mut self, node: NodeId) {
        let action = self
            .flow
            .as_ref()
            .and_then(|f| f.view.action_for(&self.document, node));
        if let Some(action) = action {
            self.modal_action(action).await;
            return;
        }

        if self.tooltip.is_remove_button(&self.document, node) {
            self.remove_from_tooltip().await;
        }
    }

    /// Delete the tooltip's word from the store, then from the page
    async fn remove_from_tooltip(&mut self) {
        let Some(word) = self.tooltip.current().map(|t| t.source.to_lowercase()) else {
            return;
        };

        match self.context.store.remove_word(&word).await {
            Ok(removed) => {
                if !removed {
                    tracing::debug!("'{}' was no longer stored", word);
                }
                self.forget_word(&word);
                self.tooltip.hide(&mut self.document);
                tracing::info!("Removed '{}' from vocabulary", word);
            }
            Err(e) => {
                tracing::error!("Failed to remove '{}': {}", word, e);
                scanner::mark_error(&mut self.document, &word, REMOVE_FAILED_MESSAGE);
            }
        }
    }
}
