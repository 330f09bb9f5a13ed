use swaparoo_core::normalize_domain;
use swaparoo_core::preprocess::{DefaultPreprocessor, Preprocessor};
use swaparoo_types::PageMessage;

use super::PageInstance;
use crate::scanner;
use crate::selection::{extract_sentence_context, infer_direction};

impl PageInstance {
    pub(super) async fn handle_message(&mut self, message: PageMessage) {
        tracing::debug!("Page message: {}", message.kind());

        match message {
            PageMessage::AddWord { word } => self.capture_selection(&word),
            PageMessage::ShowAddModal {
                word,
                sentence,
                direction,
                part_of_speech,
            } => self.open_flow(&word, sentence, direction, part_of_speech),
            PageMessage::AddWordDirect { word, translation } => {
                self.pool.insert(&word, translation);
                self.rescan();
            }
            PageMessage::RemoveWord { word } => self.forget_word(&word),
            PageMessage::Toggle { enabled } => self.toggle(enabled).await,
            PageMessage::DomainBlocked { domain } => self.domain_blocked(&domain),
        }
    }

    /// Start the add-word flow from the live selection
    fn capture_selection(&mut self, word: &str) {
        let selected = self
            .document
            .selected_text()
            .map(str::to_string)
            .unwrap_or_default();

        let raw = if word.trim().is_empty() { selected.as_str() } else { word };
        let word = DefaultPreprocessor.normalize_word(raw);
        if word.is_empty() {
            tracing::warn!("Add word requested with an empty selection");
            return;
        }

        let sentence = extract_sentence_context(&self.document, self.context.scanner.context_radius)
            .map(|s| DefaultPreprocessor.process(&s))
            .filter(|s| !s.is_empty());
        let direction = infer_direction(&self.document, &self.context.target_lang);

        self.open_flow(&word, sentence, direction, None);
    }

    pub(super) fn forget_word(&mut self, word: &str) {
        self.pool.remove(word);
        let restored = scanner::reverse_word(&mut self.document, word);

        let showing = self
            .tooltip
            .current()
            .is_some_and(|t| t.source.eq_ignore_ascii_case(word.trim()));
        if showing {
            self.tooltip.hide(&mut self.document);
        }

        tracing::debug!("Reversed {} marker(s) for '{}'", restored, word);
    }

    async fn toggle(&mut self, enabled: bool) {
        if !enabled {
            self.enabled = false;
            self.tooltip.hide(&mut self.document);
            let restored = scanner::reverse_all(&mut self.document);
            tracing::info!("Swaparoo disabled, restored {} word(s)", restored);
            return;
        }

        match self.context.store.state().await {
            Ok(state) => self.load_state(&state),
            Err(e) => tracing::error!("Failed to reload user state, keeping current pool: {}", e),
        }
        self.enabled = true;
        let report = self.rescan();
        tracing::info!("Swaparoo enabled, {} marker(s)", report.markers_created);
    }

    fn domain_blocked(&mut self, domain: &str) {
        let Some(domain) = normalize_domain(domain) else {
            return;
        };
        if !swaparoo_core::is_domain_blocked(self.document.hostname(), &[domain]) {
            return;
        }

        self.blocked = true;
        self.tooltip.hide(&mut self.document);
        self.close_flow();
        let restored = scanner::reverse_all(&mut self.document);
        tracing::info!(
            "{} blocked, restored {} word(s)",
            self.document.hostname(),
            restored
        );
    }
}
