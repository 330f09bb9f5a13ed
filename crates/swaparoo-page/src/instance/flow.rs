use swaparoo_types::{BackgroundRequest, Direction, PartOfSpeech};

use super::{ActiveFlow, PageEvent, PageInstance};
use crate::add_word::{AddWordFlow, Resolution, SAVE_FAILED_MESSAGE};
use crate::modal::{self, Key, ModalAction};

const BACKGROUND_FAILED_MESSAGE: &str = "Translation failed. Check your connection and API key.";

impl PageInstance {
    /// Replace any open flow with a new one for `word` and start translating
    pub(super) fn open_flow(
        &mut self,
        word: &str,
        sentence: Option<String>,
        direction: Direction,
        part_of_speech: Option<PartOfSpeech>,
    ) {
        self.close_flow();

        let mut flow = AddWordFlow::new(word, sentence, direction, part_of_speech);
        flow.detect_part_of_speech(self.context.tagger.as_ref());

        let request = flow.translation_request();
        let generation = flow.generation();
        let view = modal::render(
            &mut self.document,
            &flow,
            (self.context.source_lang.as_str(), self.context.target_lang.as_str()),
        );
        self.flow = Some(ActiveFlow { flow, view });

        self.request_translation(generation, request);
    }

    pub(super) fn close_flow(&mut self) {
        if let Some(active) = self.flow.take() {
            active.view.teardown(&mut self.document);
        }
    }

    fn render_flow(&mut self) {
        let Some(active) = self.flow.as_mut() else {
            return;
        };
        active.view.teardown(&mut self.document);
        active.view = modal::render(
            &mut self.document,
            &active.flow,
            (self.context.source_lang.as_str(), self.context.target_lang.as_str()),
        );
    }

    fn request_translation(&self, generation: u64, request: BackgroundRequest) {
        let background = self.context.background.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let kind = request.kind();
            let result = match background.request(request).await {
                Ok(response) => Resolution::from_response(response),
                Err(e) => {
                    tracing::warn!("{} request failed: {}", kind, e);
                    Err(BACKGROUND_FAILED_MESSAGE.to_string())
                }
            };

            let event = PageEvent::TranslationResolved { generation, result };
            if let Err(e) = events.send(event).await {
                tracing::debug!("Page closed before {} resolved: {}", kind, e);
            }
        });
    }

    pub(super) fn translation_resolved(&mut self, generation: u64, result: Result<Resolution, String>) {
        let Some(active) = self.flow.as_mut() else {
            tracing::debug!("Translation arrived after the flow closed");
            return;
        };
        if active.flow.apply_resolution(generation, result) {
            self.render_flow();
        }
    }

    pub(super) fn set_part_of_speech(&mut self, part_of_speech: Option<PartOfSpeech>) {
        let Some(active) = self.flow.as_mut() else {
            return;
        };
        active.flow.set_part_of_speech(part_of_speech);
        self.render_flow();
    }

    pub(super) async fn modal_action(&mut self, action: ModalAction) {
        match action {
            ModalAction::Swap => self.swap_direction(),
            ModalAction::Confirm => self.confirm().await,
            ModalAction::Cancel => self.close_flow(),
        }
    }

    /// Keyboard shortcuts only apply while the overlay is open
    pub(super) async fn key_down(&mut self, key: Key) {
        let action = self.flow.as_ref().and_then(|f| modal::key_action(key, &f.flow));
        if let Some(action) = action {
            self.modal_action(action).await;
        }
    }

    fn swap_direction(&mut self) {
        let Some(active) = self.flow.as_mut() else {
            return;
        };
        let request = active.flow.swap_direction();
        let generation = active.flow.generation();

        self.render_flow();
        self.request_translation(generation, request);
    }

    async fn confirm(&mut self) {
        let Some(active) = self.flow.as_ref() else {
            return;
        };
        let pair = match active.flow.commit() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!("Add ignored: {}", e);
                return;
            }
        };

        match self.context.store.add_word(pair.clone()).await {
            Ok(added) => {
                if added {
                    tracing::info!("Added '{}' -> '{}'", pair.source_word, pair.target_word);
                    self.pool.insert(&pair.source_word, pair.target_word);
                } else {
                    tracing::info!("'{}' is already being learned", pair.source_word);
                }
                self.close_flow();
                self.rescan();
            }
            Err(e) => {
                tracing::error!("Failed to save '{}': {}", pair.source_word, e);
                if let Some(active) = self.flow.as_mut() {
                    active.flow.set_save_error(SAVE_FAILED_MESSAGE);
                }
                self.render_flow();
            }
        }
    }
}
