use std::sync::Arc;

use swaparoo_core::preprocess::{DefaultPreprocessor, Preprocessor};
use swaparoo_core::{SortPreference, StoreError, UserState, VocabularyStore, WordPair, normalize_domain};
use swaparoo_types::{Direction, MessagingError, PageMessage, PartOfSpeech};

use crate::router::TabRegistry;

#[derive(Debug, thiserror::Error)]
pub enum PopupError {
    #[error("Enter both a word and its translation")]
    MissingFields,

    #[error("Enter a word to add")]
    MissingWord,

    #[error("Open a page to add words")]
    NoPage(#[from] MessagingError),

    #[error("Enter a valid domain")]
    InvalidDomain,

    #[error("Failed to save. Try again or reload the page.")]
    Store(#[from] StoreError),
}

/// Popup actions: write the store, then tell the active tab best-effort
#[derive(Clone)]
pub struct PopupActions {
    store: VocabularyStore,
    registry: Arc<TabRegistry>,
}

impl PopupActions {
    pub fn new(store: VocabularyStore, registry: Arc<TabRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn state(&self) -> Result<UserState, PopupError> {
        Ok(self.store.state().await?)
    }

    /// Learning words in the user's preferred order
    pub async fn learning_words(&self) -> Result<Vec<WordPair>, PopupError> {
        Ok(self.store.state().await?.sorted_learning_words())
    }

    pub async fn add_word(&self, source: &str, target: &str) -> Result<bool, PopupError> {
        let source = DefaultPreprocessor.normalize_word(source);
        let target = DefaultPreprocessor.normalize_word(target);
        if source.is_empty() || target.is_empty() {
            return Err(PopupError::MissingFields);
        }

        let added = self.store.add_word(WordPair::new(&source, target.clone())).await?;
        if added {
            self.registry
                .broadcast(PageMessage::AddWordDirect {
                    word: source,
                    translation: target,
                })
                .await;
        }
        Ok(added)
    }

    /// Hand a typed word to the active tab, which translates it and opens the
    /// add-word overlay. Unlike broadcasts, a missing tab is the caller's error.
    pub async fn show_add_modal(
        &self,
        word: &str,
        sentence: Option<&str>,
        direction: Direction,
        part_of_speech: Option<PartOfSpeech>,
    ) -> Result<(), PopupError> {
        let word = DefaultPreprocessor.normalize_word(word);
        if word.is_empty() {
            return Err(PopupError::MissingWord);
        }
        let sentence = sentence
            .map(|s| DefaultPreprocessor.process(s))
            .filter(|s| !s.is_empty());

        self.registry
            .send_to_active(PageMessage::ShowAddModal {
                word,
                sentence,
                direction,
                part_of_speech,
            })
            .await
            .inspect_err(|e| tracing::error!("Add word from popup failed: {}", e))?;
        Ok(())
    }

    pub async fn remove_word(&self, word: &str) -> Result<bool, PopupError> {
        let removed = self.store.remove_word(word).await?;
        if removed {
            self.registry
                .broadcast(PageMessage::RemoveWord {
                    word: word.to_string(),
                })
                .await;
        }
        Ok(removed)
    }

    /// Learned words stop being swapped
    pub async fn mark_learned(&self, word: &str) -> Result<bool, PopupError> {
        let moved = self.store.mark_as_learned(word).await?;
        if moved {
            self.registry
                .broadcast(PageMessage::RemoveWord {
                    word: word.to_string(),
                })
                .await;
        }
        Ok(moved)
    }

    pub async fn move_to_learning(&self, word: &str) -> Result<bool, PopupError> {
        let Some(pair) = self.store.move_to_learning(word).await? else {
            return Ok(false);
        };
        self.registry
            .broadcast(PageMessage::AddWordDirect {
                word: pair.source_word,
                translation: pair.target_word,
            })
            .await;
        Ok(true)
    }

    pub async fn remove_learned_word(&self, word: &str) -> Result<bool, PopupError> {
        Ok(self.store.remove_learned_word(word).await?)
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), PopupError> {
        self.store.set_enabled(enabled).await?;
        self.registry.broadcast(PageMessage::Toggle { enabled }).await;
        Ok(())
    }

    /// Returns the normalized domain that was stored
    pub async fn block_domain(&self, domain: &str) -> Result<String, PopupError> {
        let domain = normalize_domain(domain).ok_or(PopupError::InvalidDomain)?;
        if self.store.add_blocked_domain(&domain).await?.is_none() {
            tracing::debug!("{} already blocked", domain);
            return Ok(domain);
        }

        self.registry
            .broadcast(PageMessage::DomainBlocked {
                domain: domain.clone(),
            })
            .await;
        Ok(domain)
    }

    /// Takes effect on the next page load
    pub async fn unblock_domain(&self, domain: &str) -> Result<bool, PopupError> {
        Ok(self.store.remove_blocked_domain(domain).await?)
    }

    pub async fn set_api_key(&self, key: Option<String>) -> Result<(), PopupError> {
        Ok(self.store.set_api_key(key).await?)
    }

    pub async fn set_sort_preference(&self, sort: SortPreference) -> Result<(), PopupError> {
        Ok(self.store.set_sort_preference(sort).await?)
    }
}
