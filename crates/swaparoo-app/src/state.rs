use std::sync::Arc;

use swaparoo_config::Config;
use swaparoo_core::{HeuristicTagger, Tagger, VocabularyStore};
use swaparoo_translator::{LanguagePair, TranslatorFactory};
use tokio::sync::RwLock;

/// Background-process state shared by the router, popup and pages
pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub store: VocabularyStore,
    pub translators: Arc<dyn TranslatorFactory>,
    pub tagger: Arc<dyn Tagger>,
}

impl AppState {
    pub fn new(config: Config, store: VocabularyStore, translators: Arc<dyn TranslatorFactory>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            translators,
            tagger: Arc::new(HeuristicTagger::new()),
        }
    }

    pub async fn languages(&self) -> LanguagePair {
        let config = self.config.read().await;
        LanguagePair::new(
            config.translator.source_lang.clone(),
            config.translator.target_lang.clone(),
        )
    }
}
