use std::env;

use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "deepl".to_string()
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "es".to_string()
}

fn default_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

/// Translation provider settings.
///
/// The API key is user state, not configuration; it lives in the vocabulary
/// store and is only ever read by the background process.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let defaults = Self::default();

        Self {
            source_lang: env::var("SWAPAROO_SOURCE_LANG").unwrap_or(defaults.source_lang),
            target_lang: env::var("SWAPAROO_TARGET_LANG").unwrap_or(defaults.target_lang),
            api_url: env::var("SWAPAROO_API_URL").unwrap_or(defaults.api_url),
            provider: defaults.provider,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            api_url: default_api_url(),
        }
    }
}
