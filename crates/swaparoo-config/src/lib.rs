use std::env;

use serde::{Deserialize, Serialize};

use self::scanner::ScannerConfig;
use self::store::StoreConfig;
use self::translator::TranslatorConfig;

pub mod scanner;
pub mod store;
pub mod translator;

fn default_page_channel_capacity() -> usize {
    64
}

fn default_request_channel_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub scanner: ScannerConfig,
    pub store: StoreConfig,

    /// Per-tab event queue size
    #[serde(default = "default_page_channel_capacity")]
    pub page_channel_capacity: usize,
    /// Background request queue size shared by all tabs
    #[serde(default = "default_request_channel_capacity")]
    pub request_channel_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let tooltip_hide_delay_ms = env::var("TOOLTIP_HIDE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(150); // 150ms grace period

        let context_radius = env::var("CONTEXT_RADIUS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let page_channel_capacity = env::var("PAGE_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_page_channel_capacity);

        let request_channel_capacity = env::var("REQUEST_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_request_channel_capacity);

        Config {
            translator: TranslatorConfig::new(),
            scanner: ScannerConfig {
                tooltip_hide_delay_ms,
                context_radius,
                ..ScannerConfig::default()
            },
            store: StoreConfig::new(),

            page_channel_capacity,
            request_channel_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator: TranslatorConfig::default(),
            scanner: ScannerConfig::default(),
            store: StoreConfig::default(),
            page_channel_capacity: default_page_channel_capacity(),
            request_channel_capacity: default_request_channel_capacity(),
        }
    }
}
