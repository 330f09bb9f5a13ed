use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_state_path() -> PathBuf {
    PathBuf::from("swaparoo-state.json")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// File backing the persisted user state
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

impl StoreConfig {
    pub fn new() -> Self {
        let state_path = env::var("SWAPAROO_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_state_path());

        Self { state_path }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}
