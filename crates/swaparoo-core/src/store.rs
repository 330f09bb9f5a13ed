use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};

use crate::domain::normalize_domain;
use crate::error::StoreError;
use crate::state::{STATE_KEY, SortPreference, StatePatch, UserState, WordPair};

/// Async key-value persistence used for the user state record
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Process-local store, used by tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Single JSON object on disk, one entry per key
pub struct JsonFileStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) if data.trim().is_empty() => Ok(Map::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Wrote {} to {}", key, self.path.display());
        Ok(())
    }
}

/// Vocabulary operations over the persisted [`UserState`].
///
/// Every mutation is read-modify-write: read the current state, compute a
/// partial patch, then merge it over a fresh read and write the result. There
/// is no arbitration between concurrent writers; the later write wins.
#[derive(Clone)]
pub struct VocabularyStore {
    backend: Arc<dyn KeyValueStore>,
}

impl VocabularyStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Current state, normalized; a missing record yields the seeded default
    pub async fn state(&self) -> Result<UserState, StoreError> {
        match self.backend.get(STATE_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(UserState::default()),
        }
    }

    /// Merge `patch` over the current state and persist the result
    pub async fn update(&self, patch: StatePatch) -> Result<UserState, StoreError> {
        let mut state = self.state().await?;
        state.apply(patch);
        self.backend
            .set(STATE_KEY, serde_json::to_value(&state)?)
            .await?;
        Ok(state)
    }

    /// Append to the learning set; `false` when the source word already exists there.
    ///
    /// A word currently in the learned set is moved back to learning with the new pair.
    pub async fn add_word(&self, pair: WordPair) -> Result<bool, StoreError> {
        let state = self.state().await?;
        if state.find_learning(&pair.source_word).is_some() {
            tracing::debug!("'{}' already in learning set", pair.source_word);
            return Ok(false);
        }

        let mut learning_words = state.learning_words;
        let learned_patch: Option<Vec<WordPair>> = state
            .learned_words
            .iter()
            .any(|w| w.matches(&pair.source_word))
            .then(|| {
                state
                    .learned_words
                    .iter()
                    .filter(|w| !w.matches(&pair.source_word))
                    .cloned()
                    .collect()
            });

        tracing::info!("Adding '{}' -> '{}'", pair.source_word, pair.target_word);
        learning_words.push(pair);

        self.update(StatePatch {
            learning_words: Some(learning_words),
            learned_words: learned_patch,
            ..StatePatch::default()
        })
        .await?;
        Ok(true)
    }

    /// Delete from the learning set permanently
    pub async fn remove_word(&self, word: &str) -> Result<bool, StoreError> {
        let state = self.state().await?;
        let before = state.learning_words.len();
        let learning_words: Vec<WordPair> = state
            .learning_words
            .into_iter()
            .filter(|w| !w.matches(word))
            .collect();
        let removed = learning_words.len() != before;

        self.update(StatePatch {
            learning_words: Some(learning_words),
            ..StatePatch::default()
        })
        .await?;
        Ok(removed)
    }

    /// Delete from the learned set permanently
    pub async fn remove_learned_word(&self, word: &str) -> Result<bool, StoreError> {
        let state = self.state().await?;
        let before = state.learned_words.len();
        let learned_words: Vec<WordPair> = state
            .learned_words
            .into_iter()
            .filter(|w| !w.matches(word))
            .collect();
        let removed = learned_words.len() != before;

        self.update(StatePatch {
            learned_words: Some(learned_words),
            ..StatePatch::default()
        })
        .await?;
        Ok(removed)
    }

    /// Move a pair from learning to learned in one write
    pub async fn mark_as_learned(&self, word: &str) -> Result<bool, StoreError> {
        let state = self.state().await?;
        let Some(pair) = state.find_learning(word).cloned() else {
            return Ok(false);
        };

        let learning_words = state
            .learning_words
            .iter()
            .filter(|w| !w.matches(word))
            .cloned()
            .collect();
        let mut learned_words: Vec<WordPair> = state
            .learned_words
            .iter()
            .filter(|w| !w.matches(word))
            .cloned()
            .collect();
        learned_words.push(pair);

        self.update(StatePatch {
            learning_words: Some(learning_words),
            learned_words: Some(learned_words),
            ..StatePatch::default()
        })
        .await?;
        Ok(true)
    }

    /// Move a pair from learned back to learning in one write
    pub async fn move_to_learning(&self, word: &str) -> Result<Option<WordPair>, StoreError> {
        let state = self.state().await?;
        let Some(pair) = state.find_learned(word).cloned() else {
            return Ok(None);
        };

        let learned_words = state
            .learned_words
            .iter()
            .filter(|w| !w.matches(word))
            .cloned()
            .collect();
        let mut learning_words: Vec<WordPair> = state
            .learning_words
            .iter()
            .filter(|w| !w.matches(word))
            .cloned()
            .collect();
        learning_words.push(pair.clone());

        self.update(StatePatch {
            learning_words: Some(learning_words),
            learned_words: Some(learned_words),
            ..StatePatch::default()
        })
        .await?;
        Ok(Some(pair))
    }

    pub async fn api_key(&self) -> Result<Option<String>, StoreError> {
        Ok(self.state().await?.provider_api_key)
    }

    /// Store or clear (`None` or blank) the provider key
    pub async fn set_api_key(&self, key: Option<String>) -> Result<(), StoreError> {
        let key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.update(StatePatch {
            provider_api_key: Some(key),
            ..StatePatch::default()
        })
        .await?;
        Ok(())
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.update(StatePatch {
            enabled: Some(enabled),
            ..StatePatch::default()
        })
        .await?;
        Ok(())
    }

    pub async fn set_sort_preference(&self, sort: SortPreference) -> Result<(), StoreError> {
        self.update(StatePatch {
            sort_preference: Some(sort),
            ..StatePatch::default()
        })
        .await?;
        Ok(())
    }

    /// Returns the normalized entry when it was newly added
    pub async fn add_blocked_domain(&self, domain: &str) -> Result<Option<String>, StoreError> {
        let Some(domain) = normalize_domain(domain) else {
            return Ok(None);
        };

        let state = self.state().await?;
        if state.blocked_domains.contains(&domain) {
            return Ok(None);
        }

        let mut blocked_domains = state.blocked_domains;
        blocked_domains.push(domain.clone());
        self.update(StatePatch {
            blocked_domains: Some(blocked_domains),
            ..StatePatch::default()
        })
        .await?;
        Ok(Some(domain))
    }

    pub async fn remove_blocked_domain(&self, domain: &str) -> Result<bool, StoreError> {
        let Some(domain) = normalize_domain(domain) else {
            return Ok(false);
        };

        let state = self.state().await?;
        let before = state.blocked_domains.len();
        let blocked_domains: Vec<String> = state
            .blocked_domains
            .into_iter()
            .filter(|d| *d != domain)
            .collect();
        let removed = blocked_domains.len() != before;

        self.update(StatePatch {
            blocked_domains: Some(blocked_domains),
            ..StatePatch::default()
        })
        .await?;
        Ok(removed)
    }
}
