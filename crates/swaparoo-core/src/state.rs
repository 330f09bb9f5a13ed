use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use swaparoo_types::PartOfSpeech;

use crate::domain::normalize_domain;

/// Key of the single persisted record
pub const STATE_KEY: &str = "userState";

const DEFAULT_WORDS: [(&str, &str); 10] = [
    ("time", "tiempo"),
    ("world", "mundo"),
    ("life", "vida"),
    ("day", "día"),
    ("house", "casa"),
    ("water", "agua"),
    ("money", "dinero"),
    ("book", "libro"),
    ("friend", "amigo"),
    ("family", "familia"),
];

/// One vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPair {
    #[serde(alias = "en")]
    pub source_word: String,
    #[serde(alias = "es")]
    pub target_word: String,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub added_at: i64,
    #[serde(
        default,
        alias = "pos",
        deserialize_with = "lenient_part_of_speech",
        skip_serializing_if = "Option::is_none"
    )]
    pub part_of_speech: Option<PartOfSpeech>,
    #[serde(default, alias = "sentenceEn", skip_serializing_if = "Option::is_none")]
    pub example_sentence_source: Option<String>,
    #[serde(default, alias = "sentenceEs", skip_serializing_if = "Option::is_none")]
    pub example_sentence_target: Option<String>,
}

impl WordPair {
    pub fn new(source_word: impl AsRef<str>, target_word: impl Into<String>) -> Self {
        Self {
            source_word: source_word.as_ref().trim().to_lowercase(),
            target_word: target_word.into(),
            added_at: chrono::Utc::now().timestamp_millis(),
            part_of_speech: None,
            example_sentence_source: None,
            example_sentence_target: None,
        }
    }

    pub fn with_part_of_speech(mut self, part_of_speech: Option<PartOfSpeech>) -> Self {
        self.part_of_speech = part_of_speech;
        self
    }

    pub fn with_examples(mut self, source: Option<String>, target: Option<String>) -> Self {
        self.example_sentence_source = source.filter(|s| !s.trim().is_empty());
        self.example_sentence_target = target.filter(|s| !s.trim().is_empty());
        self
    }

    /// Case-insensitive comparison against the source word
    pub fn matches(&self, word: &str) -> bool {
        self.source_word == word.trim().to_lowercase()
    }
}

/// Unknown or empty tags from older records are dropped instead of failing the whole read
fn lenient_part_of_speech<'de, D>(deserializer: D) -> Result<Option<PartOfSpeech>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    SourceWord,
    TargetWord,
    AddedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Word list ordering chosen in the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortPreference {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortPreference {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Stable in-place sort; string keys compare case-insensitively
    pub fn sort(&self, words: &mut [WordPair]) {
        words.sort_by(|a, b| {
            let ordering = match self.key {
                SortKey::SourceWord => cmp_folded(&a.source_word, &b.source_word),
                SortKey::TargetWord => cmp_folded(&a.target_word, &b.target_word),
                SortKey::AddedAt => a.added_at.cmp(&b.added_at),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl Default for SortPreference {
    fn default() -> Self {
        Self {
            key: SortKey::AddedAt,
            order: SortOrder::Desc,
        }
    }
}

impl fmt::Display for SortPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            SortKey::SourceWord => "source",
            SortKey::TargetWord => "target",
            SortKey::AddedAt => "added",
        };
        let order = match self.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        write!(f, "{key}-{order}")
    }
}

impl TryFrom<String> for SortPreference {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (key, order) = value
            .rsplit_once('-')
            .ok_or_else(|| format!("invalid sort preference: {value}"))?;

        let key = match key {
            "source" | "sourceWord" | "en" => SortKey::SourceWord,
            "target" | "targetWord" | "es" => SortKey::TargetWord,
            "added" | "addedAt" => SortKey::AddedAt,
            _ => return Err(format!("invalid sort key: {key}")),
        };
        let order = match order {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return Err(format!("invalid sort order: {order}")),
        };

        Ok(Self { key, order })
    }
}

impl From<SortPreference> for String {
    fn from(value: SortPreference) -> Self {
        value.to_string()
    }
}

/// Persisted record as it may appear on disk: every field optional, legacy names accepted
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserState {
    enabled: Option<bool>,
    #[serde(alias = "words")]
    learning_words: Option<Vec<WordPair>>,
    learned_words: Option<Vec<WordPair>>,
    blocked_domains: Option<Vec<String>>,
    #[serde(alias = "deeplApiKey")]
    provider_api_key: Option<String>,
    #[serde(alias = "sortBy", default, deserialize_with = "lenient_sort_preference")]
    sort_preference: Option<SortPreference>,
}

fn lenient_sort_preference<'de, D>(deserializer: D) -> Result<Option<SortPreference>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| SortPreference::try_from(value).ok()))
}

/// The sole persisted aggregate, always in canonical form.
///
/// Deserializing goes through a normalization step, so every consumer sees
/// defaulted fields, lowercase unique source words, disjoint word sets and
/// normalized blocked domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawUserState")]
pub struct UserState {
    pub enabled: bool,
    pub learning_words: Vec<WordPair>,
    pub learned_words: Vec<WordPair>,
    pub blocked_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_api_key: Option<String>,
    pub sort_preference: SortPreference,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            enabled: true,
            learning_words: DEFAULT_WORDS
                .iter()
                .map(|(source, target)| WordPair {
                    added_at: 0,
                    ..WordPair::new(source, *target)
                })
                .collect(),
            learned_words: Vec::new(),
            blocked_domains: Vec::new(),
            provider_api_key: None,
            sort_preference: SortPreference::default(),
        }
    }
}

impl From<RawUserState> for UserState {
    fn from(raw: RawUserState) -> Self {
        let mut seen = HashSet::new();
        let learning_words: Vec<WordPair> = raw
            .learning_words
            .unwrap_or_default()
            .into_iter()
            .filter_map(canonical_pair)
            .filter(|pair| seen.insert(pair.source_word.clone()))
            .collect();

        // Learning wins when a word sits in both sets
        let learned_words: Vec<WordPair> = raw
            .learned_words
            .unwrap_or_default()
            .into_iter()
            .filter_map(canonical_pair)
            .filter(|pair| seen.insert(pair.source_word.clone()))
            .collect();

        let mut blocked_domains: Vec<String> = Vec::new();
        for domain in raw.blocked_domains.unwrap_or_default() {
            if let Some(domain) = normalize_domain(&domain)
                && !blocked_domains.contains(&domain)
            {
                blocked_domains.push(domain);
            }
        }

        Self {
            enabled: raw.enabled.unwrap_or(true),
            learning_words,
            learned_words,
            blocked_domains,
            provider_api_key: raw
                .provider_api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            sort_preference: raw.sort_preference.unwrap_or_default(),
        }
    }
}

fn canonical_pair(mut pair: WordPair) -> Option<WordPair> {
    pair.source_word = pair.source_word.trim().to_lowercase();
    if pair.source_word.is_empty() || pair.target_word.trim().is_empty() {
        return None;
    }
    Some(pair)
}

impl UserState {
    pub fn find_learning(&self, word: &str) -> Option<&WordPair> {
        self.learning_words.iter().find(|pair| pair.matches(word))
    }

    pub fn find_learned(&self, word: &str) -> Option<&WordPair> {
        self.learned_words.iter().find(|pair| pair.matches(word))
    }

    /// Learning words ordered by the stored preference
    pub fn sorted_learning_words(&self) -> Vec<WordPair> {
        let mut words = self.learning_words.clone();
        self.sort_preference.sort(&mut words);
        words
    }

    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(words) = patch.learning_words {
            self.learning_words = words;
        }
        if let Some(words) = patch.learned_words {
            self.learned_words = words;
        }
        if let Some(domains) = patch.blocked_domains {
            self.blocked_domains = domains;
        }
        if let Some(key) = patch.provider_api_key {
            self.provider_api_key = key;
        }
        if let Some(sort) = patch.sort_preference {
            self.sort_preference = sort;
        }
    }
}

/// Partial update merged over the current state on write
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub enabled: Option<bool>,
    pub learning_words: Option<Vec<WordPair>>,
    pub learned_words: Option<Vec<WordPair>>,
    pub blocked_domains: Option<Vec<String>>,
    /// `Some(None)` clears the key
    pub provider_api_key: Option<Option<String>>,
    pub sort_preference: Option<SortPreference>,
}
