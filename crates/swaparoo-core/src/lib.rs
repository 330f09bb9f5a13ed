pub mod domain;
pub mod error;
pub mod preprocess;
pub mod state;
pub mod store;
pub mod tagger;

pub use domain::{is_domain_blocked, normalize_domain};
pub use error::StoreError;
pub use state::{SortKey, SortOrder, SortPreference, StatePatch, UserState, WordPair};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, VocabularyStore};
pub use tagger::{HeuristicTagger, Tagger};
