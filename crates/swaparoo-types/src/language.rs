use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of the configured language pair a word starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Word is in the source (native) language and gets translated to the target
    #[default]
    #[serde(rename = "source-to-target", alias = "en-to-es")]
    SourceToTarget,
    /// Word is in the target (learned) language and gets translated back
    #[serde(rename = "target-to-source", alias = "es-to-en")]
    TargetToSource,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::SourceToTarget => Direction::TargetToSource,
            Direction::TargetToSource => Direction::SourceToTarget,
        }
    }

    /// Resolve `(from, to)` language codes for this direction
    pub fn languages<'a>(self, source: &'a str, target: &'a str) -> (&'a str, &'a str) {
        match self {
            Direction::SourceToTarget => (source, target),
            Direction::TargetToSource => (target, source),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::SourceToTarget => "source-to-target",
            Direction::TargetToSource => "target-to-source",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "source-to-target" | "en-to-es" => Ok(Direction::SourceToTarget),
            "target-to-source" | "es-to-en" => Ok(Direction::TargetToSource),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Coarse grammatical category attached to a word pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    #[serde(alias = "n")]
    Noun,
    #[serde(alias = "v")]
    Verb,
    #[serde(alias = "adjective")]
    Adj,
    #[serde(alias = "adverb")]
    Adv,
    Other,
}

impl PartOfSpeech {
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adj => "adj",
            PartOfSpeech::Adv => "adv",
            PartOfSpeech::Other => "other",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = ParsePartOfSpeechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "noun" | "n" => Ok(PartOfSpeech::Noun),
            "verb" | "v" => Ok(PartOfSpeech::Verb),
            "adj" | "adjective" => Ok(PartOfSpeech::Adj),
            "adv" | "adverb" => Ok(PartOfSpeech::Adv),
            "other" | "prep" | "conj" | "pron" => Ok(PartOfSpeech::Other),
            other => Err(ParsePartOfSpeechError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown part of speech: {0}")]
pub struct ParsePartOfSpeechError(pub String);
