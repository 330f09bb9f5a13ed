use serde::{Deserialize, Serialize};

use crate::language::{Direction, PartOfSpeech};

/// Browser tab identifier assigned by the background process
pub type TabId = u32;

/// Fire-and-forget messages delivered to a tab's page instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum PageMessage {
    /// Context menu or shortcut asked to add the current selection
    AddWord { word: String },
    /// Open the add-word flow with already captured context
    ShowAddModal {
        word: String,
        #[serde(default)]
        sentence: Option<String>,
        #[serde(default)]
        direction: Direction,
        #[serde(default)]
        part_of_speech: Option<PartOfSpeech>,
    },
    /// Apply a freshly stored pair without re-reading the store
    AddWordDirect { word: String, translation: String },
    /// Reverse every marker of the word
    RemoveWord { word: String },
    /// Global kill switch flipped
    Toggle { enabled: bool },
    /// Hostname suffix added to the block list
    DomainBlocked { domain: String },
}

impl PageMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PageMessage::AddWord { .. } => "ADD_WORD",
            PageMessage::ShowAddModal { .. } => "SHOW_ADD_MODAL",
            PageMessage::AddWordDirect { .. } => "ADD_WORD_DIRECT",
            PageMessage::RemoveWord { .. } => "REMOVE_WORD",
            PageMessage::Toggle { .. } => "TOGGLE",
            PageMessage::DomainBlocked { .. } => "DOMAIN_BLOCKED",
        }
    }
}

/// Request/response messages handled by the background process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum BackgroundRequest {
    Translate {
        word: String,
        direction: Direction,
        #[serde(default)]
        context: Option<String>,
    },
    TranslateWithSentence {
        word: String,
        sentence: String,
        direction: Direction,
    },
}

impl BackgroundRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            BackgroundRequest::Translate { .. } => "TRANSLATE",
            BackgroundRequest::TranslateWithSentence { .. } => "TRANSLATE_WITH_SENTENCE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackgroundResponse {
    Translation(TranslateReply),
    SentenceTranslation(SentenceReply),
}

/// Reply to `TRANSLATE`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslateReply {
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslateReply {
    pub fn ok(translation: Option<String>) -> Self {
        Self {
            translation,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            translation: None,
            error: Some(error.into()),
        }
    }
}

/// Reply to `TRANSLATE_WITH_SENTENCE`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentenceReply {
    pub word: Option<String>,
    pub sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentenceReply {
    pub fn ok(word: Option<String>, sentence: Option<String>) -> Self {
        Self {
            word,
            sentence,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            word: None,
            sentence: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingError {
    #[error("no page listener loaded in tab {0}")]
    TargetAbsent(TabId),

    #[error("no active tab")]
    NoActiveTab,

    #[error("message channel disconnected")]
    Disconnected,

    #[error("tab {0} is not keeping up with messages")]
    TargetBusy(TabId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_message_wire_shape() {
        let msg = PageMessage::AddWordDirect {
            word: "water".to_string(),
            translation: "agua".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "ADD_WORD_DIRECT");
        assert_eq!(json["translation"], "agua");
        assert_eq!(msg.kind(), "ADD_WORD_DIRECT");
    }

    #[test]
    fn show_add_modal_defaults_missing_fields() {
        let msg: PageMessage =
            serde_json::from_str(r#"{"type":"SHOW_ADD_MODAL","word":"run"}"#).unwrap();
        assert_eq!(
            msg,
            PageMessage::ShowAddModal {
                word: "run".to_string(),
                sentence: None,
                direction: Direction::SourceToTarget,
                part_of_speech: None,
            }
        );
    }

    #[test]
    fn sentence_request_uses_camel_case_tag() {
        let req: BackgroundRequest = serde_json::from_str(
            r#"{"type":"TRANSLATE_WITH_SENTENCE","word":"run","sentence":"I like to run.","direction":"en-to-es"}"#,
        )
        .unwrap();
        assert_eq!(req.kind(), "TRANSLATE_WITH_SENTENCE");
    }

    #[test]
    fn untagged_reply_picks_matching_shape() {
        let reply: BackgroundResponse =
            serde_json::from_str(r#"{"word":"correr","sentence":"Me gusta correr."}"#).unwrap();
        assert!(matches!(reply, BackgroundResponse::SentenceTranslation(_)));

        let reply: BackgroundResponse = serde_json::from_str(r#"{"translation":"agua"}"#).unwrap();
        assert_eq!(
            reply,
            BackgroundResponse::Translation(TranslateReply::ok(Some("agua".to_string())))
        );
    }

    #[test]
    fn failed_sentence_reply_keeps_nulls() {
        let json = serde_json::to_value(SentenceReply::failed("no key")).unwrap();
        assert!(json["word"].is_null());
        assert!(json["sentence"].is_null());
        assert_eq!(json["error"], "no key");
    }
}
