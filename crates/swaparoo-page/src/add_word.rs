//! Add-word flow: capture, translate, confirm.
//!
//! The flow is `Translating -> Ready | Failed`. Each translation request
//! carries the generation it was issued under; swapping direction bumps the
//! generation so a reply for the old direction can never fill the new one.

use swaparoo_core::{Tagger, WordPair};
use swaparoo_types::{BackgroundRequest, BackgroundResponse, Direction, PartOfSpeech};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save word. Try again or reload the page.";
pub const TRANSLATION_FAILED_MESSAGE: &str = "Translation failed. Check your API key in settings.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatus {
    Translating,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Translation still in progress")]
    Translating,

    #[error("Both words are required")]
    Incomplete,
}

/// Translated fields delivered by the background
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub word: Option<String>,
    pub sentence: Option<String>,
}

impl Resolution {
    /// Failure text is the background's message, or a generic one when nothing came back
    pub fn from_response(response: BackgroundResponse) -> Result<Self, String> {
        let resolution = match response {
            BackgroundResponse::Translation(reply) => {
                if let Some(error) = reply.error {
                    return Err(error);
                }
                Resolution {
                    word: reply.translation,
                    sentence: None,
                }
            }
            BackgroundResponse::SentenceTranslation(reply) => {
                if let Some(error) = reply.error {
                    return Err(error);
                }
                Resolution {
                    word: reply.word,
                    sentence: reply.sentence,
                }
            }
        };

        if resolution.word.as_deref().is_none_or(|w| w.trim().is_empty()) {
            return Err(TRANSLATION_FAILED_MESSAGE.to_string());
        }
        Ok(resolution)
    }
}

#[derive(Debug, Clone)]
pub struct AddWordFlow {
    word: String,
    sentence: Option<String>,
    direction: Direction,
    translated_word: Option<String>,
    translated_sentence: Option<String>,
    part_of_speech: Option<PartOfSpeech>,
    pos_chosen: bool,
    status: FlowStatus,
    generation: u64,
    save_error: Option<String>,
}

impl AddWordFlow {
    pub fn new(
        word: &str,
        sentence: Option<String>,
        direction: Direction,
        part_of_speech: Option<PartOfSpeech>,
    ) -> Self {
        Self {
            word: word.trim().to_lowercase(),
            sentence: sentence.filter(|s| !s.trim().is_empty()),
            direction,
            translated_word: None,
            translated_sentence: None,
            pos_chosen: part_of_speech.is_some(),
            part_of_speech,
            status: FlowStatus::Translating,
            generation: 0,
            save_error: None,
        }
    }

    /// Fill in the part of speech from context unless one was given
    pub fn detect_part_of_speech(&mut self, tagger: &dyn Tagger) {
        if self.pos_chosen {
            return;
        }
        if let Some(sentence) = &self.sentence {
            self.part_of_speech = tagger.tag(&self.word, sentence);
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn sentence(&self) -> Option<&str> {
        self.sentence.as_deref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn translated_word(&self) -> Option<&str> {
        self.translated_word.as_deref()
    }

    pub fn translated_sentence(&self) -> Option<&str> {
        self.translated_sentence.as_deref()
    }

    pub fn part_of_speech(&self) -> Option<PartOfSpeech> {
        self.part_of_speech
    }

    pub fn status(&self) -> &FlowStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Request for the current direction; a sentence rides along when captured
    pub fn translation_request(&self) -> BackgroundRequest {
        match &self.sentence {
            Some(sentence) => BackgroundRequest::TranslateWithSentence {
                word: self.word.clone(),
                sentence: sentence.clone(),
                direction: self.direction,
            },
            None => BackgroundRequest::Translate {
                word: self.word.clone(),
                direction: self.direction,
                context: None,
            },
        }
    }

    /// Returns false when `generation` belongs to an abandoned request
    pub fn apply_resolution(&mut self, generation: u64, result: Result<Resolution, String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale translation (generation {} != {})",
                generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(resolution) => {
                self.translated_word = resolution.word.map(|w| w.trim().to_lowercase());
                self.translated_sentence = resolution.sentence;
                self.status = FlowStatus::Ready;
            }
            Err(message) => {
                self.translated_word = None;
                self.translated_sentence = None;
                self.status = FlowStatus::Failed(message);
            }
        }
        true
    }

    /// Flip direction, discard translations and return the request to issue next
    pub fn swap_direction(&mut self) -> BackgroundRequest {
        self.direction = self.direction.flipped();
        self.translated_word = None;
        self.translated_sentence = None;
        self.save_error = None;
        self.status = FlowStatus::Translating;
        self.generation += 1;
        self.translation_request()
    }

    pub fn set_part_of_speech(&mut self, part_of_speech: Option<PartOfSpeech>) {
        self.part_of_speech = part_of_speech;
        self.pos_chosen = true;
    }

    pub fn set_save_error(&mut self, message: impl Into<String>) {
        self.save_error = Some(message.into());
    }

    /// Source-side and target-side words as the modal shows them
    pub fn sides(&self) -> (Option<&str>, Option<&str>) {
        let original = Some(self.word.as_str());
        let translated = self.translated_word.as_deref();
        match self.direction {
            Direction::SourceToTarget => (original, translated),
            Direction::TargetToSource => (translated, original),
        }
    }

    pub fn can_commit(&self) -> bool {
        self.status != FlowStatus::Translating
            && matches!(self.sides(), (Some(s), Some(t)) if !s.trim().is_empty() && !t.trim().is_empty())
    }

    /// Build the pair to persist, mapping fields by direction
    pub fn commit(&self) -> Result<WordPair, FlowError> {
        if self.status == FlowStatus::Translating {
            return Err(FlowError::Translating);
        }
        let (Some(source), Some(target)) = self.sides() else {
            return Err(FlowError::Incomplete);
        };
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(FlowError::Incomplete);
        }

        let (source_example, target_example) = match self.direction {
            Direction::SourceToTarget => (self.sentence.clone(), self.translated_sentence.clone()),
            Direction::TargetToSource => (self.translated_sentence.clone(), self.sentence.clone()),
        };

        Ok(WordPair::new(source, target.trim().to_lowercase())
            .with_part_of_speech(self.part_of_speech)
            .with_examples(source_example, target_example))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swaparoo_core::HeuristicTagger;
    use swaparoo_types::{SentenceReply, TranslateReply};

    fn resolved(word: &str, sentence: Option<&str>) -> Result<Resolution, String> {
        Ok(Resolution {
            word: Some(word.to_string()),
            sentence: sentence.map(str::to_string),
        })
    }

    #[test]
    fn request_shape_follows_sentence_presence() {
        let with = AddWordFlow::new("Run", Some("I like to run.".into()), Direction::SourceToTarget, None);
        assert!(matches!(
            with.translation_request(),
            BackgroundRequest::TranslateWithSentence { ref word, .. } if word == "run"
        ));

        let without = AddWordFlow::new("run", None, Direction::SourceToTarget, None);
        assert!(matches!(
            without.translation_request(),
            BackgroundRequest::Translate { context: None, .. }
        ));
    }

    #[test]
    fn source_to_target_commit() {
        let mut flow = AddWordFlow::new("run", Some("I like to run.".into()), Direction::SourceToTarget, None);
        flow.detect_part_of_speech(&HeuristicTagger::new());
        assert_eq!(flow.part_of_speech(), Some(PartOfSpeech::Verb));
        assert!(!flow.can_commit());

        assert!(flow.apply_resolution(0, resolved("Correr", Some("Me gusta correr."))));
        let pair = flow.commit().unwrap();
        assert_eq!(pair.source_word, "run");
        assert_eq!(pair.target_word, "correr");
        assert_eq!(pair.example_sentence_source.as_deref(), Some("I like to run."));
        assert_eq!(pair.example_sentence_target.as_deref(), Some("Me gusta correr."));
        assert_eq!(pair.part_of_speech, Some(PartOfSpeech::Verb));
    }

    #[test]
    fn swap_discards_late_reply_for_old_direction() {
        let mut flow = AddWordFlow::new("agua", Some("El agua está fría.".into()), Direction::SourceToTarget, None);
        let old = flow.generation();

        let request = flow.swap_direction();
        assert!(matches!(
            request,
            BackgroundRequest::TranslateWithSentence { direction: Direction::TargetToSource, .. }
        ));

        assert!(!flow.apply_resolution(old, resolved("aguas", None)));
        assert_eq!(flow.translated_word(), None);
        assert_eq!(flow.status(), &FlowStatus::Translating);

        assert!(flow.apply_resolution(flow.generation(), resolved("water", Some("The water is cold."))));
        let pair = flow.commit().unwrap();
        assert_eq!(pair.source_word, "water");
        assert_eq!(pair.target_word, "agua");
        assert_eq!(pair.example_sentence_source.as_deref(), Some("The water is cold."));
        assert_eq!(pair.example_sentence_target.as_deref(), Some("El agua está fría."));
    }

    #[test]
    fn failure_blocks_commit() {
        let mut flow = AddWordFlow::new("run", None, Direction::SourceToTarget, None);
        assert_eq!(flow.commit().unwrap_err(), FlowError::Translating);

        flow.apply_resolution(0, Err("Translation failed.".into()));
        assert_eq!(flow.status(), &FlowStatus::Failed("Translation failed.".into()));
        assert!(!flow.can_commit());
        assert_eq!(flow.commit().unwrap_err(), FlowError::Incomplete);
    }

    #[test]
    fn explicit_part_of_speech_survives_detection() {
        let mut flow = AddWordFlow::new("run", Some("I like to run.".into()), Direction::SourceToTarget, Some(PartOfSpeech::Noun));
        flow.detect_part_of_speech(&HeuristicTagger::new());
        assert_eq!(flow.part_of_speech(), Some(PartOfSpeech::Noun));
    }

    #[test]
    fn response_errors_become_failures() {
        let err = Resolution::from_response(BackgroundResponse::Translation(TranslateReply::failed(
            "Add your API key in settings to enable translation.",
        )));
        assert_eq!(err.unwrap_err(), "Add your API key in settings to enable translation.");

        let empty = Resolution::from_response(BackgroundResponse::SentenceTranslation(SentenceReply::default()));
        assert_eq!(empty.unwrap_err(), TRANSLATION_FAILED_MESSAGE);
    }
}
