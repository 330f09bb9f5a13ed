use swaparoo_types::Direction;

use crate::{TranslateError, Translator};

/// The single source/target language pair the extension works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn resolve(&self, direction: Direction) -> (&str, &str) {
        direction.languages(&self.source, &self.target)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceTranslation {
    pub word: Option<String>,
    pub sentence: Option<String>,
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Translate one word, optionally disambiguated by a context sentence.
///
/// Word translations are lowercased; an empty result is `None`.
pub async fn translate_word(
    translator: &dyn Translator,
    languages: &LanguagePair,
    word: &str,
    direction: Direction,
    context: Option<&str>,
) -> Result<Option<String>, TranslateError> {
    let (from, to) = languages.resolve(direction);
    let results = translator
        .translate_batch(&[word], context, from, to)
        .await?;

    Ok(results
        .into_iter()
        .next()
        .and_then(|t| non_empty(t.text.to_lowercase())))
}

/// Translate a word and its sentence in one round trip, the sentence doubling as context
pub async fn translate_with_sentence(
    translator: &dyn Translator,
    languages: &LanguagePair,
    word: &str,
    sentence: &str,
    direction: Direction,
) -> Result<SentenceTranslation, TranslateError> {
    let (from, to) = languages.resolve(direction);
    let mut results = translator
        .translate_batch(&[word, sentence], Some(sentence), from, to)
        .await?
        .into_iter();

    let word = results.next().and_then(|t| non_empty(t.text.to_lowercase()));
    let sentence = results.next().and_then(|t| non_empty(t.text));

    tracing::debug!("Sentence translation resolved: word={:?}", word);
    Ok(SentenceTranslation { word, sentence })
}
