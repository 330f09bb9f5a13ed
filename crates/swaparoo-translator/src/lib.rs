mod deepl;
mod lookup;

pub use deepl::{DeepLProvider, DeepLTranslator};
pub use lookup::{LanguagePair, SentenceTranslation, translate_with_sentence, translate_word};

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate several texts in one round trip; results match `texts` positionally
    async fn translate_batch(
        &self,
        texts: &[&str],
        context: Option<&str>,
        from: &str,
        to: &str,
    ) -> Result<Vec<Translation>, TranslateError>;

    /// Translate a single text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        self.translate_batch(&[text], None, from, to)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))
    }
}

/// Builds a translator bound to the user's API key.
///
/// The key is user state read by the background process per request, so
/// providers are constructed late rather than held for the process lifetime.
pub trait TranslatorFactory: Send + Sync {
    fn translator(&self, api_key: &str) -> Box<dyn Translator>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("No translation API key configured")]
    MissingApiKey,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}

impl TranslateError {
    /// Configuration problems need the user to act; everything else may be retried
    pub fn is_configuration(&self) -> bool {
        matches!(self, TranslateError::MissingApiKey)
    }

    /// Inline message shown next to the control that triggered the request
    pub fn user_message(&self) -> &'static str {
        match self {
            TranslateError::MissingApiKey => "Add your API key in settings to enable translation.",
            _ => "Translation failed. Check your connection and API key.",
        }
    }
}
