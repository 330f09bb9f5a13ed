use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{TranslateError, Translation, Translator, TranslatorFactory};

#[derive(Serialize)]
struct DeepLRequest<'a> {
    text: &'a [&'a str],
    source_lang: String,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

#[derive(Deserialize)]
struct DeepLResponse {
    #[serde(default)]
    translations: Vec<DeepLTranslation>,
}

#[derive(Deserialize)]
struct DeepLTranslation {
    text: String,
}

#[derive(Clone)]
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, api_url)
    }

    pub fn with_client(client: reqwest::Client, api_key: String, api_url: String) -> Self {
        Self {
            client,
            api_key,
            api_url,
        }
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate_batch(
        &self,
        texts: &[&str],
        context: Option<&str>,
        from: &str,
        to: &str,
    ) -> Result<Vec<Translation>, TranslateError> {
        if self.api_key.trim().is_empty() {
            return Err(TranslateError::MissingApiKey);
        }

        let body = DeepLRequest {
            text: texts,
            source_lang: from.to_uppercase(),
            target_lang: to.to_uppercase(),
            context,
        };

        tracing::debug!("DeepL request: {} text(s) {} -> {}", texts.len(), from, to);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if response.status() == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: DeepLResponse = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        Ok(parsed
            .translations
            .into_iter()
            .map(|t| Translation {
                text: t.text,
                from: from.to_string(),
                to: to.to_string(),
                provider: "deepl".to_string(),
            })
            .collect())
    }
}

/// Hands out [`DeepLTranslator`]s sharing one connection pool
#[derive(Clone)]
pub struct DeepLProvider {
    client: reqwest::Client,
    api_url: String,
}

impl DeepLProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }
}

impl TranslatorFactory for DeepLProvider {
    fn translator(&self, api_key: &str) -> Box<dyn Translator> {
        Box::new(DeepLTranslator::with_client(
            self.client.clone(),
            api_key.to_string(),
            self.api_url.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn translator(server: &MockServer, key: &str) -> Box<dyn Translator> {
        DeepLProvider::new(format!("{}/v2/translate", server.uri())).translator(key)
    }

    #[tokio::test]
    async fn sends_positional_batch_with_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/translate"))
            .and(header("Authorization", "DeepL-Auth-Key secret"))
            .and(body_json(json!({
                "text": ["run", "I like to run."],
                "source_lang": "EN",
                "target_lang": "ES",
                "context": "I like to run."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "translations": [
                    {"detected_source_language": "EN", "text": "correr"},
                    {"detected_source_language": "EN", "text": "Me gusta correr."}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = translator(&server, "secret")
            .translate_batch(&["run", "I like to run."], Some("I like to run."), "en", "es")
            .await
            .unwrap();

        let texts: Vec<_> = results.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["correr", "Me gusta correr."]);
        assert_eq!(results[0].provider, "deepl");
    }

    #[tokio::test]
    async fn missing_key_never_hits_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = translator(&server, "  ")
            .translate("water", "en", "es")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::MissingApiKey));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn maps_http_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let t = translator(&server, "secret");
        assert!(matches!(
            t.translate("a", "en", "es").await,
            Err(TranslateError::AuthenticationError)
        ));
        assert!(matches!(
            t.translate("a", "en", "es").await,
            Err(TranslateError::RateLimitExceeded)
        ));
        let err = t.translate("a", "en", "es").await.unwrap_err();
        assert!(matches!(err, TranslateError::ApiError(_)));
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn empty_translation_list_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"translations": []})))
            .mount(&server)
            .await;

        let err = translator(&server, "secret")
            .translate("a", "en", "es")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::ApiError(_)));
    }
}
