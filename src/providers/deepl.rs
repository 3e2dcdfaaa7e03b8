use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use super::{TranslateOptions, TranslatedBatch, Translator, Usage};

/// Public endpoint for paid API keys
pub const DEEPL_PRO_ENDPOINT: &str = "https://api.deepl.com";

/// Public endpoint for free API keys (keys ending in `:fx`)
pub const DEEPL_FREE_ENDPOINT: &str = "https://api-free.deepl.com";

/// Character limit reported when the API omits one
const DEFAULT_CHARACTER_LIMIT: u64 = 500_000;

/// DeepL returns this status when the character quota is used up
const QUOTA_EXCEEDED_STATUS: u16 = 456;

/// Most `text` entries DeepL accepts in one translate request
pub const MAX_TEXTS_PER_REQUEST: usize = 50;

/// DeepL client for the v2 REST API
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, without the `/v2` suffix
    endpoint: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct DeepLRequest<'a> {
    /// Texts to translate, translated independently but in one call
    pub text: &'a [String],

    /// Target language code
    pub target_lang: &'a str,

    /// Source language code, omitted for auto-detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<&'a str>,

    /// Formality preference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formality: Option<&'a str>,

    /// Ask for per-text billed character counts
    pub show_billed_characters: bool,
}

/// One translated text
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    pub text: String,
    #[serde(default)]
    pub detected_source_language: String,
    #[serde(default)]
    pub billed_characters: Option<u64>,
}

/// Translate response body
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    pub translations: Vec<DeepLTranslation>,
}

/// Usage response body
#[derive(Debug, Deserialize)]
pub struct DeepLUsageResponse {
    #[serde(default)]
    pub character_count: Option<u64>,
    #[serde(default)]
    pub character_limit: Option<u64>,
}

impl std::fmt::Debug for DeepL {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepL")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl DeepL {
    /// Create a new DeepL client.
    ///
    /// An empty endpoint selects the public endpoint matching the key type.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let api_key = api_key.into();
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            Self::default_endpoint(&api_key).to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key,
            endpoint,
        }
    }

    /// Free-tier keys carry a `:fx` suffix and live on a separate host
    pub fn default_endpoint(api_key: &str) -> &'static str {
        if api_key.ends_with(":fx") {
            DEEPL_FREE_ENDPOINT
        } else {
            DEEPL_PRO_ENDPOINT
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    /// Turn a non-success response into a provider error
    async fn error_from_response(response: reqwest::Response) -> ProviderError {
        let status = response.status();
        let message = response.text().await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("DeepL API error ({}): {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            s if s.as_u16() == QUOTA_EXCEEDED_STATUS => ProviderError::QuotaExceeded(message),
            s => ProviderError::ApiError {
                status_code: s.as_u16(),
                message,
            },
        }
    }

    fn request_error(e: reqwest::Error) -> ProviderError {
        if e.is_connect() || e.is_timeout() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }

    /// Send one translate request of at most `MAX_TEXTS_PER_REQUEST` texts
    async fn translate_chunk(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
        options: &TranslateOptions,
    ) -> Result<TranslatedBatch, ProviderError> {
        let request = DeepLRequest {
            text: texts,
            target_lang,
            source_lang,
            formality: options.formality.as_param(),
            show_billed_characters: true,
        };

        debug!("Sending {} texts to DeepL ({:?} -> {})", texts.len(), source_lang, target_lang);

        let response = self.client.post(format!("{}/v2/translate", self.endpoint))
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.json::<DeepLResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let detected_lang = body.translations.first()
            .map(|t| t.detected_source_language.clone())
            .unwrap_or_default();
        let billed_chars = body.translations.iter()
            .map(|t| t.billed_characters.unwrap_or(0))
            .sum();

        Ok(TranslatedBatch {
            texts: body.translations.into_iter().map(|t| t.text).collect(),
            detected_lang,
            billed_chars,
        })
    }
}

#[async_trait]
impl Translator for DeepL {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
        options: &TranslateOptions,
    ) -> Result<TranslatedBatch, ProviderError> {
        if texts.is_empty() {
            return Ok(TranslatedBatch::default());
        }

        // DeepL accepts regional variants for targets only
        let source_lang = source_lang.map(|code| code.split('-').next().unwrap_or(code));

        // Chunks go out one after another so the output keeps the input order
        let mut combined = TranslatedBatch::default();
        for chunk in texts.chunks(MAX_TEXTS_PER_REQUEST) {
            let translated = self.translate_chunk(chunk, target_lang, source_lang, options).await?;
            if combined.detected_lang.is_empty() {
                combined.detected_lang = translated.detected_lang;
            }
            combined.billed_chars += translated.billed_chars;
            combined.texts.extend(translated.texts);
        }

        Ok(combined)
    }

    async fn usage(&self) -> Result<Usage, ProviderError> {
        let response = self.client.get(format!("{}/v2/usage", self.endpoint))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.json::<DeepLUsageResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(Usage {
            count: body.character_count.unwrap_or(0),
            limit: body.character_limit.unwrap_or(DEFAULT_CHARACTER_LIMIT),
        })
    }
}
