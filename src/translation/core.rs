/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which turns one
 * source article into translated articles for several target languages.
 * Every target language is an independent task: a provider failure for one
 * language is reported in that language's result and never aborts the rest.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::TranslationConfig;
use crate::article::{DEFAULT_SLUG_MAX_LENGTH, Segments};
use crate::errors::TranslationError;
use crate::language_utils::{to_dir_code, to_provider_code};
use crate::providers::deepl::DeepL;
use crate::providers::{Formality, TranslateOptions, Translator, Usage};

use super::batch::Batch;
use super::estimate::{Estimate, QuotaCheck};
use super::reassembly::{TranslatedSegments, reassemble};

/// Error reported for a language when the article has nothing to translate
pub const NO_CONTENT_ERROR: &str = "No translatable content";

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum number of target languages translated at the same time
    pub max_concurrent_requests: usize,

    /// Maximum length of regenerated taxonomy slugs
    pub slug_max_length: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 4,
            slug_max_length: DEFAULT_SLUG_MAX_LENGTH,
        }
    }
}

/// What to translate an article into
#[derive(Debug, Clone, Default)]
pub struct TranslationRequest {
    /// Target language codes in display (`en`) or provider (`EN-GB`) form
    pub target_languages: Vec<String>,
    /// Source language code, `None` for provider-side detection
    pub source_language: Option<String>,
    /// Formality preference passed to the provider
    pub formality: Formality,
}

/// Outcome for one target language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageResult {
    /// Directory-style language code (`en`, `cs`)
    pub language_code: String,
    /// Provider language code (`EN-US`, `CS`)
    pub provider_language_code: String,
    /// Complete translated document, empty on error
    pub content: String,
    pub billed_chars: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_source_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LanguageResult {
    fn failed(language_code: String, provider_language_code: String, error: String) -> Self {
        Self {
            language_code,
            provider_language_code,
            content: String::new(),
            billed_chars: 0,
            detected_source_lang: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Results for every requested language, in request order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleTranslation {
    pub results: Vec<LanguageResult>,
    pub total_billed_chars: u64,
}

/// Cost estimate with the provider quota it would be charged against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleEstimate {
    #[serde(flatten)]
    pub estimate: Estimate,
    pub quota: QuotaCheck,
}

/// Article translation service
#[derive(Clone)]
pub struct TranslationService {
    /// Provider client, built once and shared by every task
    client: Arc<dyn Translator>,

    /// Translation options
    pub options: TranslationOptions,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("client", &self.client)
            .field("options", &self.options)
            .finish()
    }
}

impl TranslationService {
    /// Create a service around an existing provider client
    pub fn new(client: Arc<dyn Translator>, options: TranslationOptions) -> Self {
        Self { client, options }
    }

    /// Create a service backed by DeepL from configuration
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let api_key = config.get_api_key();
        if api_key.is_empty() {
            return Err(anyhow::anyhow!("Translation API key is required"));
        }

        let client = DeepL::new(api_key, config.provider.endpoint.clone(), config.provider.timeout_secs);
        debug!("Using DeepL endpoint {}", client.endpoint());

        Ok(Self::new(Arc::new(client), TranslationOptions {
            max_concurrent_requests: config.optimal_concurrent_requests(),
            slug_max_length: config.slug_max_length,
        }))
    }

    /// Translate a raw article into every requested language
    ///
    /// # Arguments
    /// * `raw` - Full article text, front matter included
    /// * `source_id` - Identifier of the source article, recorded as provenance
    /// * `request` - Target languages, source language and formality
    pub async fn translate_article(
        &self,
        raw: &str,
        source_id: &str,
        request: &TranslationRequest,
    ) -> Result<ArticleTranslation, TranslationError> {
        let segments = Segments::extract(raw).ok_or(TranslationError::FrontMatter)?;
        self.translate_segments(&segments, source_id, request).await
    }

    /// Translate already extracted segments into every requested language
    pub async fn translate_segments(
        &self,
        segments: &Segments,
        source_id: &str,
        request: &TranslationRequest,
    ) -> Result<ArticleTranslation, TranslationError> {
        if request.target_languages.is_empty() {
            return Err(TranslationError::NoTargetLanguages);
        }

        let batch = Batch::build(segments);
        let source_lang = request.source_language.as_deref().map(to_provider_code);
        let options = TranslateOptions { formality: request.formality };
        let total_languages = request.target_languages.len();

        let batch = &batch;
        let source_lang = source_lang.as_deref();
        let options = &options;

        let mut results = stream::iter(request.target_languages.iter().enumerate())
            .map(|(idx, target)| async move {
                let result = self.translate_language(segments, batch, source_id, target, source_lang, options).await;
                debug!("Language {} of {} finished", idx + 1, total_languages);
                (idx, result)
            })
            .buffer_unordered(self.options.max_concurrent_requests.max(1))
            .collect::<Vec<_>>()
            .await;

        // Sort results by request index to keep the caller's language order
        results.sort_by_key(|(idx, _)| *idx);
        let results: Vec<LanguageResult> = results.into_iter().map(|(_, result)| result).collect();

        let total_billed_chars = results.iter().map(|r| r.billed_chars).sum();
        let failures = results.iter().filter(|r| !r.is_success()).count();
        if failures > 0 {
            warn!("{} of {} languages failed for {}", failures, total_languages, source_id);
        }

        Ok(ArticleTranslation {
            results,
            total_billed_chars,
        })
    }

    /// Translate the batch into one language and reassemble the document
    async fn translate_language(
        &self,
        segments: &Segments,
        batch: &Batch,
        source_id: &str,
        target: &str,
        source_lang: Option<&str>,
        options: &TranslateOptions,
    ) -> LanguageResult {
        let provider_code = to_provider_code(target);
        let dir_code = to_dir_code(&provider_code);

        if batch.is_empty() {
            warn!("Nothing to translate in {} for {}", source_id, provider_code);
            return LanguageResult::failed(dir_code, provider_code, NO_CONTENT_ERROR.to_string());
        }

        let start_time = Instant::now();
        let translated = match self.client.translate(&batch.texts, &provider_code, source_lang, options).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("Translation of {} to {} failed: {}", source_id, provider_code, e);
                return LanguageResult::failed(dir_code, provider_code, e.to_string());
            }
        };

        let billed_chars = translated.billed_chars;
        let detected = translated.detected_lang;
        let segments_out = TranslatedSegments::from_batch(segments, batch, translated.texts, self.options.slug_max_length);
        let content = reassemble(segments, &segments_out, &dir_code, source_id);

        info!(
            "Translated {} to {} in {:?} ({} chars billed)",
            source_id,
            provider_code,
            start_time.elapsed(),
            billed_chars
        );

        LanguageResult {
            language_code: dir_code,
            provider_language_code: provider_code,
            content,
            billed_chars,
            detected_source_lang: (!detected.is_empty()).then_some(detected),
            error: None,
        }
    }

    /// Estimate the character cost of translating a raw article
    pub fn estimate(&self, raw: &str, languages: usize) -> Result<Estimate, TranslationError> {
        let segments = Segments::extract(raw).ok_or(TranslationError::FrontMatter)?;
        Ok(Estimate::for_segments(&segments, languages))
    }

    /// Estimate the cost and check it against the provider quota
    pub async fn estimate_with_quota(&self, raw: &str, languages: usize) -> Result<ArticleEstimate, TranslationError> {
        let estimate = self.estimate(raw, languages)?;
        let usage = self.usage().await?;
        let quota = QuotaCheck::from_usage(&usage, estimate.total_estimate);
        if !quota.sufficient {
            warn!(
                "Estimated {} chars exceed the remaining quota of {}",
                estimate.total_estimate,
                quota.remaining
            );
        }
        Ok(ArticleEstimate { estimate, quota })
    }

    /// Current provider character usage
    pub async fn usage(&self) -> Result<Usage, TranslationError> {
        Ok(self.client.usage().await?)
    }
}
