/*!
 * Mock provider implementation for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::identity()` - Returns every text unchanged
 * - `MockProvider::working()` - Prefixes every text with the target language
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::failing_for(lang)` - Fails for one target language only
 * - `MockProvider::short(n)` - Returns only the first `n` texts
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use super::{TranslateOptions, TranslatedBatch, Translator, Usage};

/// A recorded translate call
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub texts: Vec<String>,
    pub target_lang: String,
    pub source_lang: Option<String>,
    pub options: TranslateOptions,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Returns the input texts unchanged
    Identity,
    /// Prefixes each text with `[<target>] `
    Working,
    /// Always fails with an error
    Failing,
    /// Fails only for the given target language
    FailingFor { target_lang: String },
    /// Returns only the first `keep` translations
    Short { keep: usize },
    /// Simulates slow response before answering like `Working`
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Custom per-text translation (optional)
    custom_response: Option<fn(&str, &str) -> String>,
    /// Usage reported by `usage()`
    usage: Usage,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
            usage: Usage { count: 0, limit: 500_000 },
        }
    }

    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn failing_for(target_lang: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingFor { target_lang: target_lang.into() })
    }

    pub fn short(keep: usize) -> Self {
        Self::new(MockBehavior::Short { keep })
    }

    /// Translate each text with `generator(text, target_lang)`
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Set the usage reported to callers
    pub fn with_usage(mut self, count: u64, limit: u64) -> Self {
        self.usage = Usage { count, limit };
        self
    }

    /// Number of translate calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every translate call made so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn render(&self, text: &str, target_lang: &str) -> String {
        if let Some(generator) = self.custom_response {
            return generator(text, target_lang);
        }
        match self.behavior {
            MockBehavior::Identity => text.to_string(),
            _ => format!("[{}] {}", target_lang, text),
        }
    }
}

#[async_trait]
impl Translator for MockProvider {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
        options: &TranslateOptions,
    ) -> Result<TranslatedBatch, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(MockRequest {
                texts: texts.to_vec(),
                target_lang: target_lang.to_string(),
                source_lang: source_lang.map(str::to_string),
                options: options.clone(),
            });
        }

        let keep = match &self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: format!("Simulated provider failure (request #{})", count + 1),
                });
            }
            MockBehavior::FailingFor { target_lang: failing } if failing == target_lang => {
                return Err(ProviderError::ApiError {
                    status_code: 503,
                    message: format!("Simulated failure for {}", target_lang),
                });
            }
            MockBehavior::Short { keep } => *keep,
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                texts.len()
            }
            _ => texts.len(),
        };

        let translated: Vec<String> = texts.iter()
            .take(keep)
            .map(|text| self.render(text, target_lang))
            .collect();
        let billed_chars = texts.iter().map(|t| t.chars().count() as u64).sum();

        Ok(TranslatedBatch {
            texts: translated,
            detected_lang: source_lang.unwrap_or("EN").to_string(),
            billed_chars,
        })
    }

    async fn usage(&self) -> Result<Usage, ProviderError> {
        if self.behavior == MockBehavior::Failing {
            return Err(ProviderError::ConnectionError("Simulated usage failure".to_string()));
        }
        Ok(self.usage)
    }
}
