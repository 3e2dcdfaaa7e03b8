/*!
 * Provider implementations for translation services.
 *
 * This module contains the provider interface and its implementations:
 * - DeepL: DeepL API v2 client
 * - Mock: Scriptable provider used by tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Formality preference forwarded to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    #[default]
    Default,
    More,
    Less,
    PreferMore,
    PreferLess,
}

impl Formality {
    /// Value sent to the provider, `None` for the provider default
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::More => Some("more"),
            Self::Less => Some("less"),
            Self::PreferMore => Some("prefer_more"),
            Self::PreferLess => Some("prefer_less"),
        }
    }
}

impl std::str::FromStr for Formality {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "default" | "" => Ok(Self::Default),
            "more" => Ok(Self::More),
            "less" => Ok(Self::Less),
            "prefer_more" => Ok(Self::PreferMore),
            "prefer_less" => Ok(Self::PreferLess),
            _ => Err(anyhow::anyhow!("Invalid formality: {}", s)),
        }
    }
}

/// Options passed through to a translation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    pub formality: Formality,
}

/// Result of translating one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedBatch {
    /// Translated strings, in request order
    pub texts: Vec<String>,
    /// Source language reported by the provider, empty if unknown
    pub detected_lang: String,
    /// Characters the provider billed for this call
    pub billed_chars: u64,
}

/// Character usage of the provider account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub count: u64,
    pub limit: u64,
}

impl Usage {
    /// Used share of the quota in percent, rounded to one decimal
    pub fn percent(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        ((self.count as f64 / self.limit as f64) * 1000.0).round() / 10.0
    }
}

/// Common trait for all translation providers
///
/// A provider translates an ordered list of strings in one call and must
/// return the translations in the same order.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `texts` into `target_lang`
    ///
    /// # Arguments
    /// * `texts` - Strings to translate, in batch order
    /// * `target_lang` - Provider language code (e.g. `EN-US`, `SK`)
    /// * `source_lang` - Provider source code, `None` to let the provider detect it
    /// * `options` - Pass-through options such as formality
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
        options: &TranslateOptions,
    ) -> Result<TranslatedBatch, ProviderError>;

    /// Fetch the account's character usage
    async fn usage(&self) -> Result<Usage, ProviderError>;
}

pub mod deepl;
pub mod mock;
