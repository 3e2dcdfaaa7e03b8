use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::article::DEFAULT_SLUG_MAX_LENGTH;
use crate::providers::Formality;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code, `None` to let the provider detect it
    #[serde(default)]
    pub source_language: Option<String>,

    /// Target language codes
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    /// Directory holding source articles; translations go to `<blog_dir>/<lang>/`
    #[serde(default = "default_blog_dir")]
    pub blog_dir: String,

    /// Formality preference passed to the provider
    #[serde(default)]
    pub formality: Formality,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL, empty selects the public endpoint for the key
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max concurrent requests (one per target language)
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Maximum length of regenerated taxonomy slugs
    #[serde(default = "default_slug_max_length")]
    pub slug_max_length: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            slug_max_length: default_slug_max_length(),
        }
    }
}

impl TranslationConfig {
    /// Concurrent requests, never less than one
    pub fn optimal_concurrent_requests(&self) -> usize {
        self.provider.concurrent_requests.max(1)
    }

    /// API key from config, falling back to the environment
    pub fn get_api_key(&self) -> String {
        if !self.provider.api_key.is_empty() {
            return self.provider.api_key.clone();
        }
        std::env::var(API_KEY_ENV).unwrap_or_default()
    }
}

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "DEEPL_API_KEY";

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_target_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_blog_dir() -> String {
    "blog".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_slug_max_length() -> usize {
    DEFAULT_SLUG_MAX_LENGTH
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(source) = &self.source_language {
            crate::language_utils::validate_language_code(source)?;
        }

        if self.target_languages.is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }
        for target in &self.target_languages {
            crate::language_utils::validate_language_code(target)?;
        }

        if self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required (set translation.provider.api_key or {})",
                API_KEY_ENV
            ));
        }

        let endpoint = &self.translation.provider.endpoint;
        if !endpoint.is_empty() {
            let url = url::Url::parse(endpoint)
                .map_err(|e| anyhow!("Invalid provider endpoint '{}': {}", endpoint, e))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(anyhow!("Provider endpoint must use http or https: {}", endpoint));
            }
        }

        if self.translation.slug_max_length == 0 {
            return Err(anyhow!("slug_max_length must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: None,
            target_languages: default_target_languages(),
            blog_dir: default_blog_dir(),
            formality: Formality::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
