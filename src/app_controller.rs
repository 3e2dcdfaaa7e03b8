use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::article::Segments;
use crate::file_utils::{FileManager, SaveOutcome};
use crate::language_utils::{
    ALL_TARGET_LANGUAGES, default_targets, get_language_name, to_dir_code, to_provider_code,
};
use crate::providers::{Translator, Usage};
use crate::translation::{
    ArticleEstimate, TranslationOptions, TranslationRequest, TranslationService, count_chars,
};

/// Source language assumed when none is configured
const DEFAULT_SOURCE_LANGUAGE: &str = "EN";

// @module: Application controller for article translation

/// What happened to one article
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleReport {
    pub slug: String,
    /// Translations written to disk
    pub written: Vec<PathBuf>,
    /// Translations left alone because they already existed
    pub skipped: Vec<PathBuf>,
    /// Languages that failed, with the reason
    pub failed: Vec<(String, String)>,
    pub billed_chars: u64,
}

impl ArticleReport {
    fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Totals for a folder run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub billed_chars: u64,
}

/// Whether one language's translation of an article exists on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationState {
    /// Directory code (`en`, `sk`)
    pub language_code: String,
    pub language_name: String,
    pub exists: bool,
    /// RFC 3339 modification time of the translation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// Translation status of one source article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleStatus {
    pub slug: String,
    /// Provider code of the source language
    pub source_lang: String,
    /// Directory codes translated to when no targets are given
    pub default_targets: Vec<String>,
    pub translations: Vec<TranslationState>,
    /// Characters one language would cost, 0 when the header is missing
    pub chars_estimate: usize,
}

/// Main application controller for article translation
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation service shared by every article
    service: TranslationService,
}

impl Controller {
    // @method: Create a controller backed by the configured provider
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::from_config(&config.translation)
            .context("Failed to create translation service")?;
        Ok(Self { config, service })
    }

    // @method: Create a controller around an existing provider client
    pub fn with_client(config: Config, client: Arc<dyn Translator>) -> Self {
        let options = TranslationOptions {
            max_concurrent_requests: config.translation.optimal_concurrent_requests(),
            slug_max_length: config.translation.slug_max_length,
        };
        let service = TranslationService::new(client, options);
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn blog_dir(&self) -> &Path {
        Path::new(&self.config.blog_dir)
    }

    /// Translation request built from configuration
    pub fn translation_request(&self) -> TranslationRequest {
        TranslationRequest {
            target_languages: self.config.target_languages.clone(),
            source_language: self.config.source_language.clone(),
            formality: self.config.formality,
        }
    }

    /// Translate one article into every configured language and save the results
    pub async fn run(&self, slug: &str, force_overwrite: bool) -> Result<ArticleReport> {
        let start_time = Instant::now();
        let mut report = ArticleReport::new(slug);

        let raw = FileManager::read_article(self.blog_dir(), slug)?;

        // Languages whose translation already exists are not sent to the provider
        let mut request = self.translation_request();
        request.target_languages.retain(|target| {
            let dir_code = to_dir_code(&to_provider_code(target));
            let path = FileManager::translation_output_path(self.blog_dir(), &dir_code, slug);
            if FileManager::file_exists(&path) && !force_overwrite {
                warn!("Skipping {}, translation already exists (use -f to force overwrite)", path.display());
                report.skipped.push(path);
                false
            } else {
                true
            }
        });

        if request.target_languages.is_empty() {
            return Ok(report);
        }

        let translation = self.service.translate_article(&raw, slug, &request).await
            .with_context(|| format!("Failed to translate article: {}", slug))?;

        for result in translation.results {
            if let Some(reason) = result.error {
                report.failed.push((result.language_code, reason));
                continue;
            }

            match FileManager::save_translation(self.blog_dir(), &result.language_code, slug, &result.content, force_overwrite) {
                Ok(SaveOutcome::Written(path)) => report.written.push(path),
                Ok(SaveOutcome::Skipped(path)) => report.skipped.push(path),
                Err(e) => {
                    error!("Failed to save {} translation of {}: {}", result.language_code, slug, e);
                    report.failed.push((result.language_code, e.to_string()));
                }
            }
        }
        report.billed_chars = translation.total_billed_chars;

        info!(
            "Translated {} in {}: {} written, {} skipped, {} failed, {} chars billed",
            slug,
            Self::format_duration(start_time.elapsed()),
            report.written.len(),
            report.skipped.len(),
            report.failed.len(),
            report.billed_chars
        );

        Ok(report)
    }

    /// Translate every article found directly inside the blog directory.
    /// Existing translations are skipped unless `force_overwrite` is set.
    pub async fn run_folder(&self, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(self.blog_dir()) {
            return Err(anyhow!("Blog directory does not exist: {:?}", self.blog_dir()));
        }

        let slugs = FileManager::find_articles(self.blog_dir())?;
        if slugs.is_empty() {
            return Err(anyhow!("No articles found in directory: {:?}", self.blog_dir()));
        }

        let progress_bar = ProgressBar::new(slugs.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} articles ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for slug in &slugs {
            progress_bar.set_message(format!("Translating: {}", slug));

            match self.run(slug, force_overwrite).await {
                Ok(report) if report.written.is_empty() && !report.has_failures() => {
                    summary.skipped += 1;
                }
                Ok(report) => {
                    summary.billed_chars += report.billed_chars;
                    if report.has_failures() {
                        summary.errors += 1;
                    } else {
                        summary.processed += 1;
                    }
                }
                Err(e) => {
                    error!("Error processing article {}: {:#}", slug, e);
                    summary.errors += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.errors
        );

        Ok(summary)
    }

    /// Estimate the cost of translating an article and check it against the quota.
    /// A `languages` of 0 means the configured target languages.
    pub async fn estimate(&self, slug: &str, languages: usize) -> Result<ArticleEstimate> {
        let languages = if languages == 0 { self.config.target_languages.len() } else { languages };
        let raw = FileManager::read_article(self.blog_dir(), slug)?;
        let estimate = self.service.estimate_with_quota(&raw, languages).await
            .with_context(|| format!("Failed to estimate article: {}", slug))?;
        debug!("Estimate for {}: {:?}", slug, estimate);
        Ok(estimate)
    }

    /// Translation status of an article, see [`article_status`]
    pub fn status(&self, slug: &str) -> Result<ArticleStatus> {
        article_status(&self.config, slug)
    }

    /// Current provider usage
    pub async fn usage(&self) -> Result<Usage> {
        Ok(self.service.usage().await?)
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Report which translations of an article exist, the default targets for
/// its source language and the per-language character cost.
///
/// Needs no provider, so it works without an API key.
pub fn article_status(config: &Config, slug: &str) -> Result<ArticleStatus> {
    let blog_dir = Path::new(&config.blog_dir);
    let raw = FileManager::read_article(blog_dir, slug)?;
    let chars_estimate = Segments::extract(&raw).as_ref().map_or(0, count_chars);

    let source_lang = config.source_language.as_deref()
        .map(to_provider_code)
        .unwrap_or_else(|| DEFAULT_SOURCE_LANGUAGE.to_string());
    let default_targets = default_targets(&source_lang).into_iter()
        .map(to_dir_code)
        .collect();

    let mut dir_codes: Vec<String> = Vec::new();
    for code in ALL_TARGET_LANGUAGES {
        let dir_code = to_dir_code(code);
        if !dir_codes.contains(&dir_code) {
            dir_codes.push(dir_code);
        }
    }

    let translations = dir_codes.into_iter()
        .map(|language_code| {
            let path = FileManager::translation_output_path(blog_dir, &language_code, slug);
            let modified = FileManager::modified_time(&path).map(|time| time.to_rfc3339());
            let language_name = get_language_name(&language_code).unwrap_or_else(|_| language_code.clone());
            TranslationState {
                exists: FileManager::file_exists(&path),
                language_code,
                language_name,
                modified,
            }
        })
        .collect();

    debug!("Status for {}: {} chars per language", slug, chars_estimate);

    Ok(ArticleStatus {
        slug: slug.to_string(),
        source_lang,
        default_targets,
        translations,
        chars_estimate,
    })
}
