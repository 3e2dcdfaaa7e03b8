/*!
 * # Articlator - front-matter aware translation of markdown articles
 *
 * A Rust library for machine translation of blog articles written as
 * markdown with a front matter header.
 *
 * ## Features
 *
 * - Extract every translatable string of an article: title, excerpt,
 *   body paragraphs, taxonomy terms and image alt texts and titles
 * - Protect image references and fenced code blocks during translation
 * - Translate one article into many languages with a single provider call
 *   per language, failures isolated per language
 * - Regenerate taxonomy slugs from translated terms
 * - Estimate character cost and check it against the provider quota
 * - Report which translations of an article already exist
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `article`: Front matter codec, segment extraction and body handling
 * - `translation`: Batch building, reassembly, estimation and the
 *   translation service
 * - `providers`: Translation provider clients:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::mock`: In-memory provider for tests
 * - `file_utils`: Blog directory layout and file system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Provider and directory language codes
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod article;
pub mod file_utils;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use article::Segments;
pub use translation::{ArticleTranslation, LanguageResult, TranslationRequest, TranslationService};
pub use language_utils::{get_language_name, to_dir_code, to_provider_code};
pub use errors::{AppError, ProviderError, TranslationError};
