/*!
 * Article translation engine.
 *
 * Turns extracted article segments into provider batches and translated
 * articles. It is split into several submodules:
 *
 * - `batch`: Flattening segments into one provider call per language
 * - `reassembly`: Mapping provider output back onto article fields
 * - `estimate`: Character cost estimation and quota checks
 * - `core`: The service fanning an article out to its target languages
 */

// Re-export main types for easier usage
pub use self::batch::{Batch, BatchIndex};
pub use self::core::{
    ArticleEstimate, ArticleTranslation, LanguageResult, NO_CONTENT_ERROR, TranslationOptions,
    TranslationRequest, TranslationService,
};
pub use self::estimate::{DEFAULT_ESTIMATE_LANGUAGES, Estimate, QuotaCheck, count_chars};
pub use self::reassembly::{TranslatedSegments, reassemble};

// Submodules
pub mod batch;
pub mod core;
pub mod estimate;
pub mod reassembly;
