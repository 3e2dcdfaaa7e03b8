/*!
 * Character cost estimation for quota pre-checks.
 */

use serde::Serialize;

use crate::article::{Segments, humanize_slug};
use crate::providers::Usage;

/// Languages assumed when an estimate is requested without targets
pub const DEFAULT_ESTIMATE_LANGUAGES: usize = 2;

/// Count the characters that would be sent for one target language
pub fn count_chars(segments: &Segments) -> usize {
    let char_len = |s: &str| s.chars().count();

    let mut total = char_len(&segments.title) + char_len(&segments.excerpt) + char_len(&segments.body);
    total += segments.categories.iter()
        .chain(segments.tags.iter())
        .map(|term| char_len(&humanize_slug(term)))
        .sum::<usize>();
    total += segments.image_alts.iter().map(|alt| char_len(alt)).sum::<usize>();
    total += segments.image_titles.iter().map(|title| char_len(title)).sum::<usize>();
    total
}

/// Projected character cost of translating an article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub chars_per_language: usize,
    pub languages: usize,
    pub total_estimate: usize,
}

impl Estimate {
    /// Estimate for `languages` targets; zero falls back to the default count
    pub fn new(chars_per_language: usize, languages: usize) -> Self {
        let languages = if languages == 0 { DEFAULT_ESTIMATE_LANGUAGES } else { languages };
        Self {
            chars_per_language,
            languages,
            total_estimate: chars_per_language * languages,
        }
    }

    pub fn for_segments(segments: &Segments, languages: usize) -> Self {
        Self::new(count_chars(segments), languages)
    }
}

/// Whether the remaining provider quota covers an estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaCheck {
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
    pub sufficient: bool,
    /// Share of the quota already used, one decimal place
    pub percent: f64,
}

impl QuotaCheck {
    pub fn from_usage(usage: &Usage, total_estimate: usize) -> Self {
        let remaining = usage.limit.saturating_sub(usage.count);
        Self {
            used: usage.count,
            limit: usage.limit,
            remaining,
            sufficient: remaining >= total_estimate as u64,
            percent: usage.percent(),
        }
    }
}
