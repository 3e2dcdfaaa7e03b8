/*!
 * Language utilities for provider and directory language codes.
 *
 * Three code styles are in play: short display codes typed by users
 * (`en`, `sk`), provider codes understood by DeepL (`EN-US`, `SK`) and
 * directory codes used in file paths (`en`, `sk`).
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Provider code for each supported display code
const DISPLAY_TO_PROVIDER: &[(&str, &str)] = &[
    ("en", "EN-US"),
    ("sk", "SK"),
    ("cs", "CS"),
    ("de", "DE"),
    ("fr", "FR"),
    ("es", "ES"),
    ("pl", "PL"),
    ("hu", "HU"),
];

/// Directory code for each supported provider code
const PROVIDER_TO_DIR: &[(&str, &str)] = &[
    ("SK", "sk"),
    ("CS", "cs"),
    ("EN-US", "en"),
    ("EN-GB", "en"),
    ("DE", "de"),
    ("FR", "fr"),
    ("ES", "es"),
    ("PL", "pl"),
    ("HU", "hu"),
];

/// Human-readable names for provider codes with a regional variant
const PROVIDER_NAMES: &[(&str, &str)] = &[
    ("EN-US", "English (US)"),
    ("EN-GB", "English (UK)"),
    ("PT-PT", "Portuguese (Portugal)"),
    ("PT-BR", "Portuguese (Brazil)"),
];

/// Target languages supported out of the box
pub const ALL_TARGET_LANGUAGES: &[&str] = &["SK", "CS", "EN-US", "EN-GB", "DE", "FR", "ES", "PL", "HU"];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Map a user-facing code (`en`, `sk`, `EN-GB`) to a provider code.
/// Unknown codes are passed through upper-cased.
pub fn to_provider_code(code: &str) -> String {
    let trimmed = code.trim();
    lookup(DISPLAY_TO_PROVIDER, &trimmed.to_lowercase())
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_uppercase())
}

/// Map a provider code to the directory code used in file paths.
/// Unknown codes are passed through lower-cased.
pub fn to_dir_code(provider_code: &str) -> String {
    let trimmed = provider_code.trim();
    lookup(PROVIDER_TO_DIR, &trimmed.to_uppercase())
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_lowercase())
}

/// Default target languages for a source language, as provider codes
pub fn default_targets(source_code: &str) -> Vec<&'static str> {
    let primary = primary_subtag(source_code).to_uppercase();
    match primary.as_str() {
        "SK" => vec!["EN-US", "CS"],
        "EN" => vec!["SK", "CS"],
        "CS" => vec!["SK", "EN-US"],
        _ => vec!["EN-US"],
    }
}

/// The language part of a code: `EN` for `EN-US`, `pt` for `pt_BR`
fn primary_subtag(code: &str) -> &str {
    code.trim().split(['-', '_']).next().unwrap_or_default()
}

/// Validate that a code names a real ISO 639-1 language, with or without a
/// regional suffix
pub fn validate_language_code(code: &str) -> Result<()> {
    let primary = primary_subtag(code).to_lowercase();
    if primary.len() == 2 && Language::from_639_1(&primary).is_some() {
        return Ok(());
    }
    Err(anyhow!("Invalid language code: {}", code))
}

/// Get a display name for a provider or display code
pub fn get_language_name(code: &str) -> Result<String> {
    let provider_code = to_provider_code(code);
    if let Some(name) = lookup(PROVIDER_NAMES, &provider_code) {
        return Ok(name.to_string());
    }

    let primary = primary_subtag(code).to_lowercase();
    Language::from_639_1(&primary)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
