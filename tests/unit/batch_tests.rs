/*!
 * Tests for batch building and reassembly
 */

use articlator::article::{DEFAULT_SLUG_MAX_LENGTH, Segments};
use articlator::translation::{Batch, BatchIndex, TranslatedSegments, count_chars, reassemble};
use crate::common;

/// Test that the full article flattens into the expected ordered batch
#[test]
fn test_build_withFullArticle_shouldFlattenInFieldOrder() {
    let segments = Segments::extract(common::FULL_ARTICLE).unwrap();
    let batch = Batch::build(&segments);

    assert_eq!(batch.len(), 11);
    assert_eq!(batch.index.total_len(), batch.len());
    assert_eq!(BatchIndex::get(batch.index.title, &batch.texts), Some("Digital health: what changed"));
    assert_eq!(BatchIndex::slice(&batch.index.body, &batch.texts).len(), 4);
    assert_eq!(BatchIndex::slice(&batch.index.categories, &batch.texts), ["digital health", "policy"]);
    assert_eq!(BatchIndex::slice(&batch.index.image_titles, &batch.texts), ["Empty waiting room"]);
}

/// Test that building twice gives the same batch
#[test]
fn test_build_calledTwice_shouldBeDeterministic() {
    let segments = Segments::extract(common::FULL_ARTICLE).unwrap();
    assert_eq!(Batch::build(&segments).texts, Batch::build(&segments).texts);
}

/// Test that an identity translation reproduces every untouched field
#[test]
fn test_reassemble_withIdentityTranslation_shouldPreserveArticle() {
    let original = Segments::extract(common::FULL_ARTICLE).unwrap();
    let batch = Batch::build(&original);
    let translated = TranslatedSegments::from_batch(&original, &batch, batch.texts.clone(), DEFAULT_SLUG_MAX_LENGTH);
    let document = reassemble(&original, &translated, "en", "digital-health");

    let reparsed = Segments::extract(&document).unwrap();
    assert_eq!(reparsed.title, original.title);
    assert_eq!(reparsed.excerpt, original.excerpt);
    assert_eq!(reparsed.post_status, original.post_status);
    assert_eq!(reparsed.post_date, original.post_date);
    assert_eq!(reparsed.featured_image, original.featured_image);
    assert_eq!(reparsed.categories, original.categories);
    assert_eq!(reparsed.tags, original.tags);
    assert_eq!(reparsed.image_alts, original.image_alts);
    assert_eq!(reparsed.body.trim(), original.body.trim());
    assert!(document.contains("    _translation_group: digital-health\n"));
    assert!(document.contains("    _translation_lang: en\n"));
}

/// Test that translated taxonomy terms are turned back into slugs
#[test]
fn test_fromBatch_withTranslatedTaxonomy_shouldReslug() {
    let original = Segments::extract(common::FULL_ARTICLE).unwrap();
    let batch = Batch::build(&original);
    let translated: Vec<String> = batch.texts.iter().map(|text| match text.as_str() {
        "digital health" => "Digitálne zdravie".to_string(),
        "telemedicine" => "Telemedicína".to_string(),
        other => other.to_string(),
    }).collect();

    let segments = TranslatedSegments::from_batch(&original, &batch, translated, DEFAULT_SLUG_MAX_LENGTH);
    assert_eq!(segments.categories, vec!["digitalne-zdravie", "policy"]);
    assert_eq!(segments.tags, vec!["telemedicina"]);
}

/// Test that a provider returning nothing leaves the original article in place
#[test]
fn test_fromBatch_withEmptyProviderResponse_shouldKeepOriginals() {
    let original = Segments::extract(common::FULL_ARTICLE).unwrap();
    let batch = Batch::build(&original);
    let segments = TranslatedSegments::from_batch(&original, &batch, Vec::new(), DEFAULT_SLUG_MAX_LENGTH);

    assert_eq!(segments.title, original.title);
    assert_eq!(segments.categories, original.categories);
    assert_eq!(segments.body.trim(), original.body.trim());
}

/// Test that the character count covers title and raw body
#[test]
fn test_countChars_withMinimalArticle_shouldCountTitleAndBody() {
    let segments = Segments::extract(common::MINIMAL_ARTICLE).unwrap();
    assert_eq!(count_chars(&segments), "Hello".len() + "Just one paragraph.\n".len());
}
