/*!
 * Tests for segment extraction and body protection
 */

use articlator::article::{ProtectedBody, Segments, scan_images, split_paragraphs};
use crate::common;

/// Test that every field of a full article is extracted
#[test]
fn test_extract_withFullArticle_shouldReadEveryField() {
    let segments = Segments::extract(common::FULL_ARTICLE).unwrap();

    assert_eq!(segments.title, "Digital health: what changed");
    assert_eq!(segments.excerpt, "A short look at five years of change.");
    assert_eq!(segments.post_status, "publish");
    assert_eq!(segments.featured_image, "/img/cover.jpg");
    assert_eq!(segments.categories, vec!["digital-health", "policy"]);
    assert_eq!(segments.tags, vec!["telemedicine"]);
    assert_eq!(segments.image_alts, vec!["Waiting room"]);
    assert_eq!(segments.image_titles, vec!["Empty waiting room"]);
    assert!(!segments.is_empty());
}

/// Test that a document without a header yields nothing
#[test]
fn test_extract_withoutHeader_shouldReturnNone() {
    assert!(Segments::extract("Just a body.\n\nNo header here.").is_none());
}

/// Test that segments serialize without the raw header text
#[test]
fn test_segments_serializedToJson_shouldSkipRawHeader() {
    let segments = Segments::extract(common::MINIMAL_ARTICLE).unwrap();
    let json = serde_json::to_value(&segments).unwrap();

    assert_eq!(json["title"], "Hello");
    assert!(json.get("yaml").is_none());
}

/// Test that images without a title are still protected
#[test]
fn test_strip_withUntitledImage_shouldRecordNoTitleSlot() {
    let body = "![One](/1.png \"First\") and ![](/2.png)";
    let protected = ProtectedBody::strip(body);

    assert_eq!(protected.text, "__IMG_0__ and __IMG_1__");
    assert_eq!(protected.slots[0].alt_index, Some(0));
    assert_eq!(protected.slots[1].alt_index, None);
    assert_eq!(protected.slots[1].title_index, None);
    assert_eq!(scan_images(body).len(), 2);
}

/// Test that stripping and reinserting with no translations restores the body
#[test]
fn test_reinsert_withoutTranslations_shouldRestoreBody() {
    let segments = Segments::extract(common::FULL_ARTICLE).unwrap();
    let protected = ProtectedBody::strip(&segments.body);

    assert_eq!(protected.reinsert(&protected.text, &[], &[]), segments.body);
}

/// Test that the fenced block survives paragraph splitting as one chunk
#[test]
fn test_splitParagraphs_withFullArticle_shouldKeepCodeBlockWhole() {
    let segments = Segments::extract(common::FULL_ARTICLE).unwrap();
    let protected = ProtectedBody::strip(&segments.body);
    let chunks = split_paragraphs(&protected.text);

    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[1], "__IMG_0__");
    assert!(chunks[2].starts_with("```") && chunks[2].ends_with("```"));
    assert!(chunks[2].contains("\n\n"));
}
