/*!
 * Tests for the front matter codec
 */

use articlator::article::{FrontMatter, FrontMatterFields, Provenance};
use crate::common;

/// Test that a full article splits into header and body at the closing delimiter
#[test]
fn test_split_withFullArticle_shouldSeparateHeaderAndBody() {
    let doc = FrontMatter::split(common::FULL_ARTICLE).unwrap();

    assert!(doc.yaml.starts_with("title:"));
    assert!(doc.yaml.ends_with("        - telemedicine"));
    assert!(doc.body.starts_with("Five years ago"));
}

/// Test that an unclosed header is treated as malformed
#[test]
fn test_split_withUnclosedHeader_shouldReturnNone() {
    assert!(FrontMatter::split("---\ntitle: Hello\nBody without end\n").is_none());
}

/// Test that a delimiter inside the body does not end the header early
#[test]
fn test_split_withRuleInBody_shouldStopAtFirstClosingLine() {
    let doc = FrontMatter::split("---\ntitle: A\n---\nIntro\n---\nOutro\n").unwrap();
    assert_eq!(doc.yaml, "title: A");
    assert_eq!(doc.body, "Intro\n---\nOutro\n");
}

/// Test that scalars are read and unquoted
#[test]
fn test_scalar_withQuotedValue_shouldUnquote() {
    let doc = FrontMatter::split(common::FULL_ARTICLE).unwrap();

    assert_eq!(FrontMatter::scalar(&doc.yaml, "title"), "Digital health: what changed");
    assert_eq!(FrontMatter::scalar(&doc.yaml, "post_date"), "2024-03-01 10:00:00");
    assert_eq!(FrontMatter::scalar(&doc.yaml, "missing"), "");
}

/// Test that taxonomy lists keep their order
#[test]
fn test_taxonomy_withFullArticle_shouldReadBothLists() {
    let doc = FrontMatter::split(common::FULL_ARTICLE).unwrap();
    let (categories, tags) = FrontMatter::taxonomy(&doc.yaml);

    assert_eq!(categories, vec!["digital-health", "policy"]);
    assert_eq!(tags, vec!["telemedicine"]);
}

/// Test that awkward scalars survive a serialize/parse round trip
#[test]
fn test_serialize_withSpecialCharacters_shouldRoundTrip() {
    let titles = [
        "Plain title",
        "Colon: inside",
        "Hash # inside",
        "She said \"hi\"",
        "Back\\slash",
        "'leading quote",
    ];

    for title in titles {
        let header = FrontMatter::serialize(&FrontMatterFields {
            title: title.to_string(),
            post_status: "publish".to_string(),
            ..Default::default()
        });
        let doc = FrontMatter::split(&header).unwrap();
        assert_eq!(FrontMatter::scalar(&doc.yaml, "title"), title, "header was:\n{}", header);
    }
}

/// Test the exact layout of a serialized header with every block present
#[test]
fn test_serialize_withAllFields_shouldProduceExpectedLayout() {
    let header = FrontMatter::serialize(&FrontMatterFields {
        title: "Zdravie".to_string(),
        post_status: "publish".to_string(),
        post_date: "2024-03-01 10:00:00".to_string(),
        excerpt: "Krátko".to_string(),
        featured_image: "/img/cover.jpg".to_string(),
        categories: vec!["digitalne-zdravie".to_string()],
        tags: vec!["telemedicina".to_string()],
        provenance: Some(Provenance {
            translation_group: "digital-health".to_string(),
            translation_lang: "sk".to_string(),
        }),
    });

    let expected = "---\n\
title: Zdravie\n\
post_status: publish\n\
post_date: 2024-03-01 10:00:00\n\
post_excerpt: Krátko\n\
featured_image: /img/cover.jpg\n\
taxonomy:\n    category:\n        - digitalne-zdravie\n    post_tag:\n        - telemedicina\n\
custom_fields:\n    _translation_group: digital-health\n    _translation_lang: sk\n\
---\n";
    assert_eq!(header, expected);
}
