/*!
 * Integration tests for the full article translation pipeline.
 *
 * Runs complete articles through the translation service with the mock
 * provider and checks the reassembled documents.
 */

use std::sync::Arc;
use articlator::article::Segments;
use articlator::errors::TranslationError;
use articlator::providers::mock::{MockBehavior, MockProvider};
use articlator::translation::{
    NO_CONTENT_ERROR, TranslationOptions, TranslationRequest, TranslationService,
};
use crate::common;

fn service(provider: MockProvider) -> TranslationService {
    common::init_test_logging();
    TranslationService::new(Arc::new(provider), TranslationOptions::default())
}

fn request(targets: &[&str]) -> TranslationRequest {
    TranslationRequest {
        target_languages: targets.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

/// Uppercases everything except placeholder tokens, like a well-behaved provider
fn shout(text: &str, _target: &str) -> String {
    if text.starts_with("__IMG_") {
        text.to_string()
    } else {
        text.to_uppercase()
    }
}

/// Test a full article translated into two languages
#[tokio::test]
async fn test_translateArticle_withFullArticle_shouldProduceCompleteDocuments() {
    let svc = service(MockProvider::working().with_custom_response(shout));
    let result = svc.translate_article(common::FULL_ARTICLE, "digital-health", &request(&["sk", "cs"])).await.unwrap();

    assert_eq!(result.results.len(), 2);
    for language in &result.results {
        assert!(language.is_success());

        let translated = Segments::extract(&language.content).unwrap();
        assert_eq!(translated.title, "DIGITAL HEALTH: WHAT CHANGED");
        assert_eq!(translated.categories, vec!["digital-health", "policy"]);
        assert_eq!(translated.post_date, "2024-03-01 10:00:00");
        assert_eq!(translated.featured_image, "/img/cover.jpg");
        assert!(translated.body.contains("![WAITING ROOM](/img/room.jpg \"EMPTY WAITING ROOM\")"));
        assert!(translated.body.contains("LET VISITS = 42;\n\nPRINTLN!"));
        assert!(language.content.contains(&format!("_translation_lang: {}", language.language_code)));
    }
}

/// Test that a provider answering only part of the batch still yields a document
#[tokio::test]
async fn test_translateArticle_withShortProviderResponse_shouldFallBackToSource() {
    let svc = service(MockProvider::short(1));
    let result = svc.translate_article(common::FULL_ARTICLE, "digital-health", &request(&["de"])).await.unwrap();

    let language = &result.results[0];
    assert!(language.is_success());

    let translated = Segments::extract(&language.content).unwrap();
    assert_eq!(translated.title, "[DE] Digital health: what changed");
    assert_eq!(translated.excerpt, "A short look at five years of change.");
    assert_eq!(translated.tags, vec!["telemedicine"]);
    assert!(translated.body.contains("![Waiting room](/img/room.jpg \"Empty waiting room\")"));
}

/// Test that a failing provider marks every language without aborting the call
#[tokio::test]
async fn test_translateArticle_withFailingProvider_shouldReturnErrorsPerLanguage() {
    let svc = service(MockProvider::failing());
    let result = svc.translate_article(common::FULL_ARTICLE, "digital-health", &request(&["sk", "en", "cs"])).await.unwrap();

    assert_eq!(result.results.len(), 3);
    assert!(result.results.iter().all(|r| r.error.is_some() && r.content.is_empty()));
    assert_eq!(result.total_billed_chars, 0);
}

/// Test that slow languages do not reorder results
#[tokio::test]
async fn test_translateArticle_withSlowProvider_shouldKeepRequestOrder() {
    let provider = MockProvider::new(MockBehavior::Slow { delay_ms: 20 });
    let svc = TranslationService::new(Arc::new(provider.clone()), TranslationOptions {
        max_concurrent_requests: 3,
        ..Default::default()
    });
    let result = svc.translate_article(common::MINIMAL_ARTICLE, "hello", &request(&["hu", "pl", "fr", "es"])).await.unwrap();

    let codes: Vec<_> = result.results.iter().map(|r| r.language_code.as_str()).collect();
    assert_eq!(codes, vec!["hu", "pl", "fr", "es"]);
    assert_eq!(provider.request_count(), 4);
}

/// Test that an article without a header produces no output at all
#[tokio::test]
async fn test_translateArticle_withoutHeader_shouldFailWithoutCallingProvider() {
    let provider = MockProvider::working();
    let svc = service(provider.clone());
    let result = svc.translate_article("No header.\n\nJust text.", "x", &request(&["sk"])).await;

    assert!(matches!(result, Err(TranslationError::FrontMatter)));
    assert_eq!(provider.request_count(), 0);
}

/// Test that estimating an article without a header fails before any quota lookup
#[tokio::test]
async fn test_estimate_withoutHeader_shouldFailWithFrontMatterError() {
    let provider = MockProvider::working();
    let svc = service(provider.clone());
    let raw = "No header.\n\nJust text.";

    assert!(matches!(svc.estimate(raw, 2), Err(TranslationError::FrontMatter)));

    let result = svc.estimate_with_quota(raw, 2).await;
    assert!(matches!(result, Err(TranslationError::FrontMatter)));
    assert_eq!(provider.request_count(), 0);
}

/// Test that an article with nothing to translate reports a soft error
#[tokio::test]
async fn test_translateArticle_withNothingToTranslate_shouldReportNoContent() {
    let svc = service(MockProvider::working());
    let result = svc.translate_article("---\npost_status: draft\n---\n\n", "blank", &request(&["sk", "cs"])).await.unwrap();

    for language in &result.results {
        assert_eq!(language.error.as_deref(), Some(NO_CONTENT_ERROR));
        assert_eq!(language.billed_chars, 0);
    }
}

/// Test that the estimate assumes two languages when none are given
#[tokio::test]
async fn test_estimate_withoutLanguages_shouldAssumeTwo() {
    let svc = service(MockProvider::working());
    let estimate = svc.estimate(common::MINIMAL_ARTICLE, 0).unwrap();

    assert_eq!(estimate.languages, 2);
    assert_eq!(estimate.total_estimate, estimate.chars_per_language * 2);
}

/// Test that a failing usage call fails the quota estimate
#[tokio::test]
async fn test_estimateWithQuota_withFailingProvider_shouldFail() {
    let svc = service(MockProvider::failing());
    let result = svc.estimate_with_quota(common::MINIMAL_ARTICLE, 1).await;
    assert!(matches!(result, Err(TranslationError::Provider(_))));
}
