/*!
 * Integration tests for application lifecycle
 */

use std::fs;
use anyhow::Result;
use tokio_test::{assert_err, assert_ok};
use articlator::app_controller::Controller;
use articlator::article::Segments;
use articlator::providers::mock::MockProvider;
use crate::common;

/// Test that a controller cannot be built without an API key
#[test]
fn test_controller_withoutApiKey_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path(), &["sk"]);
    config.translation.provider.api_key.clear();

    // the environment may provide a key, only check when it does not
    if config.translation.get_api_key().is_empty() {
        assert_err!(Controller::with_config(config));
    }
    Ok(())
}

/// Test that a configured key builds a DeepL-backed controller
#[test]
fn test_controller_withApiKey_shouldInitialize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = assert_ok!(Controller::with_config(common::test_config(temp_dir.path(), &["sk", "cs"])));

    let request = controller.translation_request();
    assert_eq!(request.target_languages, vec!["sk", "cs"]);
    Ok(())
}

/// Test translating one article end to end on disk
#[tokio::test]
async fn test_run_withFullArticle_shouldWriteTranslations() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "digital-health", common::FULL_ARTICLE)?;

    let controller = common::mock_controller(temp_dir.path(), &["sk", "en-gb"], MockProvider::working());
    let report = controller.run("digital-health", false).await?;

    assert_eq!(report.written.len(), 2);
    assert!(!report.has_failures());

    let slovak = fs::read_to_string(temp_dir.path().join("sk").join("digital-health.md"))?;
    let segments = Segments::extract(&slovak).unwrap();
    assert_eq!(segments.title, "[SK] Digital health: what changed");
    assert!(slovak.contains("_translation_group: digital-health"));

    // EN-GB lands in the shared English directory
    assert!(temp_dir.path().join("en").join("digital-health.md").exists());
    Ok(())
}

/// Test that force overwrite replaces existing translations
#[tokio::test]
async fn test_run_withForceOverwrite_shouldReplaceExisting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "hello", common::MINIMAL_ARTICLE)?;
    fs::create_dir(temp_dir.path().join("cs"))?;
    fs::write(temp_dir.path().join("cs").join("hello.md"), "stale")?;

    let controller = common::mock_controller(temp_dir.path(), &["cs"], MockProvider::working());

    let skipped = controller.run("hello", false).await?;
    assert_eq!(skipped.skipped.len(), 1);

    let forced = controller.run("hello", true).await?;
    assert_eq!(forced.written.len(), 1);
    let content = fs::read_to_string(temp_dir.path().join("cs").join("hello.md"))?;
    assert!(content.contains("title: [CS] Hello"));
    Ok(())
}

/// Test that a failing language is reported but the others are saved
#[tokio::test]
async fn test_run_withOneFailingLanguage_shouldSaveTheRest() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "hello", common::MINIMAL_ARTICLE)?;

    let controller = common::mock_controller(temp_dir.path(), &["sk", "de"], MockProvider::failing_for("DE"));
    let report = controller.run("hello", false).await?;

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "de");
    assert!(!temp_dir.path().join("de").join("hello.md").exists());
    Ok(())
}

/// Test folder mode across several articles with one already translated
#[tokio::test]
async fn test_runFolder_shouldProcessEveryArticle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "first", common::MINIMAL_ARTICLE)?;
    common::create_test_article(temp_dir.path(), "second", common::FULL_ARTICLE)?;
    common::create_test_article(temp_dir.path(), "third", common::MINIMAL_ARTICLE)?;
    fs::create_dir(temp_dir.path().join("sk"))?;
    fs::write(temp_dir.path().join("sk").join("third.md"), "done")?;

    let provider = MockProvider::working();
    let controller = common::mock_controller(temp_dir.path(), &["sk"], provider.clone());
    let summary = controller.run_folder(false).await?;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(provider.request_count(), 2);
    assert!(summary.billed_chars > 0);
    Ok(())
}

/// Test that folder mode fails on a missing blog directory
#[tokio::test]
async fn test_runFolder_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::mock_controller(&temp_dir.path().join("nope"), &["sk"], MockProvider::working());
    assert_err!(controller.run_folder(false).await);
    Ok(())
}

/// Test the estimate and usage commands against the mock provider
#[tokio::test]
async fn test_estimateAndUsage_shouldReportQuota() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "hello", common::MINIMAL_ARTICLE)?;

    let controller = common::mock_controller(temp_dir.path(), &["sk"], MockProvider::working().with_usage(1_000, 10_000));

    let estimate = controller.estimate("hello", 2).await?;
    assert_eq!(estimate.estimate.total_estimate, estimate.estimate.chars_per_language * 2);
    assert_eq!(estimate.quota.remaining, 9_000);
    assert_eq!(estimate.quota.percent, 10.0);

    let usage = controller.usage().await?;
    assert_eq!(usage.count, 1_000);
    Ok(())
}

/// Test that estimating a headerless article fails and writes nothing
#[tokio::test]
async fn test_estimate_withoutHeader_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "plain", "No header.\n\nJust text.")?;

    let controller = common::mock_controller(temp_dir.path(), &["sk"], MockProvider::working());
    let error = assert_err!(controller.estimate("plain", 2).await);
    assert!(format!("{:#}", error).contains("Failed to parse article front matter"));
    assert!(!temp_dir.path().join("sk").exists());
    Ok(())
}

/// Test that status reflects translations written by a run
#[tokio::test]
async fn test_status_afterRun_shouldListWrittenTranslations() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_article(temp_dir.path(), "digital-health", common::FULL_ARTICLE)?;

    let controller = common::mock_controller(temp_dir.path(), &["sk"], MockProvider::working());
    let before = controller.status("digital-health")?;
    assert!(before.translations.iter().all(|t| !t.exists));
    assert!(before.chars_estimate > 0);

    controller.run("digital-health", false).await?;

    let after = controller.status("digital-health")?;
    let existing: Vec<_> = after.translations.iter()
        .filter(|t| t.exists)
        .map(|t| t.language_code.as_str())
        .collect();
    assert_eq!(existing, vec!["sk"]);
    Ok(())
}
