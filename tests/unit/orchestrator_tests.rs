/*!
 * Tests for the fan-out translation orchestrator
 */

use std::sync::Arc;
use std::time::Duration;

use locsync::errors::{FailureKind, LocalizationError, ProviderError, ValidationError};
use locsync::localization::{AssetFields, Field, LocalizationSet, seed};
use locsync::providers::mock::MockTranslator;
use locsync::translation::{
    FanOutOrchestrator, NotificationLevel, TranslationOptions, TranslationOutcome,
    TranslationService,
};

use crate::common::{code, component_set, init_logging, mock_orchestrator, registry};

#[tokio::test]
async fn test_translate_withThreeTargetsOneFailing_shouldReportTwoSuccesses() {
    init_logging();
    let mock = MockTranslator::working().fail_for(
        "fr",
        ProviderError::ConnectionError("connection reset".to_string()),
    );
    let mut set = component_set(&["en", "de", "fr", "es"]);
    set.set_field(&code("en"), Field::Title, "Welcome").unwrap();

    let outcome = mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Title])
        .await
        .unwrap();

    assert_eq!(outcome.successes, 2);
    assert!(!outcome.is_failure());
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].language, code("fr"));
    assert_eq!(outcome.failures[0].field, Field::Title);
    assert_eq!(outcome.failures[0].reason.kind, FailureKind::Transport);
    assert_eq!(set.field(&code("de"), Field::Title), Some("[de] Welcome"));
    assert_eq!(set.field(&code("es"), Field::Title), Some("[es] Welcome"));
    assert_eq!(set.field(&code("fr"), Field::Title), Some(""));
}

#[tokio::test]
async fn test_translate_withEmptySource_shouldFailFastWithZeroCalls() {
    let mock = MockTranslator::working();
    let mut set = component_set(&["en", "de"]);
    let before = set.clone();

    let result = mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Title, Field::Description])
        .await;

    assert!(matches!(
        result,
        Err(LocalizationError::Validation(ValidationError::NothingToTranslate(_)))
    ));
    assert_eq!(mock.call_count(), 0);
    assert_eq!(set, before);
}

#[tokio::test]
async fn test_translate_withMissingSourceRecord_shouldFailFast() {
    let mock = MockTranslator::working();
    let mut set = component_set(&["en", "de"]);

    let result = mock_orchestrator(&mock)
        .translate(&mut set, &code("tr"), &[Field::Title])
        .await;

    assert!(matches!(
        result,
        Err(LocalizationError::Validation(ValidationError::MissingSourceRecord(_)))
    ));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_translate_withUnsupportedField_shouldFailFast() {
    let mock = MockTranslator::working();
    let mut set: LocalizationSet<AssetFields> = seed(&registry(&["en", "de"]));
    set.set_field(&code("en"), Field::Title, "Logo").unwrap();

    let result = mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Title, Field::Excerpt])
        .await;

    assert!(matches!(
        result,
        Err(LocalizationError::Validation(ValidationError::UnsupportedField(Field::Excerpt)))
    ));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_translate_shouldRouteMarkupFieldsThroughPlaceholders() {
    let mock = MockTranslator::working();
    let mut set = component_set(&["en", "de"]);
    set.set_field(&code("en"), Field::Title, "Hi").unwrap();
    set.set_field(&code("en"), Field::Description, "<p>Body</p>").unwrap();

    mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Title, Field::Description])
        .await
        .unwrap();

    let texts: Vec<String> = mock.calls().into_iter().map(|c| c.text).collect();
    assert!(texts.contains(&"Hi".to_string()));
    assert!(texts.contains(&"__TAG_0__Body__TAG_1__".to_string()));
    assert_eq!(set.field(&code("de"), Field::Description), Some("[de] <p>Body</p>"));
}

#[tokio::test]
async fn test_translate_withEveryTargetFailing_shouldBeFailure() {
    let mock = MockTranslator::failing();
    let mut set = component_set(&["en", "de", "fr"]);
    set.set_field(&code("en"), Field::Excerpt, "Short").unwrap();

    let outcome = mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Excerpt])
        .await
        .unwrap();

    assert!(outcome.is_failure());
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome.failures.iter().all(|f| f.reason.kind == FailureKind::RemoteTransient));

    let notifications = outcome.notifications();
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications.len(), 3);
    assert!(notifications[1].message.contains("try again later"));
}

#[tokio::test]
async fn test_translate_withSingleLanguage_shouldSucceedWithNothingToDo() {
    let mock = MockTranslator::working();
    let mut set = component_set(&["en"]);
    set.set_field(&code("en"), Field::Title, "Only").unwrap();

    let outcome = mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Title])
        .await
        .unwrap();

    assert_eq!(outcome.successes, 0);
    assert!(outcome.failures.is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_execute_withSlowTarget_shouldTimeOutOnlyThatTask() {
    let mock = MockTranslator::working().delay_for("de", Duration::from_secs(10));
    let options = TranslationOptions {
        task_timeout: Duration::from_secs(5),
        ..TranslationOptions::default()
    };
    let orchestrator =
        FanOutOrchestrator::new(TranslationService::new(Arc::new(mock.clone()), options));

    let mut set = component_set(&["en", "de", "fr"]);
    set.set_field(&code("en"), Field::Title, "Hi").unwrap();
    let tasks = orchestrator.plan(&set, &code("en"), &[Field::Title]).unwrap();
    let batch = orchestrator.execute(tasks).await;

    assert_eq!(batch.len(), 2);
    let de = &batch.results()[0];
    let fr = &batch.results()[1];
    assert_eq!(de.task.target_language, code("de"));
    assert!(matches!(
        &de.outcome,
        TranslationOutcome::Failed { reason } if reason.kind == FailureKind::Timeout
    ));
    assert_eq!(fr.task.target_language, code("fr"));
    assert_eq!(fr.outcome, TranslationOutcome::Translated("[fr] Hi".to_string()));
}

#[tokio::test]
async fn test_translate_withSameTaggedTextInTitleAndDescription_shouldKeepMarkupCheck() {
    let mock = MockTranslator::working().respond_with("de", "Hallo");
    let mut set = component_set(&["en", "de"]);
    set.set_field(&code("en"), Field::Title, "<b>Hi</b>").unwrap();
    set.set_field(&code("en"), Field::Description, "<b>Hi</b>").unwrap();

    let outcome = mock_orchestrator(&mock)
        .translate(&mut set, &code("en"), &[Field::Title, Field::Description])
        .await
        .unwrap();

    assert_eq!(outcome.successes, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].field, Field::Description);
    assert_eq!(outcome.failures[0].reason.kind, FailureKind::MarkupCorrupted);
    assert_eq!(set.field(&code("de"), Field::Title), Some("Hallo"));
    assert_eq!(set.field(&code("de"), Field::Description), Some(""));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_execute_withConcurrencyOfOne_shouldStillFinishAllTasks() {
    let mock = MockTranslator::working();
    let options = TranslationOptions {
        max_concurrent_requests: 1,
        ..TranslationOptions::default()
    };
    let orchestrator =
        FanOutOrchestrator::new(TranslationService::new(Arc::new(mock.clone()), options));

    let mut set = component_set(&["en", "de", "fr", "it"]);
    set.set_field(&code("en"), Field::Title, "Hi").unwrap();
    set.set_field(&code("en"), Field::Excerpt, "Short").unwrap();

    let outcome = orchestrator
        .translate(&mut set, &code("en"), &[Field::Title, Field::Excerpt])
        .await
        .unwrap();

    assert_eq!(outcome.successes, 3);
    assert_eq!(mock.call_count(), 6);
}
