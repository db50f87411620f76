/*!
 * Editing session lifecycle tests
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use locsync::errors::{FailureKind, LocalizationError, ValidationError};
use locsync::localization::{ComponentFields, EntityKind, Field, StaticRegistry};
use locsync::providers::mock::MockTranslator;
use locsync::session::EditingSession;

use crate::common::{code, component_set, mock_orchestrator, registry};

#[tokio::test]
async fn test_edit_withNewRegistryLanguage_shouldAppendEmptyRecord() {
    let mut set = component_set(&["tr", "en"]);
    set.set_field(&code("tr"), Field::Title, "Merhaba").unwrap();

    let session = EditingSession::edit(EntityKind::Component, set, registry(&["tr", "en", "de"]));

    assert_eq!(session.set().languages(), vec![code("tr"), code("en"), code("de")]);
    assert_eq!(session.set().field(&code("tr"), Field::Title), Some("Merhaba"));
}

#[test]
fn test_refreshFrom_shouldReconcileAgainstFreshSnapshot() {
    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["en"]));
    let source = StaticRegistry::new(registry(&["en", "fr"]));

    let report = tokio_test::block_on(async { session.refresh_from(&source).await }).unwrap();

    assert_eq!(report.appended, vec![code("fr")]);
    assert_eq!(session.registry().len(), 2);
}

#[tokio::test]
async fn test_translate_afterLanguageSwitch_shouldUseNewSource() {
    let mock = MockTranslator::working();
    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["tr", "en", "de"]));
    session.select_language(&code("en"));
    session.set_field(Field::Excerpt, "Short").unwrap();

    let outcome = session
        .translate(&mock_orchestrator(&mock), &[Field::Excerpt])
        .await
        .unwrap();

    assert_eq!(outcome.updated_languages, vec![code("tr"), code("de")]);
    assert!(mock.calls().iter().all(|c| c.source == code("en")));
}

#[tokio::test]
async fn test_translate_withEmptyActiveRecord_shouldRejectWithoutCalls() {
    let mock = MockTranslator::working();
    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["tr", "en"]));

    let result = session.translate(&mock_orchestrator(&mock), &[Field::Title]).await;

    assert!(matches!(
        result,
        Err(LocalizationError::Validation(ValidationError::NothingToTranslate(_)))
    ));
    assert_eq!(mock.call_count(), 0);
    assert!(!session.is_translating());
}

#[tokio::test]
async fn test_close_duringTranslation_shouldResolveTasksAsCancelled() {
    let mock = MockTranslator::working().with_delay(Duration::from_secs(30));
    let orchestrator = mock_orchestrator(&mock);
    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["tr", "en", "de"]));
    session.set_field(Field::Title, "Merhaba").unwrap();

    let token = session.cancellation_token();
    let busy = session.translating_flag();
    let observed_busy = Arc::new(AtomicBool::new(false));
    let observed = observed_busy.clone();
    let closer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        observed.store(busy.load(Ordering::SeqCst), Ordering::SeqCst);
        token.cancel();
    });

    let outcome = session.translate(&orchestrator, &[Field::Title]).await.unwrap();
    closer.await.unwrap();

    assert!(observed_busy.load(Ordering::SeqCst));
    assert!(!session.is_translating());
    assert!(session.is_closed());
    assert_eq!(outcome.successes, 0);
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome
        .failures
        .iter()
        .all(|f| f.reason.kind == FailureKind::Cancelled));
    assert_eq!(session.set().field(&code("en"), Field::Title), Some(""));
}
