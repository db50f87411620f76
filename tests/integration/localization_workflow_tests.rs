/*!
 * End-to-end localization workflow: create, edit, translate, save.
 */

use locsync::errors::{FailureKind, ProviderError};
use locsync::localization::{ComponentFields, EntityKind, Field, LocalizedEntity};
use locsync::providers::mock::MockTranslator;
use locsync::session::EditingSession;

use crate::common::{code, init_logging, mock_orchestrator, registry};

#[tokio::test]
async fn test_workflow_turkishSourceWithFailingEnglish_shouldKeepEnglishUnchanged() {
    init_logging();

    // Registry [TR, EN, DE] seeds three empty records, TR first
    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["tr", "en", "de"]));
    assert_eq!(session.set().languages(), vec![code("tr"), code("en"), code("de")]);
    assert!(session.set().iter().all(|r| r.is_blank()));
    assert_eq!(session.active_language(), Some(&code("tr")));

    session.set_field(Field::Title, "Merhaba").unwrap();
    let english_before = session.set().field(&code("en"), Field::Title).map(str::to_string);

    let mock = MockTranslator::working()
        .fail_for(
            "en",
            ProviderError::ApiError {
                status_code: 500,
                message: "Internal Server Error".to_string(),
            },
        )
        .respond_with("de", "Hello");
    let orchestrator = mock_orchestrator(&mock);

    let outcome = session.translate(&orchestrator, &[Field::Title]).await.unwrap();

    assert_eq!(session.set().field(&code("de"), Field::Title), Some("Hello"));
    assert_eq!(
        session.set().field(&code("en"), Field::Title).map(str::to_string),
        english_before
    );
    assert_eq!(outcome.successes, 1);
    assert_eq!(outcome.updated_languages, vec![code("de")]);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].language, code("en"));
    assert_eq!(outcome.failures[0].field, Field::Title);
    assert_eq!(outcome.failures[0].reason.kind, FailureKind::RemoteTransient);
    assert!(!session.is_translating());

    // The set goes out as the entity payload
    let entity = LocalizedEntity::Component(session.into_set());
    let json = serde_json::to_value(&entity).unwrap();
    assert_eq!(json["kind"], "component");
    assert_eq!(json["localizations"][2]["language"], "de");
    assert_eq!(json["localizations"][2]["title"], "Hello");
}

#[tokio::test]
async fn test_workflow_rerunAfterPartialFailure_shouldOnlyCallFailedSlotsRemotely() {
    let flaky = MockTranslator::working().fail_for(
        "en",
        ProviderError::ConnectionError("offline".to_string()),
    );
    let orchestrator = mock_orchestrator(&flaky);

    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["tr", "en", "de"]));
    session.set_field(Field::Title, "Merhaba").unwrap();

    let first = session.translate(&orchestrator, &[Field::Title]).await.unwrap();
    assert_eq!(first.failures.len(), 1);
    let calls_after_first = flaky.call_count();

    // Same source text again: DE is answered from the cache, EN is retried
    let second = session.translate(&orchestrator, &[Field::Title]).await.unwrap();
    assert_eq!(second.failures.len(), 1);
    assert_eq!(flaky.call_count(), calls_after_first + 1);
    assert_eq!(
        orchestrator.service().cache.stats().0,
        1,
        "the German translation should come from the cache"
    );
}

#[test]
fn test_entityPayload_roundTrip_shouldPreserveOrderAndKind() {
    let json = r#"{
        "kind": "team_member",
        "localizations": [
            { "language": "de", "title": "Anna", "description": "<p>Leitung</p>" },
            { "language": "en", "title": "Anna" }
        ]
    }"#;

    let entity: LocalizedEntity = serde_json::from_str(json).unwrap();

    assert_eq!(entity.kind(), EntityKind::TeamMember);
    assert_eq!(entity.languages(), vec![code("de"), code("en")]);
    match &entity {
        LocalizedEntity::TeamMember(set) => {
            assert_eq!(set.field(&code("en"), Field::Description), Some(""));
        }
        other => panic!("unexpected kind {:?}", other.kind()),
    }
}
