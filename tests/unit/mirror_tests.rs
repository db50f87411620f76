/*!
 * Tests for edit mirroring across languages
 */

use locsync::errors::ValidationError;
use locsync::localization::{
    ComponentFields, EntityKind, Field, LocalizationSet, MirrorPolicy, TeamMemberFields,
    mirror_field, seed,
};
use locsync::session::EditingSession;

use crate::common::{code, registry};

#[test]
fn test_mirrorField_teamMemberTitle_shouldReachEveryLanguage() {
    let mut set: LocalizationSet<TeamMemberFields> = seed(&registry(&["tr", "en", "de"]));

    let written = mirror_field(&mut set, &code("tr"), Field::Title, "Merhaba").unwrap();

    assert_eq!(written, 2);
    assert_eq!(set.field(&code("tr"), Field::Title), Some("Merhaba"));
    assert_eq!(set.field(&code("en"), Field::Title), Some("Merhaba"));
    assert_eq!(set.field(&code("de"), Field::Title), Some("Merhaba"));
}

#[test]
fn test_mirrorField_withUnknownActiveLanguage_shouldFail() {
    let mut set: LocalizationSet<TeamMemberFields> = seed(&registry(&["en"]));
    let result = mirror_field(&mut set, &code("fr"), Field::Title, "x");
    assert_eq!(result, Err(ValidationError::UnknownLanguage(code("fr"))));
}

#[test]
fn test_session_componentEdit_shouldNotMirror() {
    let mut session: EditingSession<ComponentFields> =
        EditingSession::create(EntityKind::Component, registry(&["tr", "en", "de"]));
    let written = session.set_field(Field::Title, "Merhaba").unwrap();

    assert_eq!(written, 0);
    let set = session.into_set();
    assert_eq!(set.field(&code("tr"), Field::Title), Some("Merhaba"));
    assert_eq!(set.field(&code("en"), Field::Title), Some(""));
}

#[test]
fn test_session_teamMemberDescription_shouldMirrorAfterLanguageSwitch() {
    let mut session: EditingSession<TeamMemberFields> =
        EditingSession::create(EntityKind::TeamMember, registry(&["tr", "en", "de"]));
    session.select_language(&code("en"));
    session.set_field(Field::Description, "<p>Engineer</p>").unwrap();

    assert_eq!(session.policy(), MirrorPolicy::Mirror);
    for language in ["tr", "en", "de"] {
        assert_eq!(
            session.set().field(&code(language), Field::Description),
            Some("<p>Engineer</p>")
        );
    }
}
