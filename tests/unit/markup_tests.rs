/*!
 * Tests for markup-preserving translation
 */

use locsync::errors::TranslationError;
use locsync::providers::mock::{MockBehavior, MockTranslator};
use locsync::translation::MarkupPreserver;

use crate::common::{code, mock_service};

#[tokio::test]
async fn test_translateMarkup_roundTrip_shouldKeepTagSequence() {
    let source = "<p>Hello <b>World</b></p>";
    let mock = MockTranslator::working();
    let result = mock_service(&mock)
        .translate_markup(source, &code("de"), &code("en"))
        .await
        .unwrap();

    assert_eq!(
        MarkupPreserver::tag_sequence(&result),
        MarkupPreserver::tag_sequence(source)
    );
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_translateMarkup_withFixedTranslation_shouldRestoreTags() {
    let mock = MockTranslator::working()
        .respond_with("tr", "__TAG_0__Merhaba __TAG_1__Dünya__TAG_2____TAG_3__");
    let result = mock_service(&mock)
        .translate_markup("<p>Hello <b>World</b></p>", &code("tr"), &code("en"))
        .await
        .unwrap();

    assert_eq!(result, "<p>Merhaba <b>Dünya</b></p>");
}

#[tokio::test]
async fn test_translateMarkup_withNoTags_shouldTranslateAsText() {
    let mock = MockTranslator::working();
    let result = mock_service(&mock)
        .translate_markup("Plain words", &code("fr"), &code("en"))
        .await
        .unwrap();

    assert_eq!(result, "[fr] Plain words");
    assert_eq!(mock.calls()[0].text, "Plain words");
}

#[tokio::test]
async fn test_translateMarkup_withLostPlaceholder_shouldFailInsteadOfCorrupting() {
    let mock = MockTranslator::new(MockBehavior::DropPlaceholders);
    let result = mock_service(&mock)
        .translate_markup("<ul><li>One</li></ul>", &code("fr"), &code("en"))
        .await;

    assert!(matches!(
        result,
        Err(TranslationError::PlaceholderMismatch { expected: 4, found: 3 })
    ));
}

#[tokio::test]
async fn test_translateMarkup_failedCall_shouldNotBeCached() {
    let mock = MockTranslator::new(MockBehavior::DropPlaceholders);
    let service = mock_service(&mock);

    for _ in 0..2 {
        assert!(service
            .translate_markup("<i>x</i>", &code("fr"), &code("en"))
            .await
            .is_err());
    }
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_translateText_withEmptyInput_shouldMakeNoCall() {
    let mock = MockTranslator::failing();
    let result = mock_service(&mock)
        .translate_text("", &code("fr"), &code("en"))
        .await
        .unwrap();

    assert_eq!(result, "");
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_protect_withSelfClosingAndComments_shouldTreatEachAsOneTag() {
    let protected = MarkupPreserver::protect("Line<br/>next <!-- note --> end");
    assert_eq!(protected.tags(), &["<br/>", "<!-- note -->"]);
    assert_eq!(protected.text, "Line__TAG_0__next __TAG_1__ end");
}

#[test]
fn test_restore_withExtraPlaceholder_shouldReportCounts() {
    let protected = MarkupPreserver::protect("<b>x</b>");
    let result = protected.restore("__TAG_0__x__TAG_1____TAG_2__");
    assert!(matches!(
        result,
        Err(TranslationError::PlaceholderMismatch { expected: 2, found: 3 })
    ));
}
