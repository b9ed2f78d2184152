/*!
 * Tests for HTML entity decoding
 */

use capmark::entities;

/// Test decoding of the named entities common in SAMI captions
#[test]
fn test_decode_withNamedEntities_shouldResolveCharacters() {
    assert_eq!(
        entities::decode("qui &oelig;uvre &agrave; l'acc&egrave;s"),
        "qui œuvre à l'accès"
    );
    assert_eq!(entities::decode("fish &amp; chips"), "fish & chips");
    assert_eq!(entities::decode("&lt;tag&gt;"), "<tag>");
    assert_eq!(entities::decode("a&nbsp;b"), "a\u{a0}b");
}

/// Test decoding of decimal and hexadecimal numeric references
#[test]
fn test_decode_withNumericReferences_shouldResolveCodePoints() {
    assert_eq!(entities::decode("&#233;"), "é");
    assert_eq!(entities::decode("&#xE9;"), "é");
    assert_eq!(entities::decode("&#X20AC;"), "€");
}

/// Test that plain text round-trips unchanged
#[test]
fn test_decode_withPlainAscii_shouldReturnInputUnchanged() {
    let text = "already decoded plain text, nothing to do.";
    assert_eq!(entities::decode(text), text);
}

/// Test that unknown or malformed references pass through verbatim
#[test]
fn test_decode_withUnknownReference_shouldPassThrough() {
    assert_eq!(entities::decode("&bogus;"), "&bogus;");
    assert_eq!(entities::decode("AT&T"), "AT&T");
    assert_eq!(entities::decode("a & b"), "a & b");
    assert_eq!(entities::decode("&#notanumber;"), "&#notanumber;");
    assert_eq!(entities::decode("trailing &"), "trailing &");
}

/// Test decoding multiple references in one string
#[test]
fn test_decode_withMixedReferences_shouldResolveEachIndependently() {
    assert_eq!(
        entities::decode("&laquo;&nbsp;Bonjour&nbsp;&raquo; &#8212; dit-il"),
        "«\u{a0}Bonjour\u{a0}» — dit-il"
    );
}
