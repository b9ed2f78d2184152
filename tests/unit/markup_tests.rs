/*!
 * Tests for the markup tokenizer
 */

use capmark::markup::{MarkupCursor, MarkupToken};

/// Test that plain text is reported as raw without consuming input
#[test]
fn test_read_markup_withPlainText_shouldReturnRawAndConsumeNothing() {
    let mut cursor = MarkupCursor::new("just some text");

    assert!(!cursor.peek_is_markup());
    assert_eq!(cursor.read_markup(), MarkupToken::Raw);

    // The text is still there for a raw read
    assert_eq!(cursor.read_text(), "just some text");
    assert!(cursor.is_eof());
}

/// Test opening tag recognition with attribute extraction
#[test]
fn test_read_markup_withOpeningTag_shouldExtractNameAndAttributes() {
    let mut cursor = MarkupCursor::new("<SYNC Start=900>");

    let token = cursor.read_markup();
    match &token {
        MarkupToken::OpeningTag { name, raw, attributes } => {
            assert_eq!(name, "SYNC");
            assert_eq!(raw, "SYNC Start=900");
            assert_eq!(attributes.get("start").map(String::as_str), Some("900"));
        }
        other => panic!("expected opening tag, got {:?}", other),
    }

    // Attribute lookup is case-insensitive
    assert_eq!(token.attribute("START"), Some("900"));
    assert_eq!(token.attribute("start"), Some("900"));
    assert!(token.is_named("sync"));
}

/// Test quoted and bare attribute values
#[test]
fn test_read_markup_withMixedAttributeQuoting_shouldCaptureAllValues() {
    let mut cursor =
        MarkupCursor::new(r#"<P Class="Captions" ID='intro' Align=center>"#);

    let token = cursor.read_markup();
    assert_eq!(token.attribute("class"), Some("Captions"));
    assert_eq!(token.attribute("id"), Some("intro"));
    assert_eq!(token.attribute("align"), Some("center"));
}

/// Test closing tag recognition
#[test]
fn test_read_markup_withClosingTag_shouldReturnClosingKind() {
    let mut cursor = MarkupCursor::new("</P>rest");

    assert_eq!(
        cursor.read_markup(),
        MarkupToken::ClosingTag { name: "P".to_string() }
    );
    assert_eq!(cursor.read_text(), "rest");
}

/// Test self-closing tag recognition
#[test]
fn test_read_markup_withSelfClosingTag_shouldStripSlashAndClassify() {
    let mut cursor = MarkupCursor::new("<br/>");

    match cursor.read_markup() {
        MarkupToken::SelfClosingTag { name, .. } => assert_eq!(name, "br"),
        other => panic!("expected self-closing tag, got {:?}", other),
    }
    assert!(cursor.is_eof());
}

/// Test comment recognition including embedded '>' characters
#[test]
fn test_read_markup_withCommentContainingGt_shouldScanToDashDashTerminator() {
    let mut cursor = MarkupCursor::new("<!-- if a > b then --><P>");

    match cursor.read_markup() {
        MarkupToken::Comment { text } => assert_eq!(text, "if a > b then"),
        other => panic!("expected comment, got {:?}", other),
    }

    // The cursor is positioned on the next tag
    assert!(cursor.peek_is_markup());
}

/// Test that an unterminated tag degrades to raw instead of erroring
#[test]
fn test_read_markup_withUnterminatedTag_shouldDegradeToRaw() {
    let mut cursor = MarkupCursor::new("<P Class=Captions");

    assert_eq!(cursor.read_markup(), MarkupToken::Raw);
    assert!(cursor.is_eof());
}

/// Test that a lone '<' at end of input degrades to raw
#[test]
fn test_read_markup_withLoneAngleBracket_shouldDegradeToRaw() {
    let mut cursor = MarkupCursor::new("<");

    assert_eq!(cursor.read_markup(), MarkupToken::Raw);
    assert!(cursor.is_eof());
}

/// Test reading up to a stop character
#[test]
fn test_read_to_before_char_withStopPresent_shouldNotConsumeStop() {
    let mut cursor = MarkupCursor::new("abc<def");

    assert_eq!(cursor.read_to_before_char('<'), "abc");
    assert!(cursor.peek_is_markup());
}

/// Test reading to end of stream when the stop character never appears
#[test]
fn test_read_to_before_char_withStopAbsent_shouldReadToEnd() {
    let mut cursor = MarkupCursor::new("abcdef");

    assert_eq!(cursor.read_to_before_char('>'), "abcdef");
    assert!(cursor.is_eof());
}

/// Test that malformed attribute fragments are skipped, not errored
#[test]
fn test_read_markup_withMalformedAttributes_shouldSkipBadFragments() {
    let mut cursor = MarkupCursor::new("<P =broken Class=Captions>");

    let token = cursor.read_markup();
    assert_eq!(token.attribute("class"), Some("Captions"));
}
