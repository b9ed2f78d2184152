/*!
 * Tests for SRT document parsing
 */

use capmark::app_config::MalformedBlockPolicy;
use capmark::srt_parser;
use crate::common;

/// Test parsing the five-block reference document
#[test]
fn test_parse_withFiveBlocks_shouldReturnOrderedMarkers() {
    let markers = srt_parser::parse(common::srt_five_block()).unwrap();

    assert_eq!(markers.len(), 5);

    assert_eq!(markers[0].position_ms, 89256);
    assert_eq!(markers[0].end_time_ms(), Some(91859));
    assert_eq!(markers[0].content, "Listen to me, please.");

    assert_eq!(markers[1].content, "You're like me, a homo sapiens,");

    // Document order is preserved
    for pair in markers.windows(2) {
        assert!(pair[0].position_ms <= pair[1].position_ms);
    }
}

/// Test that multi-line captions join with explicit newlines
#[test]
fn test_parse_withMultiLineBlock_shouldJoinWithNewlines() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nfirst line\nsecond line\n";
    let markers = srt_parser::parse(content).unwrap();

    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].content, "first line\nsecond line");
}

/// Test tolerance for CRLF line endings and padded lines
#[test]
fn test_parse_withCrlfAndPadding_shouldParseNormally() {
    let content =
        "1\r\n00:00:01,000 --> 00:00:04,000\r\n  Hello world  \r\n\r\n2\r\n00:00:05,000 --> 00:00:08,000\r\nSecond\r\n";
    let markers = srt_parser::parse(content).unwrap();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].content, "Hello world");
    assert_eq!(markers[1].position_ms, 5000);
}

/// Test that a malformed time-range line is skipped under the default policy
#[test]
fn test_parse_withMalformedTimeRange_shouldSkipBlockByDefault() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nGood\n\n2\nnot a time range\nBad\n\n3\n00:00:09,000 --> 00:00:10,000\nAlso good\n";
    let markers = srt_parser::parse(content).unwrap();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].content, "Good");
    assert_eq!(markers[1].content, "Also good");
}

/// Test that the fail policy aborts on a malformed time-range line
#[test]
fn test_parse_withMalformedTimeRangeAndFailPolicy_shouldAbort() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nGood\n\n2\nnot a time range\nBad\n";
    let result = srt_parser::parse_with_policy(content, MalformedBlockPolicy::Fail);

    assert!(result.is_err());
}

/// Test that a time range ending before it starts is rejected
#[test]
fn test_parse_withReversedTimeRange_shouldSkipBlock() {
    let content = "1\n00:00:04,000 --> 00:00:01,000\nReversed\n\n2\n00:00:05,000 --> 00:00:06,000\nFine\n";
    let markers = srt_parser::parse(content).unwrap();

    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].content, "Fine");
}

/// Test that a document with no parseable blocks is an error
#[test]
fn test_parse_withNoValidBlocks_shouldFail() {
    assert!(srt_parser::parse("").is_err());
    assert!(srt_parser::parse("random text\nwith no structure\n").is_err());
}

/// Test that the numeric index line is never validated
#[test]
fn test_parse_withNonNumericIndexLine_shouldStillParse() {
    let content = "not-a-number\n00:00:01,000 --> 00:00:02,000\nText\n";
    let markers = srt_parser::parse(content).unwrap();

    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].position_ms, 1000);
}

/// Test that re-parsing the same document yields equal results
#[test]
fn test_parse_withSameDocumentTwice_shouldBeIdempotent() {
    let first = srt_parser::parse(common::srt_five_block()).unwrap();
    let second = srt_parser::parse(common::srt_five_block()).unwrap();

    assert_eq!(first, second);
}
