use std::collections::{BTreeMap, HashMap};
use anyhow::Result;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities;
use crate::errors::ParseError;
use crate::language_utils;
use crate::marker::{Marker, MarkerTrack};
use crate::markup::{MarkupCursor, MarkupToken};

// @module: SAMI (Synchronized Accessible Media Interchange) marker parsing

// @const: STYLE block extraction regex
static STYLE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap()
});

// @const: CSS class rule regex for `.ClassName { body }`
static STYLE_RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\.([A-Za-z][A-Za-z0-9_\-]*)\s*\{([^}]*)\}").unwrap()
});

// @const: `lang:` declaration inside a rule body
static LANG_DECL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\blang\s*:\s*([A-Za-z]{2,3}(?:[-_][A-Za-z0-9]+)*)").unwrap()
});

/// BODY walk state.
///
/// SAMI omits closing tags freely, so a new `<P>`, a new `<SYNC>`, or the end
/// of the body implicitly closes an open paragraph.
#[derive(Debug, Clone, Copy, PartialEq)]
enum WalkState {
    OutsideSync,
    InSync,
    InParagraph,
}

/// Parse a SAMI document into per-language marker tracks.
///
/// Every distinct language discovered through the `<STYLE>` class mapping gets
/// a track holding its markers in document order, with durations back-filled
/// from the next marker's start (the last marker of a track keeps an unset
/// duration). Classes without a `lang:` mapping, and `<P>` elements without a
/// class, fall back to the default language track.
///
/// Structural damage never aborts the parse: the tokenizer degrades malformed
/// markup, and an absent STYLE block or missing close tags are tolerated. The
/// only error is a document that yields no markers at all.
pub fn parse(document: &str) -> Result<BTreeMap<String, MarkerTrack>> {
    let class_languages = scan_style_block(document);
    let mut tracks: BTreeMap<String, MarkerTrack> = BTreeMap::new();

    let mut cursor = MarkupCursor::new(document);
    let mut state = WalkState::OutsideSync;
    let mut sync_start: Option<u64> = None;
    let mut language = language_utils::DEFAULT_LANGUAGE.to_string();
    let mut content = String::new();

    while !cursor.is_eof() {
        if !cursor.peek_is_markup() {
            let text = cursor.read_text();
            if state == WalkState::InParagraph {
                append_run(&mut content, &text);
            }
            continue;
        }

        let token = cursor.read_markup();
        match &token {
            MarkupToken::OpeningTag { name, .. } | MarkupToken::SelfClosingTag { name, .. } => {
                if name.eq_ignore_ascii_case("sync") {
                    // A new timed block implicitly closes any open paragraph
                    flush_paragraph(&mut tracks, &mut state, sync_start, &language, &mut content);
                    state = WalkState::InSync;

                    sync_start = token
                        .attribute("start")
                        .and_then(|v| v.trim().parse::<u64>().ok());
                    if sync_start.is_none() {
                        warn!("SYNC element without a valid Start attribute; its captions are dropped");
                    }
                } else if name.eq_ignore_ascii_case("p") {
                    flush_paragraph(&mut tracks, &mut state, sync_start, &language, &mut content);

                    if state == WalkState::OutsideSync {
                        debug!("Ignoring <P> outside a SYNC block");
                    } else {
                        language = resolve_language(&class_languages, token.attribute("class"));
                        content.clear();
                        state = WalkState::InParagraph;
                    }
                } else if name.eq_ignore_ascii_case("br") {
                    if state == WalkState::InParagraph {
                        content.push('\n');
                    }
                }
                // Other inline tags (span, font, b, i) are stripped; their
                // interior text still accumulates as raw runs.
            }
            MarkupToken::ClosingTag { name } => {
                if name.eq_ignore_ascii_case("p") {
                    flush_paragraph(&mut tracks, &mut state, sync_start, &language, &mut content);
                } else if name.eq_ignore_ascii_case("sync")
                    || name.eq_ignore_ascii_case("body")
                    || name.eq_ignore_ascii_case("sami")
                {
                    flush_paragraph(&mut tracks, &mut state, sync_start, &language, &mut content);
                    state = WalkState::OutsideSync;
                    sync_start = None;
                }
            }
            MarkupToken::Comment { .. } | MarkupToken::Raw => {}
        }
    }

    // End of input implicitly closes an open paragraph
    flush_paragraph(&mut tracks, &mut state, sync_start, &language, &mut content);

    if tracks.is_empty() {
        warn!("No caption markers found in SAMI content");
        return Err(ParseError::NoMarkers.into());
    }

    for track in tracks.values_mut() {
        track.backfill_durations();
    }

    Ok(tracks)
}

/// Build the class → language mapping from the `<STYLE>` block.
///
/// Each `.ClassName { ... lang: tag; ... }` rule contributes one entry, keyed
/// by the lowercased class name. Rules without a `lang:` declaration are left
/// unmapped and resolve to the default language at lookup time. A document
/// without a STYLE block yields an empty mapping.
fn scan_style_block(document: &str) -> HashMap<String, String> {
    let mut class_languages = HashMap::new();

    let Some(style) = STYLE_BLOCK_REGEX
        .captures(document)
        .and_then(|caps| caps.get(1))
    else {
        debug!("No STYLE block found; all classes resolve to the default language");
        return class_languages;
    };

    for rule in STYLE_RULE_REGEX.captures_iter(style.as_str()) {
        let class = rule[1].to_ascii_lowercase();
        if let Some(decl) = LANG_DECL_REGEX.captures(&rule[2]) {
            let track_key = language_utils::normalize_or_default(&decl[1]);
            debug!("STYLE rule .{} maps to language {}", &rule[1], track_key);
            class_languages.insert(class, track_key);
        }
    }

    class_languages
}

/// Resolve a `<P>` class attribute to a track language key
fn resolve_language(class_languages: &HashMap<String, String>, class: Option<&str>) -> String {
    match class {
        Some(name) => class_languages
            .get(&name.to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| language_utils::DEFAULT_LANGUAGE.to_string()),
        None => language_utils::DEFAULT_LANGUAGE.to_string(),
    }
}

/// Append one raw text run to the accumulated paragraph content.
///
/// Runs are entity-decoded and edge-trimmed; a non-empty run is joined with a
/// single space unless the content is empty or a break tag just ended a line.
fn append_run(content: &mut String, raw: &str) {
    let decoded = entities::decode(raw);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return;
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push(' ');
    }
    content.push_str(trimmed);
}

/// Flush an open paragraph as a marker and return to the enclosing SYNC state.
///
/// A paragraph with empty decoded content still produces a marker: it marks a
/// caption clear and participates in duration back-fill. Paragraphs under a
/// SYNC whose Start attribute was invalid have no position and are dropped.
fn flush_paragraph(
    tracks: &mut BTreeMap<String, MarkerTrack>,
    state: &mut WalkState,
    sync_start: Option<u64>,
    language: &str,
    content: &mut String,
) {
    if *state != WalkState::InParagraph {
        return;
    }
    *state = WalkState::InSync;

    let text = content.trim().to_string();
    content.clear();

    let Some(position_ms) = sync_start else {
        warn!("Dropping caption with no SYNC start time: {:?}", text);
        return;
    };

    tracks
        .entry(language.to_string())
        .or_insert_with(|| MarkerTrack::new(language.to_string()))
        .push(Marker::new(position_ms, None, text));
}
