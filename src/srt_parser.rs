use anyhow::Result;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::MalformedBlockPolicy;
use crate::errors::ParseError;
use crate::marker::Marker;

// @module: SRT (SubRip) marker parsing

// @const: SRT time-range regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Parse an SRT document into markers, skipping malformed blocks
pub fn parse(content: &str) -> Result<Vec<Marker>> {
    parse_with_policy(content, MalformedBlockPolicy::Skip)
}

/// Parse an SRT document into ordered markers.
///
/// Blocks are separated by blank lines; each block carries a numeric index
/// line (never validated; document order is authoritative), a
/// `HH:MM:SS,mmm --> HH:MM:SS,mmm` time-range line, and one or more text
/// lines joined with `\n`. Line endings and per-line surrounding whitespace
/// are tolerated. A malformed block is skipped with a warning or aborts the
/// parse, per `policy`.
pub fn parse_with_policy(content: &str, policy: MalformedBlockPolicy) -> Result<Vec<Marker>> {
    let mut markers = Vec::new();

    for (index, block) in split_blocks(content).into_iter().enumerate() {
        let block_num = index + 1;

        let Some((time_line_pos, caps)) = block
            .iter()
            .enumerate()
            .find_map(|(i, line)| TIMESTAMP_REGEX.captures(line).map(|c| (i, c)))
        else {
            reject(policy, ParseError::MalformedTimeRange {
                block: block_num,
                line: block.get(1).copied().unwrap_or_default().to_string(),
            })?;
            continue;
        };

        // The index line is discarded; note when it is not the expected number
        if time_line_pos > 0 && block[0].parse::<usize>().is_err() {
            debug!("Block {} has a non-numeric index line: {}", block_num, block[0]);
        }

        let start_ms = capture_to_ms(&caps, 1);
        let end_ms = capture_to_ms(&caps, 5);

        if end_ms < start_ms {
            reject(policy, ParseError::InvalidTimeRange {
                block: block_num,
                start_ms,
                end_ms,
            })?;
            continue;
        }

        let text = block[time_line_pos + 1..].join("\n");
        if text.trim().is_empty() {
            warn!("Skipping block {} with no text lines", block_num);
            continue;
        }

        markers.push(Marker::new(start_ms, Some(end_ms - start_ms), text));
    }

    if markers.is_empty() {
        warn!("No valid caption markers found in SRT content");
        return Err(ParseError::NoMarkers.into());
    }

    Ok(markers)
}

/// Split the document into blocks of trimmed, non-empty lines
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Milliseconds from four consecutive capture groups (H, M, S, ms)
fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let hours: u64 = caps.get(start_idx).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: u64 = caps.get(start_idx + 1).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: u64 = caps.get(start_idx + 2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let millis: u64 = caps.get(start_idx + 3).map_or(0, |m| m.as_str().parse().unwrap_or(0));

    (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
}

/// Apply the malformed-block policy: warn-and-continue or abort
fn reject(policy: MalformedBlockPolicy, error: ParseError) -> Result<()> {
    match policy {
        MalformedBlockPolicy::Skip => {
            warn!("{}", error);
            Ok(())
        }
        MalformedBlockPolicy::Fail => Err(error.into()),
    }
}
