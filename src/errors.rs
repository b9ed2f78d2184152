/*!
 * Error types for the capmark crate.
 *
 * This module contains custom error types for different parts of the parser,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while parsing a subtitle document
#[derive(Error, Debug)]
pub enum ParseError {
    /// A block's time-range line did not match `HH:MM:SS,mmm --> HH:MM:SS,mmm`
    #[error("Malformed time range in block {block}: {line}")]
    MalformedTimeRange {
        /// 1-based block index within the document
        block: usize,
        /// The offending line
        line: String,
    },

    /// A time range ended before it started
    #[error("Invalid time range in block {block}: end {end_ms}ms precedes start {start_ms}ms")]
    InvalidTimeRange {
        /// 1-based block index within the document
        block: usize,
        /// Start offset in milliseconds
        start_ms: u64,
        /// End offset in milliseconds
        end_ms: u64,
    },

    /// The document produced no markers at all
    #[error("No caption markers found in document")]
    NoMarkers,
}

/// Errors that can occur while working with subtitle files
#[derive(Error, Debug)]
pub enum FormatError {
    /// The file is neither SAMI nor SRT by extension or content
    #[error("Unrecognized subtitle format: {0}")]
    UnknownFormat(String),

    /// A requested language track is not present in the document
    #[error("No track found for language: {0}")]
    MissingTrack(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from format handling
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
