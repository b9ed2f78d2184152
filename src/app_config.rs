use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language assigned to SRT documents and to unmapped SAMI classes
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Display duration in ms for markers whose end is unknown
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,

    /// What to do with an SRT block whose time-range line is malformed
    #[serde(default)]
    pub srt_malformed_block: MalformedBlockPolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Policy for SRT blocks that fail time-range parsing
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedBlockPolicy {
    // @policy: Drop the block with a warning
    #[default]
    Skip,
    // @policy: Abort the whole parse
    Fail,
}

impl MalformedBlockPolicy {
    // @returns: Lowercase policy identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Skip => "skip".to_string(),
            Self::Fail => "fail".to_string(),
        }
    }
}

// Implement Display trait for MalformedBlockPolicy
impl std::fmt::Display for MalformedBlockPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for MalformedBlockPolicy
impl std::str::FromStr for MalformedBlockPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            _ => Err(anyhow!("Invalid malformed-block policy: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_duration_ms() -> u64 {
    // Display span for open-ended markers when rendering SRT
    3000
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e)
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e)
        })?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate the fallback language
        let _name = language_utils::get_language_name(&self.default_language)?;

        if self.default_duration_ms == 0 {
            return Err(anyhow!("default_duration_ms must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_language: default_language(),
            default_duration_ms: default_duration_ms(),
            srt_malformed_block: MalformedBlockPolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}
