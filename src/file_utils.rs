use anyhow::{Result, Context, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::FormatError;

// @module: File and directory utilities

/// Subtitle document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    // @format: SubRip text
    Srt,
    // @format: Synchronized Accessible Media Interchange
    Sami,
}

impl SubtitleFormat {
    /// Format for a file extension, if it names one
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "smi" | "sami" => Some(Self::Sami),
            _ => None,
        }
    }

    /// Sniff the format from document content.
    ///
    /// A SAMI document opens with a `<SAMI>` element; an SRT document has a
    /// `-->` time-range arrow within its first few lines.
    pub fn from_content(content: &str) -> Option<Self> {
        let head = content.trim_start().as_bytes();
        if head.len() >= 5 && head[..5].eq_ignore_ascii_case(b"<sami") {
            return Some(Self::Sami);
        }
        if content.lines().take(10).any(|line| line.contains("-->")) {
            return Some(Self::Srt);
        }
        None
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Srt => write!(f, "srt"),
            Self::Sami => write!(f, "sami"),
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a converted subtitle
    // @params: input_file, output_dir, language, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        language: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        // Create the output filename with language code and extension
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(language);
        output_filename.push('.');
        output_filename.push_str(extension);

        // Join with the output directory
        output_dir.join(output_filename)
    }

    /// Find subtitle files (SRT/SAMI by extension) under a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                let by_extension = path
                    .extension()
                    .and_then(|ext| SubtitleFormat::from_extension(&ext.to_string_lossy()));
                if by_extension.is_some() {
                    result.push(path.to_path_buf());
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect a file's subtitle format, by extension first and content second
    pub fn detect_format<P: AsRef<Path>>(path: P, content: &str) -> Result<SubtitleFormat> {
        let path = path.as_ref();

        if let Some(format) = path
            .extension()
            .and_then(|ext| SubtitleFormat::from_extension(&ext.to_string_lossy()))
        {
            return Ok(format);
        }

        SubtitleFormat::from_content(content).ok_or_else(|| {
            anyhow!(FormatError::UnknownFormat(
                path.to_string_lossy().to_string()
            ))
        })
    }
}
