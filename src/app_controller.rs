use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::FormatError;
use crate::file_utils::{FileManager, SubtitleFormat};
use crate::language_utils;
use crate::marker::MarkerTrack;
use crate::sami_parser;
use crate::srt_parser;

// @module: Application controller for caption processing

/// Main application controller for parsing and converting subtitle files
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parse a subtitle file into language tracks.
    ///
    /// SAMI documents yield one track per discovered language; SRT documents
    /// yield a single track labelled with the configured default language.
    pub fn parse_file<P: AsRef<Path>>(&self, input_file: P) -> Result<Vec<MarkerTrack>> {
        let input_file = input_file.as_ref();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let content = FileManager::read_to_string(input_file)?;
        let format = FileManager::detect_format(input_file, &content)?;
        debug!("Detected format {} for {:?}", format, input_file);

        match format {
            SubtitleFormat::Sami => {
                let tracks = sami_parser::parse(&content)?;
                Ok(tracks.into_values().collect())
            }
            SubtitleFormat::Srt => {
                let markers =
                    srt_parser::parse_with_policy(&content, self.config.srt_malformed_block)?;
                let language = language_utils::normalize_or_default(&self.config.default_language);
                Ok(vec![MarkerTrack::from_markers(language, markers)])
            }
        }
    }

    /// Serialize a file's tracks as pretty-printed JSON
    pub fn parse_to_json<P: AsRef<Path>>(&self, input_file: P) -> Result<String> {
        let tracks = self.parse_file(input_file)?;
        serde_json::to_string_pretty(&tracks).map_err(|e| anyhow!("Failed to serialize markers: {}", e))
    }

    /// List the language tracks in a file with their marker counts
    pub fn list_tracks<P: AsRef<Path>>(&self, input_file: P) -> Result<Vec<(String, usize)>> {
        let tracks = self.parse_file(input_file)?;
        Ok(tracks
            .into_iter()
            .map(|t| (t.language, t.markers.len()))
            .collect())
    }

    /// Convert one subtitle file to SRT, one output file per selected track.
    ///
    /// With `language` set, only the matching track is written; otherwise every
    /// track is. Existing outputs are skipped unless `force_overwrite` is set.
    pub fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        language: Option<&str>,
        force_overwrite: bool,
    ) -> Result<()> {
        let tracks = self.parse_file(&input_file)?;
        let selected = select_tracks(tracks, language)?;

        for track in &selected {
            let output_path = FileManager::generate_output_path(
                &input_file,
                &output_dir,
                &track.language.to_lowercase(),
                "srt",
            );

            if output_path.exists() && !force_overwrite {
                warn!(
                    "Skipping existing output (use -f to force overwrite): {:?}",
                    output_path
                );
                continue;
            }

            track.write_to_srt(&output_path, self.config.default_duration_ms)?;
            info!(
                "Wrote {} markers ({}) to {:?}",
                track.markers.len(),
                track.language,
                output_path
            );
        }

        Ok(())
    }

    /// Convert every subtitle file under a directory tree.
    ///
    /// Each file is processed independently; a failing file is logged and
    /// counted, never aborting the batch.
    pub fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let subtitle_files = FileManager::find_subtitle_files(&input_dir)?;
        if subtitle_files.is_empty() {
            return Err(anyhow!(
                "No subtitle files found in directory: {:?}",
                input_dir
            ));
        }

        let progress = ProgressBar::new(subtitle_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress.set_message("Processing files");

        let mut success_count = 0;
        let mut error_count = 0;

        for subtitle_file in subtitle_files.iter() {
            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress.set_message(format!("Processing: {}", file_name));

            let output_dir = match subtitle_file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            match self.run(subtitle_file.clone(), output_dir, None, force_overwrite) {
                Ok(_) => success_count += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_with_message("Folder processing complete");

        let duration = start_time.elapsed();
        info!(
            "Folder processing completed in {:.1}s: {} processed, {} errors",
            duration.as_secs_f64(),
            success_count,
            error_count
        );

        Ok(())
    }
}

/// Keep the tracks matching a requested language, or all of them.
///
/// A request matching nothing is an error: the caller asked for a track the
/// document does not have.
fn select_tracks(tracks: Vec<MarkerTrack>, language: Option<&str>) -> Result<Vec<MarkerTrack>> {
    match language {
        None => Ok(tracks),
        Some(requested) => {
            let selected: Vec<MarkerTrack> = tracks
                .into_iter()
                .filter(|t| language_utils::language_codes_match(&t.language, requested))
                .collect();
            if selected.is_empty() {
                return Err(anyhow!(FormatError::MissingTrack(requested.to_string())));
            }
            Ok(selected)
        }
    }
}
