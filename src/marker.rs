use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use serde::{Deserialize, Serialize};

// @module: Timed caption marker model

// @struct: Single timed caption marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    // @field: Start offset from document start in ms
    pub position_ms: u64,

    // @field: Explicit span in ms; None means the end is unknown
    pub duration_ms: Option<u64>,

    // @field: Decoded caption text
    pub content: String,
}

impl Marker {
    /// Creates a new marker
    pub fn new(position_ms: u64, duration_ms: Option<u64>, content: String) -> Self {
        Marker {
            position_ms,
            duration_ms,
            content,
        }
    }

    /// End offset in milliseconds, when the duration is known
    pub fn end_time_ms(&self) -> Option<u64> {
        self.duration_ms.map(|d| self.position_ms + d)
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].trim().parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].trim().parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].trim().parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].trim().parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a millisecond offset as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.position_ms)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let end = match self.end_time_ms() {
            Some(ms) => Self::format_timestamp(ms),
            None => "??:??:??,???".to_string(),
        };
        writeln!(f, "{} --> {}", self.format_start_time(), end)?;
        writeln!(f, "{}", self.content)
    }
}

/// Ordered markers sharing one resolved language code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTrack {
    /// Track language key (e.g. "EN")
    pub language: String,

    /// Markers in document order
    pub markers: Vec<Marker>,
}

impl MarkerTrack {
    /// Create an empty track for a language
    pub fn new(language: String) -> Self {
        MarkerTrack {
            language,
            markers: Vec::new(),
        }
    }

    /// Create a track from already-ordered markers
    pub fn from_markers(language: String, markers: Vec<Marker>) -> Self {
        MarkerTrack { language, markers }
    }

    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Fill unset durations from the next marker's start.
    ///
    /// For every marker except the last, an unset duration becomes the delta to
    /// the following marker's position; the last marker keeps its unset
    /// duration. Explicit durations are left untouched.
    pub fn backfill_durations(&mut self) {
        for i in 0..self.markers.len().saturating_sub(1) {
            if self.markers[i].duration_ms.is_none() {
                let delta = self.markers[i + 1]
                    .position_ms
                    .saturating_sub(self.markers[i].position_ms);
                self.markers[i].duration_ms = Some(delta);
            }
        }
    }

    /// Render the track as an SRT document.
    ///
    /// Markers with an unset duration (the last marker of a SAMI track) are
    /// rendered with `default_duration_ms` as their display span. Markers with
    /// empty content are skipped: SRT has no notion of a timed clear, the gap
    /// between entries serves that purpose.
    pub fn to_srt_string(&self, default_duration_ms: u64) -> String {
        let mut out = String::new();
        let mut seq_num = 0;

        for marker in &self.markers {
            if marker.content.trim().is_empty() {
                continue;
            }
            seq_num += 1;

            let end_ms = marker
                .end_time_ms()
                .unwrap_or(marker.position_ms + default_duration_ms);

            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                seq_num,
                marker.format_start_time(),
                Marker::format_timestamp(end_ms),
                marker.content
            ));
        }

        out
    }

    /// Write the track to an SRT file, creating parent directories as needed
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P, default_duration_ms: u64) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        file.write_all(self.to_srt_string(default_duration_ms).as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for MarkerTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Marker Track")?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Markers: {}", self.markers.len())?;
        Ok(())
    }
}
