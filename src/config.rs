//! Reader configuration
//!
//! Read from `~/.config/folio/config.yaml` when present. The reader never
//! writes this file; every field has a default so a partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::AlignMode;
use crate::model::ReadingMode;

/// User preferences for a reading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Alignment used when a session starts
    pub align_mode: AlignMode,
    /// Reading mode used when a session starts
    pub reading_mode: ReadingMode,
    /// Maximum number of thumbnails generated per collection
    pub thumbnail_limit: usize,
    /// Longest side of a thumbnail in pixels
    pub thumbnail_size: u32,
    /// `ffmpeg` executable used to decode video frames
    pub ffmpeg_path: PathBuf,
    /// `ffprobe` executable used to read video stream info
    pub ffprobe_path: PathBuf,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            align_mode: AlignMode::Width,
            reading_mode: ReadingMode::Page,
            thumbnail_limit: 50,
            thumbnail_size: 120,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
        }
    }
}

impl ReaderConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse YAML config text
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}
