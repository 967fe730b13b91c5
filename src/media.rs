//! Media classification
//!
//! Every file a scan touches is classified exactly once through a lookup
//! table keyed by lowercase extension. Only images and videos ever make it
//! into a [`MediaEntry`].

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::ordering::FileSortKey;

/// Image file extensions recognized by the reader (lowercase, no dot)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

/// Video file extensions recognized by the reader (lowercase, no dot)
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv"];

/// Kind of a file as far as the reader is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Unrecognized,
}

/// Extension lookup table, resolved once per file
const KIND_TABLE: &[(&[&str], MediaKind)] = &[
    (IMAGE_EXTENSIONS, MediaKind::Image),
    (VIDEO_EXTENSIONS, MediaKind::Video),
];

impl MediaKind {
    /// Classify a path by its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unrecognized;
        };
        Self::from_extension(ext)
    }

    /// Classify a bare extension such as `"JPG"` or `"mkv"`
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        KIND_TABLE
            .iter()
            .find(|(exts, _)| exts.contains(&ext.as_str()))
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Unrecognized)
    }

    /// Short label used in the status line and listings
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Unrecognized => "Other",
        }
    }
}

/// One viewable file on disk
///
/// Built fresh on every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    path: PathBuf,
    kind: MediaKind,
    sort_key: FileSortKey,
}

impl MediaEntry {
    /// Build an entry for `path`, or `None` when the extension is not an image or video
    ///
    /// `metadata` supplies the modification time for names without a digit run.
    pub fn classify(path: PathBuf, metadata: Option<&Metadata>) -> Option<Self> {
        let kind = MediaKind::from_path(&path);
        if kind == MediaKind::Unrecognized {
            return None;
        }
        let modified = metadata.and_then(|m| m.modified().ok());
        let sort_key = FileSortKey::for_file(&file_name(&path), modified);
        Some(Self {
            path,
            kind,
            sort_key,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn sort_key(&self) -> &FileSortKey {
        &self.sort_key
    }

    pub fn is_image(&self) -> bool {
        self.kind == MediaKind::Image
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// Final path component as a lossy string (empty when there is none)
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
