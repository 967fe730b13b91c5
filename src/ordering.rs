//! Smart ordering for scanned media
//!
//! Files order by the first run of decimal digits in their name, then by
//! modification time for names without digits. Directories order by the
//! first `YYYY-MM-DD` date embedded in their name (or, for recursive scans,
//! anywhere in their path); undated directories sort first.
//!
//! Only the first digit run of a file name is considered, so
//! `page2_of10.jpg` sorts before `page10_of2.jpg` regardless of the second
//! number.

use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use chrono::NaiveDate;
use regex::Regex;

use crate::media::{file_name, MediaEntry};

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static digit pattern"))
}

fn iso_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("static date pattern"))
}

// ============================================================================
// File keys
// ============================================================================

/// Arbitrary-length non-negative integer taken from a digit run
///
/// Stored without leading zeros so that `"007"` and `"7"` compare equal and
/// no digit run is too long to order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceNumber(String);

impl SequenceNumber {
    pub fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self("0".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl Ord for SequenceNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SequenceNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key for a media file
///
/// Variant order is the bucket order: numbered names first, then names
/// ordered by modification time, then names with no usable timestamp. Each
/// bucket breaks ties on the literal file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileSortKey {
    Numbered { number: SequenceNumber, name: String },
    Modified { at: SystemTime, name: String },
    Unknown { name: String },
}

impl FileSortKey {
    /// Key for a file name, with its modification time when known
    pub fn for_file(name: &str, modified: Option<SystemTime>) -> Self {
        if let Some(number) = first_number(name) {
            return Self::Numbered {
                number,
                name: name.to_string(),
            };
        }
        match modified {
            Some(at) => Self::Modified {
                at,
                name: name.to_string(),
            },
            None => Self::Unknown {
                name: name.to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Numbered { name, .. } | Self::Modified { name, .. } | Self::Unknown { name } => {
                name
            }
        }
    }
}

/// First run of ASCII digits in `name`, if any
pub fn first_number(name: &str) -> Option<SequenceNumber> {
    digit_run()
        .find(name)
        .map(|m| SequenceNumber::from_digits(m.as_str()))
}

/// Sort entries in place by their smart-ordering key
pub fn sort_entries(entries: &mut [MediaEntry]) {
    entries.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
}

// ============================================================================
// Directory keys
// ============================================================================

/// First valid `YYYY-MM-DD` date in `text`
///
/// Only the first date-shaped match is tried; a match that is not a real
/// calendar date (e.g. `2024-13-40`) yields `None`.
pub fn date_in_name(text: &str) -> Option<NaiveDate> {
    let m = iso_date().find(text)?;
    NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok()
}

/// First valid date found in any path component, scanning from the root
pub fn date_in_path(path: &Path) -> Option<NaiveDate> {
    path.components().find_map(|component| match component {
        Component::Normal(part) => date_in_name(&part.to_string_lossy()),
        _ => None,
    })
}

/// Sort key for a directory
///
/// `None` dates sort before every dated directory; ties break on the label
/// (directory name or full path depending on the ordering variant).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirSortKey {
    pub date: Option<NaiveDate>,
    pub label: String,
}

impl DirSortKey {
    /// Key from the directory's own name (sibling and tree ordering)
    pub fn by_name(dir: &Path) -> Self {
        let label = file_name(dir);
        Self {
            date: date_in_name(&label),
            label,
        }
    }

    /// Key from the date anywhere in the directory's path (recursive scans)
    pub fn by_path(dir: &Path) -> Self {
        Self {
            date: date_in_path(dir),
            label: dir.to_string_lossy().to_string(),
        }
    }
}

/// Order directories chronologically by the date in their name
pub fn sort_directories_by_name(dirs: &mut [PathBuf]) {
    dirs.sort_by_cached_key(|d| DirSortKey::by_name(d));
}

/// Order directories chronologically by the first date in their path
pub fn sort_directories_by_path(dirs: &mut [PathBuf]) {
    dirs.sort_by_cached_key(|d| DirSortKey::by_path(d));
}
