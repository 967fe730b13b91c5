//! Directory collector
//!
//! Turns directories into an ordered [`Collection`]. Each directory
//! contributes its images and videos separately; the navigable sequence is
//! every image followed by every video.
//!
//! Scans are synchronous. Failures on the directory a scan was started on
//! are returned as [`ScanError`]; failures below it are logged and skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;
use crate::media::{MediaEntry, MediaKind};
use crate::ordering::{sort_directories_by_name, sort_directories_by_path, sort_entries};

// ============================================================================
// Collection
// ============================================================================

/// Ordered media produced by a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    images: Vec<MediaEntry>,
    videos: Vec<MediaEntry>,
}

impl Collection {
    /// Build a collection from unsorted entries, ordering each kind
    pub fn from_entries(entries: impl IntoIterator<Item = MediaEntry>) -> Self {
        let (mut images, mut videos): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(MediaEntry::is_image);
        sort_entries(&mut images);
        sort_entries(&mut videos);
        Self { images, videos }
    }

    /// Total number of navigable entries
    pub fn len(&self) -> usize {
        self.images.len() + self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    pub fn images(&self) -> &[MediaEntry] {
        &self.images
    }

    pub fn videos(&self) -> &[MediaEntry] {
        &self.videos
    }

    /// Entry at a position of the navigable sequence (images then videos)
    pub fn get(&self, index: usize) -> Option<&MediaEntry> {
        if index < self.images.len() {
            self.images.get(index)
        } else {
            self.videos.get(index - self.images.len())
        }
    }

    /// Iterate the navigable sequence in order
    pub fn iter(&self) -> impl Iterator<Item = &MediaEntry> {
        self.images.iter().chain(self.videos.iter())
    }

    /// Position of the entry whose path equals `path`
    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.iter().position(|e| e.path() == path)
    }

    /// Append another directory's media, keeping images ahead of videos
    pub fn append(&mut self, other: Collection) {
        self.images.extend(other.images);
        self.videos.extend(other.videos);
    }
}

// ============================================================================
// Scan requests and outcomes
// ============================================================================

/// What the user asked to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    /// Immediate children of one directory
    Directory(PathBuf),
    /// A directory and everything below it
    Recursive(PathBuf),
    /// Every sibling of `current` (under `parent`) that sorts after it
    SubsequentSiblings { current: PathBuf, parent: PathBuf },
}

impl ScanRequest {
    /// Run the scan synchronously
    pub fn run(&self) -> Result<ScanOutcome, ScanError> {
        match self {
            Self::Directory(dir) => Ok(ScanOutcome::Loaded {
                collection: scan_one(dir)?,
                directories: 1,
            }),
            Self::Recursive(root) => {
                let (collection, directories) = scan_recursive_counted(root)?;
                Ok(ScanOutcome::Loaded {
                    collection,
                    directories,
                })
            }
            Self::SubsequentSiblings { current, parent } => {
                scan_subsequent_siblings(current, parent)
            }
        }
    }

    /// Directory to watch for changes, and whether to watch recursively
    pub fn watch_target(&self) -> (&Path, bool) {
        match self {
            Self::Directory(dir) => (dir, false),
            Self::Recursive(root) => (root, true),
            Self::SubsequentSiblings { parent, .. } => (parent, true),
        }
    }
}

/// Result of a scan that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Media collected from `directories` directories
    Loaded {
        collection: Collection,
        directories: usize,
    },
    /// The current directory is not among its parent's children
    CurrentNotFound,
    /// The current directory is the last of its siblings
    NoneAfter,
}

// ============================================================================
// Scans
// ============================================================================

/// Collect the images and videos directly inside `directory`
///
/// A directory that exists but denies listing yields an empty collection.
pub fn scan_one(directory: &Path) -> Result<Collection, ScanError> {
    ensure_directory(directory)?;
    match list_media(directory) {
        Ok(collection) => Ok(collection),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!("Permission denied listing {}", directory.display());
            Ok(Collection::default())
        }
        Err(e) => Err(ScanError::from_io(directory, e)),
    }
}

/// Collect media from `root` and every directory below it
///
/// Directories are visited in order of the first date found in their path
/// and each contributes its media ordered as by [`scan_one`].
pub fn scan_recursive(root: &Path) -> Result<Collection, ScanError> {
    scan_recursive_counted(root).map(|(collection, _)| collection)
}

fn scan_recursive_counted(root: &Path) -> Result<(Collection, usize), ScanError> {
    ensure_directory(root)?;
    fs::read_dir(root).map_err(|e| ScanError::from_io(root, e))?;

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping unreadable path during scan: {}", e),
        }
    }
    sort_directories_by_path(&mut dirs);

    let mut collection = Collection::default();
    let mut scanned = 0;
    for dir in &dirs {
        match list_media(dir) {
            Ok(media) => {
                collection.append(media);
                scanned += 1;
            }
            Err(e) => tracing::warn!("Skipping {}: {}", dir.display(), e),
        }
    }

    tracing::debug!(
        "Recursive scan of {} found {} entries in {} directories",
        root.display(),
        collection.len(),
        scanned
    );
    Ok((collection, scanned))
}

/// Collect media from every sibling of `current` that sorts after it
///
/// Siblings are the immediate subdirectories of `parent`, ordered by the
/// date in their name. `current` is located by file identity, so a path
/// reached through a symlink or alias still matches.
pub fn scan_subsequent_siblings(current: &Path, parent: &Path) -> Result<ScanOutcome, ScanError> {
    let mut siblings = subdirectories(parent)?;
    sort_directories_by_name(&mut siblings);

    let Some(position) = siblings.iter().position(|dir| same_file(dir, current)) else {
        tracing::info!(
            "{} is not a child of {}",
            current.display(),
            parent.display()
        );
        return Ok(ScanOutcome::CurrentNotFound);
    };

    let after = &siblings[position + 1..];
    if after.is_empty() {
        return Ok(ScanOutcome::NoneAfter);
    }

    let mut collection = Collection::default();
    for dir in after {
        match scan_recursive(dir) {
            Ok(media) => collection.append(media),
            Err(e) => tracing::warn!("Skipping sibling {}: {}", dir.display(), e),
        }
    }

    Ok(ScanOutcome::Loaded {
        collection,
        directories: after.len(),
    })
}

/// Parent used for a sibling scan: the directory's parent, or `root` when it has none
pub fn sibling_parent(current: &Path, root: &Path) -> PathBuf {
    match current.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && parent != current => {
            parent.to_path_buf()
        }
        _ => root.to_path_buf(),
    }
}

/// Immediate subdirectories of `dir` (symlinks to directories included)
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    ensure_directory(dir)?;
    let entries = fs::read_dir(dir).map_err(|e| ScanError::from_io(dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                }
            }
            Err(e) => tracing::warn!("Skipping entry in {}: {}", dir.display(), e),
        }
    }
    Ok(dirs)
}

/// Whether two paths refer to the same file on disk
pub fn same_file(a: &Path, b: &Path) -> bool {
    let (Ok(meta_a), Ok(meta_b)) = (fs::metadata(a), fs::metadata(b)) else {
        return false;
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino()
    }

    #[cfg(not(unix))]
    {
        let _ = (meta_a, meta_b);
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

fn ensure_directory(path: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(path).map_err(|e| ScanError::from_io(path, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// List one directory's media; only failure to open the directory is an error
fn list_media(directory: &Path) -> io::Result<Collection> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping entry in {}: {}", directory.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if MediaKind::from_path(&path) == MediaKind::Unrecognized {
            continue;
        }

        // Follows symlinks, so a link to an image counts as an image
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        if let Some(media) = MediaEntry::classify(path, Some(&metadata)) {
            entries.push(media);
        }
    }

    Ok(Collection::from_entries(entries))
}
