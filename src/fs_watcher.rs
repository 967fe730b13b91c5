//! File system watching for the active collection
//!
//! Uses the `notify` crate with debouncing to detect changes in the scanned
//! directory. Only changes that can affect the collection are reported:
//! media files and extension-less paths (usually directories).

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::media::MediaKind;

/// Debounce window for bursts of changes (e.g. copying a chapter in)
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounced watcher over one scan directory
pub struct DirectoryWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    root: PathBuf,
}

impl DirectoryWatcher {
    /// Watch `root`, descending into subdirectories when `recursive`
    pub fn new(root: PathBuf, recursive: bool) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

        let mode = if recursive {
            notify::RecursiveMode::Recursive
        } else {
            notify::RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&root, mode)?;

        tracing::info!(
            "Watching {} ({})",
            root.display(),
            if recursive { "recursive" } else { "flat" }
        );

        Ok(Self {
            _debouncer: debouncer,
            rx,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths with relevant changes since the last poll (non-blocking)
    ///
    /// Each path appears at most once. A non-empty result means the
    /// collection should be rescanned.
    pub fn poll_changes(&self) -> Vec<PathBuf> {
        let mut changed: Vec<PathBuf> = Vec::new();

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        if should_ignore(&self.root, &event.path) {
                            continue;
                        }
                        if !changed.contains(&event.path) {
                            changed.push(event.path);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("File system watcher error: {:?}", e);
                }
            }
        }

        if !changed.is_empty() {
            tracing::debug!("Watcher saw {} relevant changes", changed.len());
        }
        changed
    }
}

/// Whether a change at `path` cannot affect the collection under `root`
pub fn should_ignore(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let hidden = relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    });
    if hidden {
        return true;
    }

    // No extension: most likely a directory, which changes the tree
    if path.extension().is_none() {
        return false;
    }
    MediaKind::from_path(path) == MediaKind::Unrecognized
}
