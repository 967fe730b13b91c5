//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use folio::collector::{Collection, ScanRequest};
use folio::layout::Size;
use folio::model::ViewerState;
use folio::MediaEntry;

/// Write a solid-color PNG of the given size
pub fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(path)
        .unwrap();
}

/// Create an empty file (enough for a video entry; nothing decodes it)
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// File names of a collection in navigation order
pub fn names(collection: &Collection) -> Vec<String> {
    collection.iter().map(MediaEntry::file_name).collect()
}

/// Collection built from bare file names, without touching the disk
pub fn collection_of(names: &[&str]) -> Collection {
    Collection::from_entries(
        names
            .iter()
            .filter_map(|n| MediaEntry::classify(PathBuf::from(n), None)),
    )
}

/// State holding `names`, with a measured 800x600 viewport and screen
pub fn test_state(names: &[&str]) -> ViewerState {
    let mut state = ViewerState::default();
    state.load(
        collection_of(names),
        ScanRequest::Directory(PathBuf::from("test")),
    );
    state.viewport = Size::new(800, 600);
    state.screen = Size::new(1920, 1080);
    state
}
