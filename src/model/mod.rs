//! Reader model - the complete state of one viewing session
//!
//! `ViewerState` is owned by the update loop and changed only through
//! [`crate::update::update`]. Navigation helpers here are plain state
//! transitions; deciding what to redraw is left to the update functions.

pub mod status;

pub use status::{fullscreen_caption, StatusLine};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::collector::{Collection, ScanRequest};
use crate::config::ReaderConfig;
use crate::layout::{
    compute_layout, fullscreen_layout, AlignMode, ContinuousLayout, LayoutError, Size,
    ViewportRect,
};
use crate::media::MediaEntry;

/// Multiplier applied by one zoom-in step (and divided out by zoom-out)
pub const ZOOM_STEP: f64 = 1.2;

/// Page-by-page or one long vertical strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Page,
    Continuous,
}

/// Navigation and display state for one session
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// Media from the last completed scan
    pub items: Collection,
    /// Cursor into `items`; meaningful only while `items` is non-empty
    pub index: usize,
    pub align_mode: AlignMode,
    pub reading_mode: ReadingMode,
    /// Multiplicative zoom, unbounded
    pub zoom_factor: f64,
    pub fullscreen: bool,
    /// Whether a video is playing for the current entry
    pub playing: bool,
    /// Last measured size of the display area
    pub viewport: Size,
    /// Size of the fullscreen surface
    pub screen: Size,
    /// Directory the user picked as the library root
    pub root_directory: Option<PathBuf>,
    /// Directory currently selected in the tree
    pub current_directory: Option<PathBuf>,
    /// Scan that produced `items`, re-run on refresh
    pub source: Option<ScanRequest>,
    /// Retained continuous stack for the current viewport width
    pub continuous: Option<ContinuousLayout>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            items: Collection::default(),
            index: 0,
            align_mode: AlignMode::default(),
            reading_mode: ReadingMode::default(),
            zoom_factor: 1.0,
            fullscreen: false,
            playing: false,
            viewport: Size::default(),
            screen: Size::default(),
            root_directory: None,
            current_directory: None,
            source: None,
            continuous: None,
        }
    }
}

impl ViewerState {
    /// Fresh session using the configured display defaults
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            align_mode: config.align_mode,
            reading_mode: config.reading_mode,
            ..Self::default()
        }
    }

    /// Replace the collection with a fresh scan result
    pub fn load(&mut self, items: Collection, source: ScanRequest) {
        self.items = items;
        self.index = 0;
        self.source = Some(source);
        self.continuous = None;
        self.playing = false;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&MediaEntry> {
        self.items.get(self.index)
    }

    pub fn current_is_image(&self) -> bool {
        self.current().is_some_and(MediaEntry::is_image)
    }

    pub fn current_is_video(&self) -> bool {
        self.current().is_some_and(MediaEntry::is_video)
    }

    // ------------------------------------------------------------------------
    // Navigation. Each returns whether the cursor moved.
    // ------------------------------------------------------------------------

    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.items.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.index > 0 && !self.items.is_empty() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn first(&mut self) -> bool {
        self.set_index(0)
    }

    pub fn last(&mut self) -> bool {
        match self.items.len().checked_sub(1) {
            Some(last) => self.set_index(last),
            None => false,
        }
    }

    /// Move to `index` when it addresses an entry
    pub fn jump_to(&mut self, index: usize) -> bool {
        self.set_index(index)
    }

    fn set_index(&mut self, index: usize) -> bool {
        if index >= self.items.len() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    // ------------------------------------------------------------------------
    // Display settings
    // ------------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.zoom_factor *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom_factor /= ZOOM_STEP;
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_factor = 1.0;
    }

    /// Returns whether the mode changed
    pub fn set_align_mode(&mut self, mode: AlignMode) -> bool {
        let changed = self.align_mode != mode;
        self.align_mode = mode;
        changed
    }

    /// Switch reading mode, dropping any retained continuous stack
    pub fn set_reading_mode(&mut self, mode: ReadingMode) -> bool {
        let changed = self.reading_mode != mode;
        self.reading_mode = mode;
        self.continuous = None;
        changed
    }

    /// Record a new viewport size; returns whether it changed
    pub fn set_viewport(&mut self, size: Size) -> bool {
        if self.viewport == size {
            return false;
        }
        if self.viewport.width != size.width {
            self.continuous = None;
        }
        self.viewport = size;
        true
    }

    /// Whether the current entry is drawn from the continuous stack
    pub fn shows_continuous(&self) -> bool {
        self.reading_mode == ReadingMode::Continuous && !self.fullscreen && self.current_is_image()
    }

    /// Placement of the current image given its pixel size
    pub fn page_layout(&self, image: Size) -> Result<ViewportRect, LayoutError> {
        if self.fullscreen {
            fullscreen_layout(image, self.screen, self.zoom_factor)
        } else {
            compute_layout(image, self.viewport, self.align_mode, self.zoom_factor)
        }
    }

    /// Continuous stack offset of the current image, when laid out
    pub fn continuous_offset(&self) -> Option<u32> {
        self.continuous
            .as_ref()
            .and_then(|layout| layout.offset_of(self.index))
    }
}
