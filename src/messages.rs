//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::collector::{ScanOutcome, ScanRequest};
use crate::layout::{AlignMode, ContinuousLayout, Size};
use crate::model::ReadingMode;

/// Cursor movement through the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMsg {
    Next,
    Previous,
    First,
    Last,
    /// Jump to a position (thumbnail click)
    JumpTo(usize),
    /// Click on the display area: left half goes back, right half forward
    Click { x: u32 },
    /// Mouse wheel; positive delta scrolls up
    Wheel { delta: i32, ctrl: bool },
}

/// Zoom, alignment, reading mode and surface changes
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayMsg {
    ZoomIn,
    ZoomOut,
    /// Back to the aligned size (zoom factor 1.0)
    ResetZoom,
    SetAlignMode(AlignMode),
    SetReadingMode(ReadingMode),
    ToggleFullscreen,
    ExitFullscreen,
    /// Display area measured or resized
    ViewportResized(Size),
    /// Fullscreen surface measured
    ScreenResized(Size),
    /// Continuous stack computed for the current collection
    ContinuousLaidOut(ContinuousLayout),
}

/// Directory selection and scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryMsg {
    /// User picked a new library root
    SelectRoot(PathBuf),
    /// User picked a directory in the tree
    SelectDirectory(PathBuf),
    /// Load everything below the current directory
    ScanRecursive,
    /// Load every sibling that comes after the current directory
    ScanSubsequent,
    /// Re-run the last scan
    Refresh,
    /// Watched directory changed on disk
    FilesChanged,
    /// A scan finished
    Loaded {
        request: ScanRequest,
        outcome: ScanOutcome,
    },
    /// A scan could not read its starting directory
    ScanFailed { request: ScanRequest, message: String },
}

/// Video playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoMsg {
    TogglePlayback,
    /// The stream ended
    Finished,
    /// The decoder could not be started or failed mid-stream
    Failed(String),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Nav(NavMsg),
    Display(DisplayMsg),
    Library(LibraryMsg),
    Video(VideoMsg),
}
