//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;

use crate::collector::ScanRequest;

/// Delay before re-attempting a layout against an unmeasured viewport
pub const LAYOUT_RETRY_MS: u64 = 100;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user (dialog, toast or status line)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Side effects requested by an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Redraw the display area (and thumbnails, status line)
    Redraw,
    /// Run a directory scan; the result comes back as `LibraryMsg::Loaded`
    Scan(ScanRequest),
    /// Rebuild the directory tree for a new root
    LoadTree(PathBuf),
    /// (Re)build the continuous stack; comes back as `DisplayMsg::ContinuousLaidOut`
    LayoutContinuous,
    /// Scroll the continuous strip so that `offset` is at the top
    ScrollTo { offset: u32 },
    /// Scroll the continuous strip by wheel units (negative is up)
    ScrollBy { units: i32 },
    /// Viewport not measured yet; try the render again after a delay
    RetryLayout { delay_ms: u64 },
    /// Start decoding and presenting the video at `path`
    StartPlayback(PathBuf),
    /// Cancel playback and release the decoder
    StopPlayback,
    /// Enter or leave fullscreen on the display surface
    SetFullscreen(bool),
    /// Show a message to the user
    Notify(Notice),
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine commands; a single command is returned unwrapped
    pub fn batch(mut cmds: Vec<Cmd>) -> Option<Self> {
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Cmd::Notify(Notice::info(text))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Cmd::Notify(Notice::warning(text))
    }

    pub fn error(text: impl Into<String>) -> Self {
        Cmd::Notify(Notice::error(text))
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw | Cmd::ScrollTo { .. } | Cmd::ScrollBy { .. } | Cmd::SetFullscreen(_) => {
                true
            }
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::needs_redraw),
            // Scans, layout and playback redraw through the messages they produce
            Cmd::Scan(_)
            | Cmd::LoadTree(_)
            | Cmd::LayoutContinuous
            | Cmd::RetryLayout { .. }
            | Cmd::StartPlayback(_)
            | Cmd::StopPlayback
            | Cmd::Notify(_) => false,
        }
    }

    /// Flatten nested batches into a list, in execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}
