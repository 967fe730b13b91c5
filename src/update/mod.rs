//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod display;
mod library;
mod navigation;
mod video;

use crate::commands::{Cmd, LAYOUT_RETRY_MS};
use crate::messages::Msg;
use crate::model::ViewerState;

pub use display::update_display;
pub use library::update_library;
pub use navigation::update_nav;
pub use video::update_video;

/// Main update function - dispatches to sub-handlers
pub fn update(state: &mut ViewerState, msg: Msg) -> Option<Cmd> {
    let _span = tracing::debug_span!("update", msg = %msg_type_name(&msg)).entered();

    let result = match msg {
        Msg::Nav(m) => navigation::update_nav(state, m),
        Msg::Display(m) => display::update_display(state, m),
        Msg::Library(m) => library::update_library(state, m),
        Msg::Video(m) => video::update_video(state, m),
    };

    if let Some(cmd) = &result {
        tracing::trace!(?cmd, index = state.index, "update produced command");
    }
    result
}

/// What to do so the current entry appears on screen
///
/// Continuous mode needs a stack for the current viewport width before it
/// can scroll; page mode needs a measured surface.
pub(crate) fn render_request(state: &ViewerState) -> Cmd {
    if state.is_empty() {
        return Cmd::Redraw;
    }

    if state.shows_continuous() {
        if state.viewport.width <= 1 {
            return Cmd::RetryLayout {
                delay_ms: LAYOUT_RETRY_MS,
            };
        }
        return match state.continuous_offset() {
            Some(offset) => Cmd::Batch(vec![Cmd::ScrollTo { offset }, Cmd::Redraw]),
            None if state.continuous.is_some() => Cmd::Redraw,
            None => Cmd::LayoutContinuous,
        };
    }

    let surface = if state.fullscreen {
        state.screen
    } else {
        state.viewport
    };
    if surface.is_measured() {
        Cmd::Redraw
    } else {
        Cmd::RetryLayout {
            delay_ms: LAYOUT_RETRY_MS,
        }
    }
}

/// Bookkeeping after the cursor lands on a different entry
///
/// Playback belongs to the entry it was started on, and fullscreen only
/// shows images.
pub(crate) fn after_move(state: &mut ViewerState) -> Option<Cmd> {
    let mut cmds = Vec::new();

    if state.playing {
        state.playing = false;
        cmds.push(Cmd::StopPlayback);
    }

    if state.fullscreen && state.current_is_video() {
        tracing::debug!("Cursor reached a video, leaving fullscreen");
        state.fullscreen = false;
        cmds.push(Cmd::SetFullscreen(false));
    }

    cmds.push(render_request(state));
    Cmd::batch(cmds)
}

/// Get a display name for a message type
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Nav(m) => format!("Nav::{:?}", m),
        Msg::Display(m) => match m {
            // The layout payload is large; keep the log line short
            crate::messages::DisplayMsg::ContinuousLaidOut(layout) => format!(
                "Display::ContinuousLaidOut({} slots)",
                layout.slots().len()
            ),
            other => format!("Display::{:?}", other),
        },
        Msg::Library(m) => match m {
            crate::messages::LibraryMsg::Loaded { request, .. } => {
                format!("Library::Loaded({:?})", request)
            }
            other => format!("Library::{:?}", other),
        },
        Msg::Video(m) => format!("Video::{:?}", m),
    }
}
