//! Display setting update handlers (zoom, modes, fullscreen, surface size)

use crate::commands::Cmd;
use crate::messages::DisplayMsg;
use crate::model::ViewerState;

use super::render_request;

pub fn update_display(state: &mut ViewerState, msg: DisplayMsg) -> Option<Cmd> {
    match msg {
        DisplayMsg::ZoomIn => {
            state.zoom_in();
            Some(render_request(state))
        }

        DisplayMsg::ZoomOut => {
            state.zoom_out();
            Some(render_request(state))
        }

        DisplayMsg::ResetZoom => {
            state.reset_zoom();
            Some(render_request(state))
        }

        DisplayMsg::SetAlignMode(mode) => {
            if state.set_align_mode(mode) {
                Some(render_request(state))
            } else {
                None
            }
        }

        DisplayMsg::SetReadingMode(mode) => {
            state.set_reading_mode(mode);
            Some(render_request(state))
        }

        DisplayMsg::ToggleFullscreen => {
            if state.fullscreen {
                exit_fullscreen(state)
            } else {
                enter_fullscreen(state)
            }
        }

        DisplayMsg::ExitFullscreen => {
            if state.fullscreen {
                exit_fullscreen(state)
            } else {
                None
            }
        }

        DisplayMsg::ViewportResized(size) => {
            if state.set_viewport(size) && !state.fullscreen {
                Some(render_request(state))
            } else {
                None
            }
        }

        DisplayMsg::ScreenResized(size) => {
            if state.screen == size {
                return None;
            }
            state.screen = size;
            if state.fullscreen {
                Some(render_request(state))
            } else {
                None
            }
        }

        DisplayMsg::ContinuousLaidOut(layout) => {
            if layout.viewport_width() != state.viewport.width {
                // Stale: the viewport was resized while the stack was built
                tracing::debug!(
                    "Dropping continuous layout for width {} (viewport is {})",
                    layout.viewport_width(),
                    state.viewport.width
                );
                return None;
            }
            state.continuous = Some(layout);
            Some(render_request(state))
        }
    }
}

fn enter_fullscreen(state: &mut ViewerState) -> Option<Cmd> {
    if state.is_empty() {
        return None;
    }
    if !state.current_is_image() {
        return Some(Cmd::info("Fullscreen is only available for images"));
    }

    let mut cmds = Vec::new();
    if state.playing {
        state.playing = false;
        cmds.push(Cmd::StopPlayback);
    }
    state.fullscreen = true;
    cmds.push(Cmd::SetFullscreen(true));
    cmds.push(render_request(state));
    Cmd::batch(cmds)
}

fn exit_fullscreen(state: &mut ViewerState) -> Option<Cmd> {
    state.fullscreen = false;
    Cmd::batch(vec![Cmd::SetFullscreen(false), render_request(state)])
}
