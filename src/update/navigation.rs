//! Navigation update handlers

use crate::commands::Cmd;
use crate::messages::NavMsg;
use crate::model::{ReadingMode, ViewerState};

use super::after_move;

/// Wheel units scrolled per notch in continuous mode
const WHEEL_SCROLL_UNITS: i32 = 3;

pub fn update_nav(state: &mut ViewerState, msg: NavMsg) -> Option<Cmd> {
    match msg {
        NavMsg::Next => moved(state, ViewerState::next),
        NavMsg::Previous => moved(state, ViewerState::previous),
        NavMsg::First => moved(state, ViewerState::first),
        NavMsg::Last => moved(state, ViewerState::last),
        NavMsg::JumpTo(index) => moved(state, |s| s.jump_to(index)),

        NavMsg::Click { x } => {
            let width = if state.fullscreen {
                state.screen.width
            } else {
                state.viewport.width
            };
            if (x as f64) < width as f64 / 2.0 {
                moved(state, ViewerState::previous)
            } else {
                moved(state, ViewerState::next)
            }
        }

        NavMsg::Wheel { delta, ctrl } => {
            if delta == 0 {
                return None;
            }
            if ctrl {
                if delta > 0 {
                    state.zoom_in();
                } else {
                    state.zoom_out();
                }
                return Some(super::render_request(state));
            }
            if state.reading_mode == ReadingMode::Continuous && !state.fullscreen {
                let units = if delta > 0 {
                    -WHEEL_SCROLL_UNITS
                } else {
                    WHEEL_SCROLL_UNITS
                };
                return Some(Cmd::ScrollBy { units });
            }
            if delta > 0 {
                moved(state, ViewerState::previous)
            } else {
                moved(state, ViewerState::next)
            }
        }
    }
}

fn moved(state: &mut ViewerState, step: impl FnOnce(&mut ViewerState) -> bool) -> Option<Cmd> {
    if step(state) {
        tracing::debug!(index = state.index, "Cursor moved");
        after_move(state)
    } else {
        None
    }
}
