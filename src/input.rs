//! Keyboard bindings
//!
//! Maps the keys a presentation shell reports to reader messages. Mouse
//! clicks and wheel events carry positions and are sent as
//! [`NavMsg::Click`] and [`NavMsg::Wheel`] directly.

use crate::messages::{DisplayMsg, Msg, NavMsg, VideoMsg};

/// Keys the reader responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    F11,
    Escape,
    Space,
    /// A printable character, as typed
    Char(char),
}

/// Message bound to `key`, if any
pub fn key_to_msg(key: Key) -> Option<Msg> {
    let msg = match key {
        Key::Left | Key::Up | Key::Char('a') | Key::Char('w') => Msg::Nav(NavMsg::Previous),
        Key::Right | Key::Down | Key::Char('d') | Key::Char('s') => Msg::Nav(NavMsg::Next),
        Key::Home => Msg::Nav(NavMsg::First),
        Key::End => Msg::Nav(NavMsg::Last),
        Key::Char('+') | Key::Char('=') => Msg::Display(DisplayMsg::ZoomIn),
        Key::Char('-') => Msg::Display(DisplayMsg::ZoomOut),
        Key::Char('0') => Msg::Display(DisplayMsg::ResetZoom),
        Key::F11 => Msg::Display(DisplayMsg::ToggleFullscreen),
        Key::Escape => Msg::Display(DisplayMsg::ExitFullscreen),
        Key::Space => Msg::Video(VideoMsg::TogglePlayback),
        Key::Char(_) => return None,
    };
    Some(msg)
}
