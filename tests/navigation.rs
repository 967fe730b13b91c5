//! Tests for cursor movement, zoom and display settings through `update`

mod common;

use common::test_state;
use folio::commands::{Cmd, LAYOUT_RETRY_MS};
use folio::layout::{AlignMode, ContinuousLayout, Size};
use folio::messages::{DisplayMsg, Msg, NavMsg, VideoMsg};
use folio::model::{ReadingMode, ViewerState};
use folio::update::update;

fn nav(state: &mut ViewerState, msg: NavMsg) -> Option<Cmd> {
    update(state, Msg::Nav(msg))
}

fn display(state: &mut ViewerState, msg: DisplayMsg) -> Option<Cmd> {
    update(state, Msg::Display(msg))
}

const BOOK: &[&str] = &["1.png", "2.png", "3.png", "4.mp4"];

// ============================================================================
// Cursor
// ============================================================================

#[test]
fn test_next_and_previous() {
    let mut state = test_state(BOOK);
    assert_eq!(nav(&mut state, NavMsg::Next), Some(Cmd::Redraw));
    assert_eq!(state.index, 1);
    assert_eq!(nav(&mut state, NavMsg::Previous), Some(Cmd::Redraw));
    assert_eq!(state.index, 0);
}

#[test]
fn test_cursor_clamps_at_ends() {
    let mut state = test_state(BOOK);
    assert_eq!(nav(&mut state, NavMsg::Previous), None);
    assert_eq!(state.index, 0);

    nav(&mut state, NavMsg::Last);
    assert_eq!(state.index, 3);
    assert_eq!(nav(&mut state, NavMsg::Next), None);
    assert_eq!(state.index, 3);

    nav(&mut state, NavMsg::First);
    assert_eq!(state.index, 0);
}

#[test]
fn test_jump_to_ignores_out_of_range() {
    let mut state = test_state(BOOK);
    assert_eq!(nav(&mut state, NavMsg::JumpTo(2)), Some(Cmd::Redraw));
    assert_eq!(state.index, 2);
    assert_eq!(nav(&mut state, NavMsg::JumpTo(4)), None);
    assert_eq!(state.index, 2);
}

#[test]
fn test_navigation_on_empty_collection() {
    let mut state = test_state(&[]);
    for msg in [
        NavMsg::Next,
        NavMsg::Previous,
        NavMsg::First,
        NavMsg::Last,
        NavMsg::JumpTo(0),
    ] {
        assert_eq!(nav(&mut state, msg), None);
    }
    assert_eq!(state.index, 0);
    assert!(state.current().is_none());
}

#[test]
fn test_click_halves() {
    let mut state = test_state(BOOK);
    nav(&mut state, NavMsg::Click { x: 700 });
    assert_eq!(state.index, 1);
    nav(&mut state, NavMsg::Click { x: 100 });
    assert_eq!(state.index, 0);
}

#[test]
fn test_wheel_pages_in_page_mode() {
    let mut state = test_state(BOOK);
    nav(&mut state, NavMsg::Wheel { delta: -1, ctrl: false });
    assert_eq!(state.index, 1);
    nav(&mut state, NavMsg::Wheel { delta: 1, ctrl: false });
    assert_eq!(state.index, 0);
}

#[test]
fn test_ctrl_wheel_zooms() {
    let mut state = test_state(BOOK);
    nav(&mut state, NavMsg::Wheel { delta: 1, ctrl: true });
    assert!((state.zoom_factor - 1.2).abs() < 1e-9);
    assert_eq!(state.index, 0);
}

#[test]
fn test_wheel_scrolls_in_continuous_mode() {
    let mut state = test_state(BOOK);
    state.reading_mode = ReadingMode::Continuous;
    assert_eq!(
        nav(&mut state, NavMsg::Wheel { delta: -1, ctrl: false }),
        Some(Cmd::ScrollBy { units: 3 })
    );
    assert_eq!(
        nav(&mut state, NavMsg::Wheel { delta: 1, ctrl: false }),
        Some(Cmd::ScrollBy { units: -3 })
    );
    assert_eq!(state.index, 0);
}

// ============================================================================
// Playback and fullscreen side effects of moving
// ============================================================================

#[test]
fn test_moving_stops_playback() {
    let mut state = test_state(BOOK);
    nav(&mut state, NavMsg::Last);
    assert_eq!(
        update(&mut state, Msg::Video(VideoMsg::TogglePlayback)),
        Some(Cmd::StartPlayback("4.mp4".into()))
    );
    assert!(state.playing);

    let cmd = nav(&mut state, NavMsg::Previous).unwrap();
    assert!(!state.playing);
    assert_eq!(cmd.flatten(), vec![Cmd::StopPlayback, Cmd::Redraw]);
}

#[test]
fn test_playback_toggle_ignores_images() {
    let mut state = test_state(BOOK);
    assert_eq!(update(&mut state, Msg::Video(VideoMsg::TogglePlayback)), None);
    assert!(!state.playing);
}

#[test]
fn test_fullscreen_exits_when_reaching_video() {
    let mut state = test_state(BOOK);
    nav(&mut state, NavMsg::JumpTo(2));
    display(&mut state, DisplayMsg::ToggleFullscreen);
    assert!(state.fullscreen);

    let cmd = nav(&mut state, NavMsg::Next).unwrap();
    assert!(!state.fullscreen);
    assert!(cmd.flatten().contains(&Cmd::SetFullscreen(false)));
}

#[test]
fn test_fullscreen_refused_for_video() {
    let mut state = test_state(BOOK);
    nav(&mut state, NavMsg::Last);
    let cmd = display(&mut state, DisplayMsg::ToggleFullscreen);
    assert!(!state.fullscreen);
    assert!(matches!(cmd, Some(Cmd::Notify(_))));
}

#[test]
fn test_fullscreen_toggle_and_escape() {
    let mut state = test_state(BOOK);
    let cmd = display(&mut state, DisplayMsg::ToggleFullscreen).unwrap();
    assert!(state.fullscreen);
    assert_eq!(cmd.flatten(), vec![Cmd::SetFullscreen(true), Cmd::Redraw]);

    display(&mut state, DisplayMsg::ExitFullscreen);
    assert!(!state.fullscreen);
    assert_eq!(display(&mut state, DisplayMsg::ExitFullscreen), None);
}

#[test]
fn test_fullscreen_click_uses_screen_width() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::ToggleFullscreen);
    // Right half of the viewport, but left half of the 1920px screen
    nav(&mut state, NavMsg::Click { x: 700 });
    assert_eq!(state.index, 0);
    nav(&mut state, NavMsg::Click { x: 1500 });
    assert_eq!(state.index, 1);
}

// ============================================================================
// Zoom and alignment
// ============================================================================

#[test]
fn test_zoom_round_trip() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::ZoomIn);
    display(&mut state, DisplayMsg::ZoomIn);
    display(&mut state, DisplayMsg::ZoomOut);
    display(&mut state, DisplayMsg::ZoomOut);
    assert!((state.zoom_factor - 1.0).abs() < 1e-9);
}

#[test]
fn test_reset_zoom_is_exact() {
    let mut state = test_state(BOOK);
    for _ in 0..7 {
        display(&mut state, DisplayMsg::ZoomOut);
    }
    display(&mut state, DisplayMsg::ResetZoom);
    assert_eq!(state.zoom_factor, 1.0);
}

#[test]
fn test_zoom_survives_navigation() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::ZoomIn);
    nav(&mut state, NavMsg::Next);
    assert!((state.zoom_factor - 1.2).abs() < 1e-9);
}

#[test]
fn test_align_mode_change() {
    let mut state = test_state(BOOK);
    assert_eq!(
        display(&mut state, DisplayMsg::SetAlignMode(AlignMode::Fit)),
        Some(Cmd::Redraw)
    );
    assert_eq!(state.align_mode, AlignMode::Fit);
    assert_eq!(display(&mut state, DisplayMsg::SetAlignMode(AlignMode::Fit)), None);
}

#[test]
fn test_unmeasured_viewport_defers_drawing() {
    let mut state = test_state(BOOK);
    state.viewport = Size::new(1, 1);
    assert_eq!(
        display(&mut state, DisplayMsg::ZoomIn),
        Some(Cmd::RetryLayout {
            delay_ms: LAYOUT_RETRY_MS
        })
    );
}

// ============================================================================
// Continuous mode
// ============================================================================

fn laid_out(state: &ViewerState) -> ContinuousLayout {
    let sizes = vec![Some(Size::new(100, 100)); state.items.image_count()];
    ContinuousLayout::build(&sizes, state.viewport.width).unwrap()
}

#[test]
fn test_continuous_mode_requests_layout() {
    let mut state = test_state(BOOK);
    assert_eq!(
        display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous)),
        Some(Cmd::LayoutContinuous)
    );

    let layout = laid_out(&state);
    let cmd = display(&mut state, DisplayMsg::ContinuousLaidOut(layout)).unwrap();
    assert_eq!(cmd.flatten(), vec![Cmd::ScrollTo { offset: 0 }, Cmd::Redraw]);
}

#[test]
fn test_continuous_navigation_scrolls_to_image() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous));
    let layout = laid_out(&state);
    let offset = layout.offset_of(2).unwrap();
    display(&mut state, DisplayMsg::ContinuousLaidOut(layout));

    let cmd = nav(&mut state, NavMsg::JumpTo(2)).unwrap();
    assert_eq!(cmd.flatten(), vec![Cmd::ScrollTo { offset }, Cmd::Redraw]);
}

#[test]
fn test_switching_mode_drops_cached_layout() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous));
    let layout = laid_out(&state);
    display(&mut state, DisplayMsg::ContinuousLaidOut(layout));
    assert!(state.continuous.is_some());

    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Page));
    assert!(state.continuous.is_none());
    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous));
    assert!(state.continuous.is_none());
}

#[test]
fn test_resize_drops_layout_for_old_width() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous));
    let layout = laid_out(&state);
    display(&mut state, DisplayMsg::ContinuousLaidOut(layout.clone()));

    // Height-only change keeps the stack
    display(&mut state, DisplayMsg::ViewportResized(Size::new(800, 900)));
    assert!(state.continuous.is_some());

    assert_eq!(
        display(&mut state, DisplayMsg::ViewportResized(Size::new(640, 900))),
        Some(Cmd::LayoutContinuous)
    );
    assert!(state.continuous.is_none());

    // A stack built for the old width arrives late and is ignored
    assert_eq!(display(&mut state, DisplayMsg::ContinuousLaidOut(layout)), None);
    assert!(state.continuous.is_none());
}

#[test]
fn test_continuous_wheel_scrolls_without_moving_cursor() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous));
    let layout = laid_out(&state);
    display(&mut state, DisplayMsg::ContinuousLaidOut(layout));
    nav(&mut state, NavMsg::JumpTo(2));

    assert_eq!(
        nav(&mut state, NavMsg::Wheel { delta: 1, ctrl: false }),
        Some(Cmd::ScrollBy { units: -3 })
    );
    assert_eq!(state.index, 2);
}

#[test]
fn test_video_in_continuous_mode_uses_page_display() {
    let mut state = test_state(BOOK);
    display(&mut state, DisplayMsg::SetReadingMode(ReadingMode::Continuous));
    assert_eq!(nav(&mut state, NavMsg::Last), Some(Cmd::Redraw));
    assert!(!state.shows_continuous());
}
