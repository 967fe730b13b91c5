//! Tests for directory selection, scan results and refresh

mod common;

use std::path::PathBuf;

use common::{collection_of, test_state};
use folio::collector::{ScanOutcome, ScanRequest};
use folio::commands::{Cmd, Notice, NoticeLevel};
use folio::messages::{DisplayMsg, LibraryMsg, Msg, NavMsg, VideoMsg};
use folio::model::ViewerState;
use folio::update::update;

fn library(state: &mut ViewerState, msg: LibraryMsg) -> Option<Cmd> {
    update(state, Msg::Library(msg))
}

fn loaded(request: ScanRequest, names: &[&str], directories: usize) -> LibraryMsg {
    LibraryMsg::Loaded {
        request,
        outcome: ScanOutcome::Loaded {
            collection: collection_of(names),
            directories,
        },
    }
}

fn notices(cmd: Option<Cmd>) -> Vec<Notice> {
    cmd.map(Cmd::flatten)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|cmd| match cmd {
            Cmd::Notify(notice) => Some(notice),
            _ => None,
        })
        .collect()
}

#[test]
fn test_select_root_loads_tree_and_scans() {
    let mut state = ViewerState::default();
    let root = PathBuf::from("/library");
    let cmd = library(&mut state, LibraryMsg::SelectRoot(root.clone())).unwrap();
    assert_eq!(
        cmd.flatten(),
        vec![
            Cmd::LoadTree(root.clone()),
            Cmd::Scan(ScanRequest::Directory(root.clone())),
        ]
    );
    assert_eq!(state.root_directory, Some(root.clone()));
    assert_eq!(state.current_directory, Some(root));
}

#[test]
fn test_select_directory_scans_it() {
    let mut state = ViewerState::default();
    let dir = PathBuf::from("/library/vol2");
    assert_eq!(
        library(&mut state, LibraryMsg::SelectDirectory(dir.clone())),
        Some(Cmd::Scan(ScanRequest::Directory(dir)))
    );
}

#[test]
fn test_recursive_needs_a_directory() {
    let mut state = ViewerState::default();
    let found = notices(library(&mut state, LibraryMsg::ScanRecursive));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].level, NoticeLevel::Warning);

    state.current_directory = Some(PathBuf::from("/library"));
    assert_eq!(
        library(&mut state, LibraryMsg::ScanRecursive),
        Some(Cmd::Scan(ScanRequest::Recursive(PathBuf::from("/library"))))
    );
}

#[test]
fn test_subsequent_scan_uses_parent_directory() {
    let mut state = ViewerState::default();
    state.root_directory = Some(PathBuf::from("/library"));
    state.current_directory = Some(PathBuf::from("/library/2024-01-01"));
    assert_eq!(
        library(&mut state, LibraryMsg::ScanSubsequent),
        Some(Cmd::Scan(ScanRequest::SubsequentSiblings {
            current: PathBuf::from("/library/2024-01-01"),
            parent: PathBuf::from("/library"),
        }))
    );
}

#[test]
fn test_loaded_replaces_collection_and_resets_cursor() {
    let mut state = test_state(&["1.png", "2.png", "3.png"]);
    update(&mut state, Msg::Nav(NavMsg::Last));

    let request = ScanRequest::Directory(PathBuf::from("/other"));
    let cmd = library(&mut state, loaded(request.clone(), &["7.png", "8.png"], 1));
    assert_eq!(cmd, Some(Cmd::Redraw));
    assert_eq!(state.index, 0);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.source, Some(request));
}

#[test]
fn test_loaded_empty_collection() {
    let mut state = test_state(&["1.png"]);
    let cmd = library(
        &mut state,
        loaded(ScanRequest::Directory(PathBuf::from("/empty")), &[], 1),
    );
    assert_eq!(cmd, Some(Cmd::Redraw));
    assert!(state.is_empty());
    assert!(state.current().is_none());
}

#[test]
fn test_sibling_scan_reports_directory_count() {
    let mut state = ViewerState::default();
    let request = ScanRequest::SubsequentSiblings {
        current: PathBuf::from("/library/a"),
        parent: PathBuf::from("/library"),
    };
    let found = notices(library(&mut state, loaded(request, &["1.png"], 3)));
    assert_eq!(
        found,
        vec![Notice::info("Loaded content from 3 subsequent directories")]
    );
}

#[test]
fn test_sibling_scan_edge_outcomes_keep_collection() {
    let mut state = test_state(&["1.png", "2.png"]);
    update(&mut state, Msg::Nav(NavMsg::Next));
    let request = ScanRequest::SubsequentSiblings {
        current: PathBuf::from("/library/z"),
        parent: PathBuf::from("/library"),
    };

    let none_after = notices(library(
        &mut state,
        LibraryMsg::Loaded {
            request: request.clone(),
            outcome: ScanOutcome::NoneAfter,
        },
    ));
    assert_eq!(none_after, vec![Notice::info("No subsequent directories")]);

    let not_found = notices(library(
        &mut state,
        LibraryMsg::Loaded {
            request,
            outcome: ScanOutcome::CurrentNotFound,
        },
    ));
    assert_eq!(not_found.len(), 1);
    assert_eq!(not_found[0].level, NoticeLevel::Warning);

    assert_eq!(state.items.len(), 2);
    assert_eq!(state.index, 1);
}

#[test]
fn test_scan_failure_is_an_error_notice() {
    let mut state = test_state(&["1.png"]);
    let found = notices(library(
        &mut state,
        LibraryMsg::ScanFailed {
            request: ScanRequest::Directory(PathBuf::from("/gone")),
            message: "Directory not found: gone".to_string(),
        },
    ));
    assert_eq!(found, vec![Notice::error("Directory not found: gone")]);
    assert_eq!(state.items.len(), 1);
}

#[test]
fn test_loading_stops_playback_and_fullscreen_on_video() {
    let mut state = test_state(&["1.mp4"]);
    update(&mut state, Msg::Video(VideoMsg::TogglePlayback));
    assert!(state.playing);

    let cmd = library(
        &mut state,
        loaded(ScanRequest::Directory(PathBuf::from("/clips")), &["2.mp4"], 1),
    )
    .unwrap();
    assert!(!state.playing);
    assert_eq!(cmd.flatten().first(), Some(&Cmd::StopPlayback));
}

#[test]
fn test_fullscreen_survives_reload_onto_image() {
    let mut state = test_state(&["1.png"]);
    update(&mut state, Msg::Display(DisplayMsg::ToggleFullscreen));
    library(
        &mut state,
        loaded(ScanRequest::Directory(PathBuf::from("/next")), &["5.png"], 1),
    );
    assert!(state.fullscreen);
}

#[test]
fn test_refresh_repeats_last_scan() {
    let mut state = ViewerState::default();
    let found = notices(library(&mut state, LibraryMsg::Refresh));
    assert_eq!(found[0].level, NoticeLevel::Warning);
    assert_eq!(library(&mut state, LibraryMsg::FilesChanged), None);

    let request = ScanRequest::Recursive(PathBuf::from("/library"));
    library(&mut state, loaded(request.clone(), &["1.png"], 2));
    assert_eq!(
        library(&mut state, LibraryMsg::Refresh),
        Some(Cmd::Scan(request.clone()))
    );
    assert_eq!(
        library(&mut state, LibraryMsg::FilesChanged),
        Some(Cmd::Scan(request))
    );
}

#[test]
fn test_rescan_keeps_cursor_on_same_file() {
    let mut state = ViewerState::default();
    state.viewport = folio::layout::Size::new(800, 600);
    let request = ScanRequest::Directory(PathBuf::from("dir"));
    library(&mut state, loaded(request.clone(), &["1.png", "2.png", "3.png"], 1));
    update(&mut state, Msg::Nav(NavMsg::JumpTo(1)));

    // "0.png" appeared; "2.png" is now third
    library(
        &mut state,
        loaded(request, &["0.png", "1.png", "2.png", "3.png"], 1),
    );
    assert_eq!(state.index, 2);
    assert_eq!(state.current().unwrap().file_name(), "2.png");
}
