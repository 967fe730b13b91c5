//! Library update handlers: directory selection, scans and refresh

use crate::collector::{sibling_parent, ScanOutcome, ScanRequest};
use crate::commands::Cmd;
use crate::messages::LibraryMsg;
use crate::model::ViewerState;

use super::render_request;

pub fn update_library(state: &mut ViewerState, msg: LibraryMsg) -> Option<Cmd> {
    match msg {
        LibraryMsg::SelectRoot(root) => {
            state.root_directory = Some(root.clone());
            state.current_directory = Some(root.clone());
            Cmd::batch(vec![
                Cmd::LoadTree(root.clone()),
                Cmd::Scan(ScanRequest::Directory(root)),
            ])
        }

        LibraryMsg::SelectDirectory(dir) => {
            state.current_directory = Some(dir.clone());
            Some(Cmd::Scan(ScanRequest::Directory(dir)))
        }

        LibraryMsg::ScanRecursive => match &state.current_directory {
            Some(dir) => Some(Cmd::Scan(ScanRequest::Recursive(dir.clone()))),
            None => Some(Cmd::warning("Select a directory first")),
        },

        LibraryMsg::ScanSubsequent => {
            let (Some(current), Some(root)) = (&state.current_directory, &state.root_directory)
            else {
                return Some(Cmd::warning("Select a root directory first"));
            };
            let parent = sibling_parent(current, root);
            Some(Cmd::Scan(ScanRequest::SubsequentSiblings {
                current: current.clone(),
                parent,
            }))
        }

        LibraryMsg::Refresh => match refresh_request(state) {
            Some(request) => Some(Cmd::Scan(request)),
            None => Some(Cmd::warning("Select a directory first")),
        },

        LibraryMsg::FilesChanged => refresh_request(state).map(Cmd::Scan),

        LibraryMsg::Loaded { request, outcome } => match outcome {
            ScanOutcome::Loaded {
                collection,
                directories,
            } => {
                let was_playing = state.playing;
                let sibling_scan = matches!(request, ScanRequest::SubsequentSiblings { .. });
                // A rescan of the same source keeps the cursor on the same file
                let keep = (state.source.as_ref() == Some(&request))
                    .then(|| state.current().map(|e| e.path().to_path_buf()))
                    .flatten();

                tracing::info!(
                    "Loaded {} images and {} videos from {} directories",
                    collection.image_count(),
                    collection.video_count(),
                    directories
                );
                state.load(collection, request);
                if let Some(index) = keep.and_then(|path| state.items.position_of(&path)) {
                    state.index = index;
                }

                let mut cmds = Vec::new();
                if was_playing {
                    cmds.push(Cmd::StopPlayback);
                }
                if state.fullscreen && !state.current_is_image() {
                    state.fullscreen = false;
                    cmds.push(Cmd::SetFullscreen(false));
                }
                if sibling_scan {
                    cmds.push(Cmd::info(format!(
                        "Loaded content from {} subsequent directories",
                        directories
                    )));
                }
                cmds.push(render_request(state));
                Cmd::batch(cmds)
            }
            ScanOutcome::CurrentNotFound => Some(Cmd::warning(
                "Cannot locate the current directory among its siblings",
            )),
            ScanOutcome::NoneAfter => Some(Cmd::info("No subsequent directories")),
        },

        LibraryMsg::ScanFailed { request, message } => {
            tracing::warn!("Scan {:?} failed: {}", request, message);
            Some(Cmd::error(message))
        }
    }
}

/// Scan to repeat on refresh: the last one, or the current directory
fn refresh_request(state: &ViewerState) -> Option<ScanRequest> {
    state.source.clone().or_else(|| {
        state
            .current_directory
            .clone()
            .map(ScanRequest::Directory)
    })
}
