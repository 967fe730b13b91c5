//! Video playback update handlers
//!
//! The playback task never touches the model; it reports back through
//! these messages.

use crate::commands::Cmd;
use crate::messages::VideoMsg;
use crate::model::ViewerState;

pub fn update_video(state: &mut ViewerState, msg: VideoMsg) -> Option<Cmd> {
    match msg {
        VideoMsg::TogglePlayback => {
            let path = state.current().filter(|e| e.is_video())?.path().to_path_buf();
            if state.playing {
                state.playing = false;
                Cmd::batch(vec![Cmd::StopPlayback, Cmd::Redraw])
            } else {
                state.playing = true;
                Some(Cmd::StartPlayback(path))
            }
        }

        VideoMsg::Finished => {
            if !state.playing {
                return None;
            }
            state.playing = false;
            Cmd::batch(vec![Cmd::StopPlayback, Cmd::Redraw])
        }

        VideoMsg::Failed(message) => {
            let was_playing = std::mem::replace(&mut state.playing, false);
            let mut cmds = Vec::new();
            if was_playing {
                cmds.push(Cmd::StopPlayback);
            }
            cmds.push(Cmd::error(format!("Failed to play video: {}", message)));
            Cmd::batch(cmds)
        }
    }
}
