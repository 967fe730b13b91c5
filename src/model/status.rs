//! Status line text
//!
//! Mirrors what the reader shows under the page: entry kind, position,
//! file name, zoom, and overall progress.

use super::ViewerState;

/// Text for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// e.g. "Image 3/12 | 003.jpg | Zoom: 120%"
    pub text: String,
    /// e.g. "Progress: 25.0%" (empty when there is nothing loaded)
    pub progress: String,
}

impl StatusLine {
    pub fn from_state(state: &ViewerState) -> Self {
        let total = state.items.len();
        let Some(entry) = state.current() else {
            return Self {
                text: "No files".to_string(),
                progress: String::new(),
            };
        };

        let position = state.index + 1;
        let zoom_percent = (state.zoom_factor * 100.0) as u64;
        let text = format!(
            "{} {}/{} | {} | Zoom: {}%",
            entry.kind().label(),
            position,
            total,
            entry.file_name(),
            zoom_percent
        );

        let progress = position as f64 / total as f64 * 100.0;
        Self {
            text,
            progress: format!("Progress: {:.1}%", progress),
        }
    }
}

/// Caption drawn at the bottom of the fullscreen surface: "3/10 - name"
///
/// Counts images only, since fullscreen never shows videos.
pub fn fullscreen_caption(state: &ViewerState) -> Option<String> {
    let entry = state.current().filter(|e| e.is_image())?;
    Some(format!(
        "{}/{} - {}",
        state.index + 1,
        state.items.image_count(),
        entry.file_name()
    ))
}
