//! folio - comic-style reader core for image and video directories
//!
//! Directories are scanned into an ordered [`Collection`] of images and
//! videos. A [`ViewerState`] tracks the cursor and display settings and is
//! changed only by the Elm-style [`update::update`] function, which returns
//! [`Cmd`]s for the [`runtime::Reader`] to execute.

pub mod cli;
pub mod collector;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod fs_watcher;
pub mod image;
pub mod input;
pub mod layout;
pub mod media;
pub mod messages;
pub mod model;
pub mod ordering;
pub mod runtime;
pub mod tracing;
pub mod tree;
pub mod update;
pub mod video;

// Re-export commonly used types
pub use collector::{Collection, ScanOutcome, ScanRequest};
pub use commands::Cmd;
pub use config::ReaderConfig;
pub use media::{MediaEntry, MediaKind};
pub use messages::Msg;
pub use model::ViewerState;
