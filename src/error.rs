//! Errors that reach the user-facing boundary
//!
//! Failures local to one file or one subdirectory are logged and skipped by
//! the collector; only failures on the directory the user picked surface
//! here.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to enumerate the directory a scan was started on
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Map an I/O error raised while opening `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::Unreadable { path, .. } => path,
        }
    }

    /// Short message suitable for a status line or dialog
    pub fn user_message(&self) -> String {
        let name = crate::media::file_name(self.path());
        match self {
            Self::NotFound { .. } => format!("Directory not found: {}", name),
            Self::NotADirectory { .. } => format!("Not a directory: {}", name),
            Self::Unreadable { source, .. } => {
                format!("Failed to load directory {}: {}", name, source)
            }
        }
    }
}
