//! Where folio keeps its files
//!
//! - Unix/macOS: `$XDG_CONFIG_HOME/folio/` or `~/.config/folio/`
//! - Windows: `%APPDATA%\folio\`
//!
//! The reader only reads `config.yaml`; the `logs/` directory is the one
//! thing it creates.

use std::{env, fs, io, path::PathBuf};

const APP_DIR: &str = "folio";

/// Log file prefix; the daily appender adds a `.YYYY-MM-DD` suffix
pub const LOG_FILE_PREFIX: &str = "folio.log";

/// Base config directory, `None` when no home directory can be found
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `<config dir>/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `<config dir>/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no config directory available")
    })?;
    fs::create_dir_all(&logs)?;
    Ok(logs)
}
