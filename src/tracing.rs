//! Logging setup
//!
//! Console output honours `RUST_LOG`, for example:
//! - `RUST_LOG=folio::collector=debug` to see what each scan skipped
//! - `RUST_LOG=folio::video=trace` for frame-level playback logs
//!
//! A second layer writes debug-level logs for this crate to
//! `<config dir>/logs/folio.log.YYYY-MM-DD`, rotated daily.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::{ensure_logs_dir, LOG_FILE_PREFIX};

/// Install the console and file layers
///
/// Without `RUST_LOG` the console shows warnings and errors only, or debug
/// output when `verbose` is set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stderr, so `list --json` output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(console_filter);

    let file_layer = match ensure_logs_dir() {
        Ok(logs_dir) => Some(
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new("folio=debug")),
        ),
        Err(e) => {
            eprintln!("warning: file logging disabled: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
