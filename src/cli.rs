//! Command-line argument parsing
//!
//! Supports:
//! - Listing a directory's media in reading order (optionally watching it)
//! - Printing the directory tree below a library root
//! - Rendering what the display area would show to a PNG
//! - Rendering the thumbnail column to a PNG

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::collector::ScanRequest;
use crate::layout::{AlignMode, Size};
use crate::model::ReadingMode;

/// A comic-style reader for directories of images and video clips
#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "A comic-style reader for image and video directories")]
pub struct CliArgs {
    /// Show debug logs on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List media in reading order
    List(ListArgs),
    /// Print the directory tree below a root
    Tree {
        /// Library root
        #[arg(value_name = "ROOT")]
        root: PathBuf,
    },
    /// Render the display area for one entry to a PNG file
    Render(RenderArgs),
    /// Render the thumbnail column to a PNG file
    Thumbs(ThumbsArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory to scan
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Include every subdirectory, ordered by the dates in their paths
    #[arg(short, long, conflicts_with = "after")]
    pub recursive: bool,

    /// Load the siblings of DIR under PARENT that come after it
    #[arg(long, value_name = "PARENT")]
    pub after: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Keep running and print the listing again whenever it changes
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory to scan
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Include every subdirectory
    #[arg(short, long)]
    pub recursive: bool,

    /// Entry to show (0-based)
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Display area size
    #[arg(long, value_name = "WxH", default_value = "1200x900", value_parser = parse_size)]
    pub size: Size,

    /// Alignment (defaults to the configured one)
    #[arg(long, value_enum)]
    pub align: Option<AlignArg>,

    /// Reading mode (defaults to the configured one)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Zoom steps: positive zooms in, negative zooms out
    #[arg(long, value_name = "K", default_value_t = 0, allow_negative_numbers = true)]
    pub zoom_steps: i32,

    /// Render as the fullscreen surface
    #[arg(long)]
    pub fullscreen: bool,

    /// Output PNG path
    #[arg(short, long, value_name = "OUT")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ThumbsArgs {
    /// Directory to scan
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Include every subdirectory
    #[arg(short, long)]
    pub recursive: bool,

    /// Entry to highlight (0-based)
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Output PNG path
    #[arg(short, long, value_name = "OUT")]
    pub output: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignArg {
    Width,
    Height,
    Fit,
}

impl From<AlignArg> for AlignMode {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Width => AlignMode::Width,
            AlignArg::Height => AlignMode::Height,
            AlignArg::Fit => AlignMode::Fit,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Page,
    Continuous,
}

impl From<ModeArg> for ReadingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Page => ReadingMode::Page,
            ModeArg::Continuous => ReadingMode::Continuous,
        }
    }
}

impl ListArgs {
    /// Scan described by the flags
    pub fn scan_request(&self) -> ScanRequest {
        match &self.after {
            Some(parent) => ScanRequest::SubsequentSiblings {
                current: self.dir.clone(),
                parent: parent.clone(),
            },
            None => directory_request(&self.dir, self.recursive),
        }
    }
}

impl RenderArgs {
    pub fn scan_request(&self) -> ScanRequest {
        directory_request(&self.dir, self.recursive)
    }
}

impl ThumbsArgs {
    pub fn scan_request(&self) -> ScanRequest {
        directory_request(&self.dir, self.recursive)
    }
}

fn directory_request(dir: &std::path::Path, recursive: bool) -> ScanRequest {
    if recursive {
        ScanRequest::Recursive(dir.to_path_buf())
    } else {
        ScanRequest::Directory(dir.to_path_buf())
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `1200x900`
pub fn parse_size(text: &str) -> Result<Size, String> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", text))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", w))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{}'", h))?;
    if width <= 1 || height <= 1 {
        return Err(format!("size {}x{} is too small", width, height));
    }
    Ok(Size::new(width, height))
}
