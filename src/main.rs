use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use folio::cli::{CliArgs, Command, ListArgs, RenderArgs, ThumbsArgs};
use folio::commands::{Notice, NoticeLevel};
use folio::image::render::render_thumbnail_strip;
use folio::image::{format_file_size, format_name};
use folio::messages::{DisplayMsg, Msg, NavMsg};
use folio::runtime::Reader;
use folio::tree::DirTree;
use folio::ReaderConfig;

/// How often `list --watch` checks for changes
const WATCH_POLL: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let args = CliArgs::parse();
    folio::tracing::init(args.verbose);

    let config = ReaderConfig::load();

    match args.command {
        Command::List(list) => run_list(config, list),
        Command::Tree { root } => {
            let tree = DirTree::from_root(&root)
                .with_context(|| format!("Failed to read {}", root.display()))?;
            println!("{}", tree.outline());
            Ok(())
        }
        Command::Render(render) => run_render(config, render),
        Command::Thumbs(thumbs) => run_thumbs(config, thumbs),
    }
}

fn run_list(config: ReaderConfig, args: ListArgs) -> Result<()> {
    let mut reader = Reader::new(config);
    reader.open(args.scan_request());
    let failed = report_notices(&mut reader);
    if failed && reader.state().is_empty() {
        bail!("Nothing to list");
    }
    print_listing(&reader, args.json)?;

    if !args.watch {
        return Ok(());
    }

    reader.set_watching(true);
    let mut shown = reader.state().items.clone();
    loop {
        std::thread::sleep(WATCH_POLL);
        reader.poll_watcher();
        report_notices(&mut reader);
        if reader.state().items != shown {
            shown = reader.state().items.clone();
            print_listing(&reader, args.json)?;
        }
    }
}

fn print_listing(reader: &Reader, json: bool) -> Result<()> {
    let items = &reader.state().items;
    let mut out = std::io::stdout().lock();

    if json {
        let entries: Vec<serde_json::Value> = items
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::json!({
                    "index": index,
                    "kind": entry.kind().label(),
                    "format": format_name(entry.path()),
                    "bytes": file_len(entry.path()),
                    "name": entry.file_name(),
                    "path": entry.path(),
                })
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &entries)?;
        writeln!(out)?;
    } else {
        for (index, entry) in items.iter().enumerate() {
            let size = file_len(entry.path())
                .map(format_file_size)
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                out,
                "{:>5}  {:<5}  {:<5}  {:>8}  {}",
                index + 1,
                entry.kind().label(),
                format_name(entry.path()),
                size,
                entry.path().display()
            )?;
        }
        writeln!(
            out,
            "{} images, {} videos",
            items.image_count(),
            items.video_count()
        )?;
    }
    out.flush()?;
    Ok(())
}

fn file_len(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

fn run_render(config: ReaderConfig, args: RenderArgs) -> Result<()> {
    let mut reader = Reader::new(config);
    reader.dispatch(Msg::Display(DisplayMsg::ViewportResized(args.size)));
    reader.dispatch(Msg::Display(DisplayMsg::ScreenResized(args.size)));
    if let Some(align) = args.align {
        reader.dispatch(Msg::Display(DisplayMsg::SetAlignMode(align.into())));
    }
    if let Some(mode) = args.mode {
        reader.dispatch(Msg::Display(DisplayMsg::SetReadingMode(mode.into())));
    }

    reader.open(args.scan_request());
    if reader.state().is_empty() {
        report_notices(&mut reader);
        bail!("No media found in {}", args.dir.display());
    }

    reader.dispatch(Msg::Nav(NavMsg::JumpTo(args.index)));
    if reader.state().index != args.index {
        bail!(
            "Index {} is out of range (0..{})",
            args.index,
            reader.state().items.len()
        );
    }

    let step = if args.zoom_steps >= 0 {
        DisplayMsg::ZoomIn
    } else {
        DisplayMsg::ZoomOut
    };
    for _ in 0..args.zoom_steps.unsigned_abs() {
        reader.dispatch(Msg::Display(step.clone()));
    }
    if args.fullscreen {
        reader.dispatch(Msg::Display(DisplayMsg::ToggleFullscreen));
    }

    // Settle any deferred layout before drawing
    reader.tick(Instant::now() + Duration::from_secs(1));
    let canvas = reader.render();
    report_notices(&mut reader);
    let Some(canvas) = canvas else {
        bail!("Nothing could be laid out at {}x{}", args.size.width, args.size.height);
    };

    canvas
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let status = reader.status_line();
    println!("{}", status.text);
    println!("{}", status.progress);
    if let Some(caption) = reader.fullscreen_caption().filter(|_| reader.state().fullscreen) {
        println!("{}", caption);
    }
    Ok(())
}

fn run_thumbs(config: ReaderConfig, args: ThumbsArgs) -> Result<()> {
    let size = config.thumbnail_size;
    let mut reader = Reader::new(config);
    reader.open(args.scan_request());
    report_notices(&mut reader);

    let thumbnails = reader.thumbnails();
    if thumbnails.is_empty() {
        bail!("No images to preview in {}", args.dir.display());
    }

    let strip = render_thumbnail_strip(&thumbnails, size, args.index);
    strip
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    for thumb in &thumbnails {
        let marker = if thumb.index == args.index { '>' } else { ' ' };
        println!("{} {:>3}  {}", marker, thumb.index + 1, thumb.label);
    }
    Ok(())
}

/// Print pending notices to stderr; returns whether any was an error
fn report_notices(reader: &mut Reader) -> bool {
    let mut failed = false;
    for Notice { level, text } in reader.take_notices() {
        let prefix = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => {
                failed = true;
                "error"
            }
        };
        eprintln!("{}: {}", prefix, text);
    }
    failed
}
