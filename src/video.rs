//! Video decoding and playback
//!
//! Frames come from a [`FrameSource`]. The shipped source drives the
//! external `ffmpeg` and `ffprobe` executables and reads raw RGBA frames
//! from a pipe.
//!
//! Playback runs on its own thread and never sees the viewer state. It
//! publishes into a [`FrameSlot`] that only ever holds the latest frame and
//! reports progress as [`PlaybackEvent`]s. Dropping or stopping a
//! [`Playback`] cancels the thread and joins it, which drops the source and
//! with it the decoder process.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use image::RgbaImage;
use thiserror::Error;

/// Frame rate used when the stream does not report one
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Errors from probing or decoding a video
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("no video stream found in {}", path.display())]
    NoStream { path: PathBuf },

    #[error("decoder pipe failed: {0}")]
    Pipe(#[from] io::Error),
}

/// One decoded frame, tightly packed RGBA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl VideoFrame {
    /// Convert into an image buffer; `None` if the pixel count is wrong
    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.rgba)
    }
}

/// Something that yields decoded frames in presentation order
pub trait FrameSource: Send {
    /// Frames per second to present at
    fn frame_rate(&self) -> f64;

    /// Decode the next frame; `Ok(None)` at end of stream
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError>;
}

// ============================================================================
// ffprobe / ffmpeg
// ============================================================================

/// Basic facts about the first video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Parse an ffprobe rate such as `30000/1001` or `25`
///
/// Zero, negative or unparseable rates fall back to [`DEFAULT_FRAME_RATE`].
pub fn parse_frame_rate(text: &str) -> f64 {
    let text = text.trim();
    let rate = match text.split_once('/') {
        Some((num, den)) => match (num.parse::<f64>(), den.parse::<f64>()) {
            (Ok(n), Ok(d)) if d != 0.0 => n / d,
            _ => 0.0,
        },
        None => text.parse().unwrap_or(0.0),
    };

    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        DEFAULT_FRAME_RATE
    }
}

/// Parse `width,height,r_frame_rate` as printed by `ffprobe -of csv=p=0`
pub fn parse_probe_output(text: &str) -> Option<StreamInfo> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut parts = line.split(',');
    let width: u32 = parts.next()?.trim().parse().ok()?;
    let height: u32 = parts.next()?.trim().parse().ok()?;
    let frame_rate = parts.next().map(parse_frame_rate).unwrap_or(DEFAULT_FRAME_RATE);

    if width == 0 || height == 0 {
        return None;
    }
    Some(StreamInfo {
        width,
        height,
        frame_rate,
    })
}

/// Ask `ffprobe` for the dimensions and frame rate of `path`
pub fn probe(ffprobe: &Path, path: &Path) -> Result<StreamInfo, VideoError> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| VideoError::Spawn {
            program: ffprobe.display().to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&stdout).ok_or_else(|| VideoError::NoStream {
        path: path.to_path_buf(),
    })
}

/// Frames decoded by an `ffmpeg` child process
///
/// The child is killed and reaped when the source is dropped.
pub struct FfmpegSource {
    child: Child,
    stdout: ChildStdout,
    info: StreamInfo,
}

impl FfmpegSource {
    pub fn open(ffmpeg: &Path, ffprobe: &Path, path: &Path) -> Result<Self, VideoError> {
        let info = probe(ffprobe, path)?;
        tracing::debug!(
            "Opening {} ({}x{} @ {:.2} fps)",
            path.display(),
            info.width,
            info.height,
            info.frame_rate
        );

        let mut child = Command::new(ffmpeg)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgba", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| VideoError::Spawn {
                program: ffmpeg.display().to_string(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(VideoError::Pipe(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "ffmpeg stdout was not captured",
            )));
        };

        Ok(Self {
            child,
            stdout,
            info,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn frame_rate(&self) -> f64 {
        self.info.frame_rate
    }

    fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        let len = self.info.width as usize * self.info.height as usize * 4;
        let mut rgba = vec![0u8; len];
        match self.stdout.read_exact(&mut rgba) {
            Ok(()) => Ok(Some(VideoFrame {
                width: self.info.width,
                height: self.info.height,
                rgba,
            })),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::trace!("ffmpeg already exited: {}", e);
        }
        let _ = self.child.wait();
    }
}

/// First frame of a video, for the still shown before playback
pub fn poster_frame(
    ffmpeg: &Path,
    ffprobe: &Path,
    path: &Path,
) -> Result<Option<VideoFrame>, VideoError> {
    let mut source = FfmpegSource::open(ffmpeg, ffprobe, path)?;
    source.next_frame()
}

// ============================================================================
// Latest-frame mailbox
// ============================================================================

/// Single-slot mailbox holding the most recent frame
///
/// Readers always get the newest frame; older unread frames are dropped.
pub struct FrameSlot {
    tx: Sender<VideoFrame>,
    rx: Receiver<VideoFrame>,
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSlot {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    /// Producer half for the playback thread
    pub fn publisher(&self) -> FramePublisher {
        FramePublisher {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }

    /// Take the latest frame, if one arrived since the last call
    pub fn take(&self) -> Option<VideoFrame> {
        self.rx.try_recv().ok()
    }

    /// Discard any pending frame
    pub fn clear(&self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Producer half of a [`FrameSlot`]
#[derive(Clone)]
pub struct FramePublisher {
    tx: Sender<VideoFrame>,
    rx: Receiver<VideoFrame>,
}

impl FramePublisher {
    /// Replace whatever frame is waiting with `frame`
    pub fn publish(&self, mut frame: VideoFrame) {
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => return,
                Err(TrySendError::Full(f)) => {
                    // Evict the stale frame and try again
                    let _ = self.rx.try_recv();
                    frame = f;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

// ============================================================================
// Playback task
// ============================================================================

/// Progress reported by the playback thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A new frame is in the slot
    Redraw,
    /// The stream ended
    Finished,
    /// Decoding failed; playback stopped
    Failed(String),
}

/// A running playback thread
pub struct Playback {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<PlaybackEvent>,
}

impl Playback {
    /// Spawn a thread that presents `source` at its frame rate
    pub fn start(source: Box<dyn FrameSource>, publisher: FramePublisher) -> Self {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let (event_tx, event_rx) = unbounded();
        let thread_events = event_tx.clone();

        let handle = std::thread::Builder::new()
            .name("folio-playback".into())
            .spawn(move || run_playback(source, publisher, cancel_rx, thread_events));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                report_spawn_failure(&event_tx, &e);
                None
            }
        };

        Self {
            cancel: Some(cancel_tx),
            handle,
            events: event_rx,
        }
    }

    /// Drain pending events (non-blocking)
    pub fn poll_events(&self) -> Vec<PlaybackEvent> {
        self.events.try_iter().collect()
    }

    /// Block up to `timeout` for the next event
    pub fn wait_event(&self, timeout: Duration) -> Option<PlaybackEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the thread and wait for it to release the decoder
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Playback thread panicked");
            }
            tracing::debug!("Playback stopped");
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tell the update loop playback never started
fn report_spawn_failure(events: &Sender<PlaybackEvent>, err: &io::Error) {
    tracing::error!("Failed to spawn playback thread: {}", err);
    let _ = events.send(PlaybackEvent::Failed(format!(
        "could not start playback: {}",
        err
    )));
}

/// Time between frames at `rate`, or at [`DEFAULT_FRAME_RATE`] when the
/// rate is zero, negative or not finite
pub fn frame_interval(rate: f64) -> Duration {
    let rate = if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        DEFAULT_FRAME_RATE
    };
    Duration::try_from_secs_f64(1.0 / rate)
        .unwrap_or_else(|_| Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE))
}

fn run_playback(
    mut source: Box<dyn FrameSource>,
    publisher: FramePublisher,
    cancel: Receiver<()>,
    events: Sender<PlaybackEvent>,
) {
    let frame_delay = frame_interval(source.frame_rate());
    let mut deadline = Instant::now();
    let mut frames: u64 = 0;

    loop {
        match source.next_frame() {
            Ok(Some(frame)) => {
                publisher.publish(frame);
                frames += 1;
                if events.send(PlaybackEvent::Redraw).is_err() {
                    break;
                }
            }
            Ok(None) => {
                tracing::debug!("Playback finished after {} frames", frames);
                let _ = events.send(PlaybackEvent::Finished);
                break;
            }
            Err(e) => {
                tracing::warn!("Playback failed after {} frames: {}", frames, e);
                let _ = events.send(PlaybackEvent::Failed(e.to_string()));
                break;
            }
        }

        // Interruptible sleep until the next frame is due
        deadline += frame_delay;
        let wait = deadline.saturating_duration_since(Instant::now());
        match cancel.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                tracing::trace!("Playback cancelled after {} frames", frames);
                break;
            }
        }
    }
}
