//! Session runtime: executes commands and owns the side-effect resources
//!
//! [`Reader`] drives one viewing session. Messages go through
//! [`crate::update::update`]; the resulting commands are executed here.
//! Scans run synchronously and feed their results back as messages in the
//! same dispatch. Playback runs on its own thread and is polled with
//! [`Reader::poll_playback`].
//!
//! A presentation shell feeds input through [`Reader::dispatch`], calls
//! [`Reader::tick`] and the `poll_*` methods from its event loop, and draws
//! whatever [`Reader::render`] returns when [`Reader::take_redraw`] says so.

use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::collector::{ScanOutcome, ScanRequest};
use crate::commands::{Cmd, Notice, NoticeLevel, LAYOUT_RETRY_MS};
use crate::config::ReaderConfig;
use crate::fs_watcher::DirectoryWatcher;
use crate::image::render::{
    blank, render_continuous, render_fitted, render_page, render_video_placeholder,
};
use crate::image::{build_thumbnails, image_sizes, load_image, Thumbnail};
use crate::layout::{ContinuousLayout, LayoutError, Size};
use crate::messages::{DisplayMsg, LibraryMsg, Msg, VideoMsg};
use crate::model::{fullscreen_caption, StatusLine, ViewerState};
use crate::tree::DirTree;
use crate::update::update;
use crate::video::{
    poster_frame, FfmpegSource, FrameSlot, FrameSource, Playback, PlaybackEvent, VideoError,
    VideoFrame,
};

/// Opens a frame source for a video path
pub type SourceFactory =
    Box<dyn Fn(&Path) -> Result<Box<dyn FrameSource>, VideoError> + Send>;

/// One reading session with its resources
pub struct Reader {
    state: ViewerState,
    config: ReaderConfig,
    tree: Option<DirTree>,
    open_source: SourceFactory,
    playback: Option<Playback>,
    frames: FrameSlot,
    last_frame: Option<VideoFrame>,
    watch: bool,
    watcher: Option<DirectoryWatcher>,
    notices: Vec<Notice>,
    scroll_offset: u32,
    redraw: bool,
    retry_at: Option<Instant>,
}

impl Reader {
    pub fn new(config: ReaderConfig) -> Self {
        let ffmpeg = config.ffmpeg_path.clone();
        let ffprobe = config.ffprobe_path.clone();
        let open_source: SourceFactory = Box::new(move |path: &Path| {
            FfmpegSource::open(&ffmpeg, &ffprobe, path)
                .map(|source| Box::new(source) as Box<dyn FrameSource>)
        });

        Self {
            state: ViewerState::new(&config),
            config,
            tree: None,
            open_source,
            playback: None,
            frames: FrameSlot::new(),
            last_frame: None,
            watch: false,
            watcher: None,
            notices: Vec::new(),
            scroll_offset: 0,
            redraw: false,
            retry_at: None,
        }
    }

    /// Replace how video paths are turned into frame sources
    pub fn with_source_factory(mut self, open_source: SourceFactory) -> Self {
        self.open_source = open_source;
        self
    }

    /// Watch the scanned directory and rescan when media changes
    pub fn set_watching(&mut self, watch: bool) {
        self.watch = watch;
        if !watch {
            self.watcher = None;
        } else if let Some(source) = self.state.source.clone() {
            let (dir, recursive) = source.watch_target();
            self.watch_directory(dir, recursive);
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn tree(&self) -> Option<&DirTree> {
        self.tree.as_ref()
    }

    /// Top of the visible window within the continuous stack
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Notices produced since the last call, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Whether something changed on screen since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn status_line(&self) -> StatusLine {
        StatusLine::from_state(&self.state)
    }

    pub fn fullscreen_caption(&self) -> Option<String> {
        fullscreen_caption(&self.state)
    }

    // ========================================================================
    // Message loop
    // ========================================================================

    /// Run a message and everything it leads to
    pub fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            if let Some(cmd) = update(&mut self.state, msg) {
                self.execute(cmd, &mut queue);
            }
        }
    }

    /// Run a scan directly, as if a message had requested it
    pub fn open(&mut self, request: ScanRequest) {
        self.run_command(Cmd::Scan(request));
    }

    fn run_command(&mut self, cmd: Cmd) {
        let mut queue = VecDeque::new();
        self.execute(cmd, &mut queue);
        while let Some(msg) = queue.pop_front() {
            self.dispatch(msg);
        }
    }

    /// Fire a deferred layout retry once its delay has passed
    pub fn tick(&mut self, now: Instant) {
        if self.retry_at.is_some_and(|at| now >= at) {
            self.retry_at = None;
            tracing::trace!("Retrying deferred layout");
            if self.state.shows_continuous() && self.state.continuous.is_none() {
                self.run_command(Cmd::LayoutContinuous);
            } else {
                self.redraw = true;
            }
        }
    }

    /// Forward playback progress into the update loop
    pub fn poll_playback(&mut self) {
        let events = match &self.playback {
            Some(playback) => playback.poll_events(),
            None => return,
        };
        for event in events {
            match event {
                PlaybackEvent::Redraw => {
                    if let Some(frame) = self.frames.take() {
                        self.last_frame = Some(frame);
                        self.redraw = true;
                    }
                }
                PlaybackEvent::Finished => self.dispatch(Msg::Video(VideoMsg::Finished)),
                PlaybackEvent::Failed(message) => {
                    self.dispatch(Msg::Video(VideoMsg::Failed(message)))
                }
            }
        }
    }

    /// Rescan if the watched directory changed
    pub fn poll_watcher(&mut self) {
        let changed = self
            .watcher
            .as_ref()
            .is_some_and(|w| !w.poll_changes().is_empty());
        if changed {
            self.dispatch(Msg::Library(LibraryMsg::FilesChanged));
        }
    }

    fn execute(&mut self, cmd: Cmd, queue: &mut VecDeque<Msg>) {
        match cmd {
            Cmd::Redraw => self.redraw = true,

            Cmd::Scan(request) => {
                let _span = tracing::info_span!("scan", ?request).entered();
                match request.run() {
                    Ok(outcome) => {
                        if matches!(outcome, ScanOutcome::Loaded { .. }) {
                            if self.watch {
                                let (dir, recursive) = request.watch_target();
                                self.watch_directory(dir, recursive);
                            }
                            self.scroll_offset = 0;
                        }
                        queue.push_back(Msg::Library(LibraryMsg::Loaded { request, outcome }));
                    }
                    Err(e) => {
                        let message = e.user_message();
                        queue.push_back(Msg::Library(LibraryMsg::ScanFailed { request, message }));
                    }
                }
            }

            Cmd::LoadTree(root) => match DirTree::from_root(&root) {
                Ok(tree) => {
                    tracing::debug!("Directory tree has {} nodes", tree.root.count());
                    self.tree = Some(tree);
                }
                Err(e) => {
                    self.tree = None;
                    self.notify(Notice::error(e.user_message()));
                }
            },

            Cmd::LayoutContinuous => {
                let sizes = image_sizes(&self.state.items);
                match ContinuousLayout::build(&sizes, self.state.viewport.width) {
                    Ok(layout) => {
                        queue.push_back(Msg::Display(DisplayMsg::ContinuousLaidOut(layout)))
                    }
                    Err(e) => {
                        tracing::debug!("Continuous layout deferred: {}", e);
                        self.schedule_retry(LAYOUT_RETRY_MS);
                    }
                }
            }

            Cmd::ScrollTo { offset } => {
                self.scroll_offset = offset;
                self.redraw = true;
            }

            Cmd::ScrollBy { units } => {
                let step = (self.state.viewport.height / 10).max(1) as i64;
                let max = self
                    .state
                    .continuous
                    .as_ref()
                    .map(|l| l.total_height().saturating_sub(self.state.viewport.height))
                    .unwrap_or(0) as i64;
                let target = (self.scroll_offset as i64 + units as i64 * step).clamp(0, max);
                self.scroll_offset = target as u32;
                self.redraw = true;
            }

            Cmd::RetryLayout { delay_ms } => self.schedule_retry(delay_ms),

            Cmd::StartPlayback(path) => {
                self.stop_playback();
                match (self.open_source)(&path) {
                    Ok(source) => {
                        tracing::info!("Playing {}", path.display());
                        self.playback = Some(Playback::start(source, self.frames.publisher()));
                    }
                    Err(e) => queue.push_back(Msg::Video(VideoMsg::Failed(e.to_string()))),
                }
            }

            Cmd::StopPlayback => self.stop_playback(),

            Cmd::SetFullscreen(on) => {
                tracing::debug!("Fullscreen {}", if on { "on" } else { "off" });
                self.redraw = true;
            }

            Cmd::Notify(notice) => self.notify(notice),

            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd, queue);
                }
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.text),
            NoticeLevel::Warning => tracing::warn!("{}", notice.text),
            NoticeLevel::Error => tracing::error!("{}", notice.text),
        }
        self.notices.push(notice);
    }

    fn schedule_retry(&mut self, delay_ms: u64) {
        let at = Instant::now() + Duration::from_millis(delay_ms);
        self.retry_at = Some(self.retry_at.map_or(at, |prev| prev.min(at)));
    }

    fn stop_playback(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.stop();
        }
        self.frames.clear();
        self.last_frame = None;
    }

    fn watch_directory(&mut self, dir: &Path, recursive: bool) {
        if self.watcher.as_ref().is_some_and(|w| w.root() == dir) {
            return;
        }
        match DirectoryWatcher::new(dir.to_path_buf(), recursive) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(e) => {
                tracing::warn!("Cannot watch {}: {}", dir.display(), e);
                self.watcher = None;
            }
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Compose the display area for the current state
    ///
    /// Returns `None` while the surface has not been measured; a retry is
    /// scheduled in that case.
    pub fn render(&mut self) -> Option<RgbaImage> {
        let surface = if self.state.fullscreen {
            self.state.screen
        } else {
            self.state.viewport
        };
        if !surface.is_measured() {
            self.schedule_retry(LAYOUT_RETRY_MS);
            return None;
        }

        let Some(entry) = self.state.current().cloned() else {
            return Some(blank(surface));
        };

        if self.state.shows_continuous() {
            if let Some(layout) = &self.state.continuous {
                let items = &self.state.items;
                return Some(render_continuous(
                    layout,
                    self.state.index,
                    surface.height,
                    self.scroll_offset,
                    |index| items.get(index).and_then(|e| load_image(e.path())),
                ));
            }
        }

        if entry.is_video() {
            return Some(self.render_video(entry.path(), surface));
        }

        let Some(image) = load_image(entry.path()) else {
            self.notify(Notice::error(format!(
                "Failed to load image: {}",
                entry.file_name()
            )));
            return Some(blank(surface));
        };
        let (width, height) = image.dimensions();
        match self.state.page_layout(Size::new(width, height)) {
            Ok(rect) => Some(render_page(&image, &rect, surface)),
            Err(LayoutError::ViewportUnmeasured) => {
                self.schedule_retry(LAYOUT_RETRY_MS);
                None
            }
            Err(LayoutError::EmptyImage) => Some(blank(surface)),
        }
    }

    fn render_video(&mut self, path: &Path, surface: Size) -> RgbaImage {
        if self.playback.is_some() {
            if let Some(image) = self.last_frame.clone().and_then(VideoFrame::into_image) {
                return render_fitted(&image, surface);
            }
        }

        match poster_frame(&self.config.ffmpeg_path, &self.config.ffprobe_path, path) {
            Ok(Some(frame)) => match frame.into_image() {
                Some(image) => render_fitted(&image, surface),
                None => render_video_placeholder(surface),
            },
            Ok(None) => render_video_placeholder(surface),
            Err(e) => {
                tracing::debug!("No poster frame for {}: {}", path.display(), e);
                render_video_placeholder(surface)
            }
        }
    }

    /// Thumbnails for the current collection, per the configured limits
    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        build_thumbnails(
            &self.state.items,
            self.config.thumbnail_limit,
            self.config.thumbnail_size,
        )
    }
}
