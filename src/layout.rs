//! Layout engine: fitting images into the viewport
//!
//! Page layout scales one image under an alignment policy, leaving a 5%
//! margin, multiplies by the user's zoom factor and centers the result.
//! Continuous layout stacks every image at viewport width.
//!
//! A viewport that has not been measured yet (either side `<= 1`) is
//! reported as [`LayoutError::ViewportUnmeasured`]; callers retry later
//! instead of drawing a degenerate rectangle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share of the viewport an aligned image fills
pub const FILL_RATIO: f64 = 0.95;

/// Vertical gap between images in continuous mode (pixels)
pub const CONTINUOUS_GAP: u32 = 10;

/// How far the current-image highlight extends past the image (pixels)
pub const HIGHLIGHT_MARGIN: i32 = 2;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a layout pass has produced a usable size
    pub fn is_measured(&self) -> bool {
        self.width > 1 && self.height > 1
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Alignment policy for page layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Fill the viewport width
    #[default]
    Width,
    /// Fill the viewport height
    Height,
    /// Fit entirely inside the viewport
    Fit,
}

/// Why a layout could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("viewport has not been measured yet")]
    ViewportUnmeasured,
    #[error("image has no pixels")]
    EmptyImage,
}

/// Destination of a scaled image inside the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Scale actually applied to the source image
    pub scale: f64,
}

/// Page layout for one image
pub fn compute_layout(
    image: Size,
    viewport: Size,
    align: AlignMode,
    zoom_factor: f64,
) -> Result<ViewportRect, LayoutError> {
    if !viewport.is_measured() {
        return Err(LayoutError::ViewportUnmeasured);
    }
    if image.is_empty() {
        return Err(LayoutError::EmptyImage);
    }

    let scale_x = viewport.width as f64 * FILL_RATIO / image.width as f64;
    let scale_y = viewport.height as f64 * FILL_RATIO / image.height as f64;
    let scale = match align {
        AlignMode::Width => scale_x,
        AlignMode::Height => scale_y,
        AlignMode::Fit => scale_x.min(scale_y),
    };

    Ok(place(image, viewport, scale * zoom_factor))
}

/// Fullscreen layout: fit the whole screen with no margin, then zoom
pub fn fullscreen_layout(
    image: Size,
    screen: Size,
    zoom_factor: f64,
) -> Result<ViewportRect, LayoutError> {
    if !screen.is_measured() {
        return Err(LayoutError::ViewportUnmeasured);
    }
    if image.is_empty() {
        return Err(LayoutError::EmptyImage);
    }

    let scale = (screen.width as f64 / image.width as f64)
        .min(screen.height as f64 / image.height as f64);
    Ok(place(image, screen, scale * zoom_factor))
}

/// Shrink `image` to fit inside `area` without ever enlarging it
///
/// Used for video frames and thumbnails.
pub fn fit_within(image: Size, area: Size) -> Result<ViewportRect, LayoutError> {
    if !area.is_measured() {
        return Err(LayoutError::ViewportUnmeasured);
    }
    if image.is_empty() {
        return Err(LayoutError::EmptyImage);
    }

    let scale = (area.width as f64 / image.width as f64)
        .min(area.height as f64 / image.height as f64)
        .min(1.0);
    Ok(place(image, area, scale))
}

fn place(image: Size, viewport: Size, scale: f64) -> ViewportRect {
    let width = scaled(image.width, scale);
    let height = scaled(image.height, scale);
    ViewportRect {
        x: centered(viewport.width, width),
        y: centered(viewport.height, height),
        width,
        height,
        scale,
    }
}

/// Truncating scale; `as` saturates on overflow and maps NaN to 0
fn scaled(len: u32, scale: f64) -> u32 {
    (len as f64 * scale) as u32
}

fn centered(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}

// ============================================================================
// Continuous layout
// ============================================================================

/// One image placed in the continuous stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousSlot {
    /// Position in the collection's image subsequence
    pub index: usize,
    /// Placement; `rect.y` is the cumulative offset from the top of the stack
    pub rect: ViewportRect,
}

/// Outline drawn around the current image; may extend past the stack edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Every image of a collection stacked top to bottom at viewport width
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousLayout {
    viewport_width: u32,
    slots: Vec<ContinuousSlot>,
    total_height: u32,
}

impl ContinuousLayout {
    /// Stack images given their pixel sizes
    ///
    /// `None` marks an image that failed to decode; it is left out of the
    /// stack and has no offset.
    pub fn build(sizes: &[Option<Size>], viewport_width: u32) -> Result<Self, LayoutError> {
        if viewport_width <= 1 {
            return Err(LayoutError::ViewportUnmeasured);
        }

        let mut slots = Vec::with_capacity(sizes.len());
        let mut y: u32 = 0;

        for (index, size) in sizes.iter().enumerate() {
            let Some(size) = size.filter(|s| !s.is_empty()) else {
                continue;
            };

            let scale = viewport_width as f64 * FILL_RATIO / size.width as f64;
            let width = scaled(size.width, scale);
            let height = scaled(size.height, scale);

            if !slots.is_empty() {
                y = y.saturating_add(CONTINUOUS_GAP);
            }
            slots.push(ContinuousSlot {
                index,
                rect: ViewportRect {
                    x: centered(viewport_width, width),
                    y,
                    width,
                    height,
                    scale,
                },
            });
            y = y.saturating_add(height);
        }

        Ok(Self {
            viewport_width,
            slots,
            total_height: y,
        })
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Height of the whole stack (the scroll region)
    pub fn total_height(&self) -> u32 {
        self.total_height
    }

    pub fn slots(&self) -> &[ContinuousSlot] {
        &self.slots
    }

    /// Slot for an image index, if that image was placed
    pub fn slot(&self, index: usize) -> Option<&ContinuousSlot> {
        self.slots
            .binary_search_by_key(&index, |s| s.index)
            .ok()
            .map(|i| &self.slots[i])
    }

    /// Vertical offset of an image from the top of the stack
    pub fn offset_of(&self, index: usize) -> Option<u32> {
        self.slot(index).map(|s| s.rect.y)
    }

    /// Fraction of the scroll region above the image (for scroll-to-index)
    pub fn scroll_ratio(&self, index: usize) -> Option<f64> {
        if self.total_height == 0 {
            return None;
        }
        self.offset_of(index)
            .map(|y| y as f64 / self.total_height as f64)
    }

    /// Image at vertical offset `y`: the last image starting at or above it
    pub fn index_at(&self, y: u32) -> Option<usize> {
        let after = self.slots.partition_point(|s| s.rect.y <= y);
        after.checked_sub(1).map(|i| self.slots[i].index)
    }

    /// Highlight outline around the image at `index`
    pub fn highlight(&self, index: usize) -> Option<HighlightRect> {
        self.slot(index).map(|s| HighlightRect {
            x: i32::try_from(s.rect.x).unwrap_or(i32::MAX) - HIGHLIGHT_MARGIN,
            y: i32::try_from(s.rect.y).unwrap_or(i32::MAX) - HIGHLIGHT_MARGIN,
            width: s.rect.width.saturating_add(2 * HIGHLIGHT_MARGIN as u32),
            height: s.rect.height.saturating_add(2 * HIGHLIGHT_MARGIN as u32),
        })
    }
}
