//! Raster composition of what the display area shows
//!
//! Everything is drawn into an owned [`RgbaImage`] the size of the surface.
//! Placement always comes from the layout engine; this module only scales
//! and blits.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::image::Thumbnail;
use crate::layout::{
    fit_within, ContinuousLayout, HighlightRect, Size, ViewportRect, CONTINUOUS_GAP,
};

pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const HIGHLIGHT: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const SEPARATOR: Rgba<u8> = Rgba([128, 128, 128, 255]);
pub const PLACEHOLDER_FILL: Rgba<u8> = Rgba([128, 128, 128, 255]);
pub const PLACEHOLDER_MARK: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const THUMB_SELECTED: Rgba<u8> = Rgba([173, 216, 230, 255]);
pub const THUMB_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Stroke width of the current-image outline in continuous mode
pub const HIGHLIGHT_STROKE: u32 = 3;

/// Stroke width of the separator line between continuous images
pub const SEPARATOR_STROKE: u32 = 2;

/// Side of the play triangle on the video placeholder
pub const PLAY_MARK_SIZE: u32 = 30;

/// Padding around each thumbnail cell
pub const THUMB_PADDING: u32 = 4;

/// A surface filled with the background color
pub fn blank(surface: Size) -> RgbaImage {
    RgbaImage::from_pixel(surface.width, surface.height, BACKGROUND)
}

/// Scale `image` to `rect` and draw it at `rect.x, rect.y - scroll`
fn blit(canvas: &mut RgbaImage, image: &RgbaImage, rect: &ViewportRect, scroll: i64) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let scaled;
    let source = if image.dimensions() == (rect.width, rect.height) {
        image
    } else {
        scaled = imageops::resize(image, rect.width, rect.height, FilterType::Lanczos3);
        &scaled
    };
    imageops::overlay(canvas, source, rect.x as i64, rect.y as i64 - scroll);
}

/// Single page: `image` placed at `rect` on a `surface`-sized canvas
pub fn render_page(image: &RgbaImage, rect: &ViewportRect, surface: Size) -> RgbaImage {
    let mut canvas = blank(surface);
    blit(&mut canvas, image, rect, 0);
    canvas
}

/// A still (video frame or poster) shrunk to fit and centered
pub fn render_fitted(image: &RgbaImage, surface: Size) -> RgbaImage {
    let mut canvas = blank(surface);
    let (width, height) = image.dimensions();
    match fit_within(Size::new(width, height), surface) {
        Ok(rect) => blit(&mut canvas, image, &rect, 0),
        Err(e) => tracing::debug!("Nothing drawn for {}x{} still: {}", width, height, e),
    }
    canvas
}

/// Placeholder for a video with no poster frame
///
/// A grey panel over the middle half of the surface, outlined in white,
/// with a play triangle in the center.
pub fn render_video_placeholder(surface: Size) -> RgbaImage {
    let mut canvas = blank(surface);
    let (w, h) = (surface.width, surface.height);
    let (left, top, right, bottom) = (w / 4, h / 4, 3 * w / 4, 3 * h / 4);

    fill_rect(
        &mut canvas,
        left as i64,
        top as i64,
        right - left,
        bottom - top,
        PLACEHOLDER_FILL,
    );
    stroke_rect(
        &mut canvas,
        left as i64,
        top as i64,
        right - left,
        bottom - top,
        2,
        PLACEHOLDER_MARK,
    );

    // Triangle pointing right: vertical left edge, apex at the right
    let (cx, cy) = ((w / 2) as i64, (h / 2) as i64);
    let half = (PLAY_MARK_SIZE / 2) as i64;
    for dy in -half..=half {
        let reach = 2 * (half - dy.abs());
        for dx in 0..=reach {
            put(&mut canvas, cx - half + dx, cy + dy, PLACEHOLDER_MARK);
        }
    }
    canvas
}

/// Visible window of the continuous stack
///
/// `scroll` is the offset of the window's top edge within the stack.
/// `load` decodes the image at a collection index; failures are skipped.
pub fn render_continuous<F>(
    layout: &ContinuousLayout,
    current: usize,
    window_height: u32,
    scroll: u32,
    mut load: F,
) -> RgbaImage
where
    F: FnMut(usize) -> Option<RgbaImage>,
{
    let surface = Size::new(layout.viewport_width(), window_height);
    let mut canvas = blank(surface);
    let top = scroll as i64;
    let bottom = top + window_height as i64;

    for (n, slot) in layout.slots().iter().enumerate() {
        let y = slot.rect.y as i64;
        let end = y + slot.rect.height as i64;

        if n > 0 {
            // Separator centered in the gap above this image
            let line_y = y - (CONTINUOUS_GAP / 2) as i64 - top;
            fill_rect(&mut canvas, 0, line_y, surface.width, SEPARATOR_STROKE, SEPARATOR);
        }

        if end < top || y >= bottom {
            continue;
        }
        match load(slot.index) {
            Some(image) => blit(&mut canvas, &image, &slot.rect, top),
            None => tracing::debug!("Skipping undecodable image {}", slot.index),
        }
    }

    if let Some(HighlightRect {
        x,
        y,
        width,
        height,
    }) = layout.highlight(current)
    {
        stroke_rect(
            &mut canvas,
            x as i64,
            y as i64 - top,
            width,
            height,
            HIGHLIGHT_STROKE,
            HIGHLIGHT,
        );
    }
    canvas
}

/// Thumbnails stacked in a column, the current one on a highlighted cell
pub fn render_thumbnail_strip(thumbnails: &[Thumbnail], size: u32, current: usize) -> RgbaImage {
    let cell = size + 2 * THUMB_PADDING;
    let height = (cell * thumbnails.len() as u32).max(1);
    let mut canvas = RgbaImage::from_pixel(cell, height, BACKGROUND);

    for (row, thumb) in thumbnails.iter().enumerate() {
        let top = row as u32 * cell;
        let color = if thumb.index == current {
            THUMB_SELECTED
        } else {
            THUMB_BACKGROUND
        };
        fill_rect(&mut canvas, 0, top as i64, cell, cell, color);

        let (w, h) = thumb.image.dimensions();
        let x = (cell.saturating_sub(w) / 2) as i64;
        let y = (top + cell.saturating_sub(h) / 2) as i64;
        imageops::overlay(&mut canvas, &thumb.image, x, y);
    }
    canvas
}

fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0
        && y >= 0
        && (x as u64) < canvas.width() as u64
        && (y as u64) < canvas.height() as u64
    {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width as i64).min(canvas.width() as i64);
    let y1 = (y + height as i64).min(canvas.height() as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Outline drawn inward from the rectangle edge
fn stroke_rect(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    stroke: u32,
    color: Rgba<u8>,
) {
    let stroke = stroke.min(width).min(height);
    let right = x + width as i64 - stroke as i64;
    let bottom = y + height as i64 - stroke as i64;
    fill_rect(canvas, x, y, width, stroke, color);
    fill_rect(canvas, x, bottom, width, stroke, color);
    fill_rect(canvas, x, y, stroke, height, color);
    fill_rect(canvas, right, y, stroke, height, color);
}
