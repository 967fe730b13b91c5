//! Image decoding and thumbnails
//!
//! Decode failures are never fatal: callers get `None`, a warning is
//! logged, and the entry is skipped wherever a batch of images is drawn.

pub mod render;

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::collector::Collection;
use crate::layout::{fit_within, Size};

/// Longest thumbnail label before it is shortened
pub const LABEL_MAX_CHARS: usize = 20;

/// Characters kept when a label is shortened (an ellipsis follows)
pub const LABEL_KEEP_CHARS: usize = 17;

/// Short format name for an image path (e.g. "PNG", "JPEG")
pub fn format_name(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| match e.to_lowercase().as_str() {
            "jpg" | "jpeg" => "JPEG".to_string(),
            "png" => "PNG".to_string(),
            "gif" => "GIF".to_string(),
            "bmp" => "BMP".to_string(),
            "webp" => "WebP".to_string(),
            "tif" | "tiff" => "TIFF".to_string(),
            other => other.to_uppercase(),
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Format file size for display (e.g. "2.4 MB", "128 KB")
pub fn format_file_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Decode an image file to RGBA
///
/// Returns None if the file can't be read or decoded.
pub fn load_image(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            tracing::warn!("Failed to decode {}: {}", path.display(), e);
            None
        }
    }
}

/// Pixel size of an image without decoding the pixel data
pub fn image_size(path: &Path) -> Option<Size> {
    match image::image_dimensions(path) {
        Ok((width, height)) => Some(Size::new(width, height)),
        Err(e) => {
            tracing::warn!("Failed to read size of {}: {}", path.display(), e);
            None
        }
    }
}

/// Sizes of every image in the collection, `None` where decoding failed
pub fn image_sizes(collection: &Collection) -> Vec<Option<Size>> {
    collection
        .images()
        .iter()
        .map(|entry| image_size(entry.path()))
        .collect()
}

/// Shrink `image` to fit inside `area`, never enlarging it
pub fn scale_to_fit(image: &RgbaImage, area: Size) -> Option<RgbaImage> {
    let (width, height) = image.dimensions();
    let rect = fit_within(Size::new(width, height), area).ok()?;
    if rect.width == width && rect.height == height {
        return Some(image.clone());
    }
    if rect.width == 0 || rect.height == 0 {
        return None;
    }
    Some(imageops::resize(image, rect.width, rect.height, FilterType::Lanczos3))
}

/// Label under a thumbnail: the file name, shortened when long
pub fn thumbnail_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let kept: String = name.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}

/// A decoded thumbnail for the image at `index`
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// Position of the image in the collection (jump target)
    pub index: usize,
    pub label: String,
    pub image: RgbaImage,
}

/// Thumbnails for the first `limit` images, at most `size` pixels per side
///
/// Images that fail to decode are left out.
pub fn build_thumbnails(collection: &Collection, limit: usize, size: u32) -> Vec<Thumbnail> {
    let _span = tracing::debug_span!("thumbnails", limit, size).entered();
    let area = Size::new(size, size);

    let thumbnails: Vec<Thumbnail> = collection
        .images()
        .iter()
        .take(limit)
        .enumerate()
        .filter_map(|(index, entry)| {
            let decoded = load_image(entry.path())?;
            let image = scale_to_fit(&decoded, area)?;
            Some(Thumbnail {
                index,
                label: thumbnail_label(&entry.file_name()),
                image,
            })
        })
        .collect();

    tracing::debug!(
        "Built {} thumbnails from {} images",
        thumbnails.len(),
        collection.image_count().min(limit)
    );
    thumbnails
}
