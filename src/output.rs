//! PNG output: padded cropping, saving, and mirrored path generation.

use crate::bbox::BoundingBox;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Crop an image to a bounding box, padding with transparency.
///
/// The output always has exactly the box's dimensions. Grid rounding can
/// push an adjusted box past the frame's edges; any area of the box that
/// falls outside the source image is filled with fully transparent black.
pub fn crop_image(image: &RgbaImage, bbox: &BoundingBox) -> RgbaImage {
    let width = bbox.width().max(0) as u32;
    let height = bbox.height().max(0) as u32;
    let mut cropped = RgbaImage::new(width, height);

    for (x, y, pixel) in cropped.enumerate_pixels_mut() {
        let src_x = bbox.min_x + x as i32;
        let src_y = bbox.min_y + y as i32;
        if src_x >= 0
            && src_y >= 0
            && (src_x as u32) < image.width()
            && (src_y as u32) < image.height()
        {
            *pixel = *image.get_pixel(src_x as u32, src_y as u32);
        }
    }

    cropped
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Build the output path for a frame: the output root joined with the
/// frame's path relative to the input root.
///
/// Falls back to the bare file name when the frame does not sit under the
/// input root (discovery always yields frames that do).
pub fn mirrored_path(frame: &Path, input_root: &Path, out_root: &Path) -> PathBuf {
    match frame.strip_prefix(input_root) {
        Ok(relative) => out_root.join(relative),
        Err(_) => out_root.join(frame.file_name().unwrap_or(frame.as_os_str())),
    }
}
