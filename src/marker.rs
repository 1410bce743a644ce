//! Debug pivot marker drawing.
//!
//! When `debug_pivot` is enabled, a small square is painted over each
//! cropped frame at the pivot's post-crop position so the alignment can be
//! eyeballed. Purely diagnostic.

use crate::pivot::Pivot;
use image::{Rgba, RgbaImage};

/// Default marker color
pub const MARKER_COLOR: Rgba<u8> = Rgba([255, 64, 64, 255]);

/// Default marker half-size in pixels
pub const MARKER_RADIUS: i32 = 4;

/// Pixel position of a pivot within a `width` x `height` frame,
/// truncated toward zero.
pub fn pivot_pixel(width: u32, height: u32, pivot: Pivot) -> (i32, i32) {
    ((width as f64 * pivot.x) as i32, (height as f64 * pivot.y) as i32)
}

/// Paint a `2 * radius` square centered on `center`, clipped to the image.
pub fn draw_marker(image: &mut RgbaImage, center: (i32, i32), radius: i32, color: Rgba<u8>) {
    let (cx, cy) = center;
    for i in 0..radius * 2 {
        for j in 0..radius * 2 {
            let x = cx + i - radius;
            let y = cy + j - radius;
            if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
