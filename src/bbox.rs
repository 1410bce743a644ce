//! Bounding box extraction and manipulation
//!
//! The bounding box is the unit of work for the whole cropper: one is
//! extracted per frame, they are unioned into a group total, and the
//! adjusted per-frame boxes derived from that total drive the crops.
//!
//! Boxes use crop-rectangle semantics: `min_x`/`min_y` are inclusive,
//! `max_x`/`max_y` are exclusive. A single opaque pixel at (3, 5) produces
//! the 1x1 box (3, 5)..(4, 6).

use image::RgbaImage;
use serde::Serialize;

/// Round `v` down to the nearest multiple of `n`.
///
/// `round_down(63, 4) -> 60`. Works for negative values
/// (`round_down(-5, 4) -> -8`). `n` must be positive.
pub fn round_down(v: i32, n: i32) -> i32 {
    v.div_euclid(n) * n
}

/// Round `v` up to the nearest multiple of `n`.
///
/// `round_up(63, 4) -> 64`. Works for negative values
/// (`round_up(-5, 4) -> -4`). `n` must be positive.
pub fn round_up(v: i32, n: i32) -> i32 {
    (v + n - 1).div_euclid(n) * n
}

/// Axis-aligned pixel rectangle with exclusive max edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    /// Left edge (inclusive)
    pub min_x: i32,
    /// Top edge (inclusive)
    pub min_y: i32,
    /// Right edge (exclusive)
    pub max_x: i32,
    /// Bottom edge (exclusive)
    pub max_y: i32,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Compute the smallest box enclosing every non-background pixel.
    ///
    /// A pixel is background when its alpha channel is zero, regardless of
    /// color. This covers the pure-white fully-transparent filler some
    /// export pipelines emit: those pixels have zero alpha, so no separate
    /// normalization pass is needed.
    ///
    /// Returns `None` when the image has no non-background pixels at all;
    /// such frames contribute nothing to a group and are skipped.
    pub fn from_image(image: &RgbaImage) -> Option<Self> {
        let mut bounds: Option<BoundingBox> = None;

        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            let (x, y) = (x as i32, y as i32);
            match bounds {
                None => bounds = Some(BoundingBox::new(x, y, x + 1, y + 1)),
                Some(ref mut bb) => {
                    bb.min_x = bb.min_x.min(x);
                    bb.min_y = bb.min_y.min(y);
                    bb.max_x = bb.max_x.max(x + 1);
                    bb.max_y = bb.max_y.max(y + 1);
                }
            }
        }

        bounds
    }

    /// Grow this bounding box to fit another.
    pub fn grow_to_fit(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Expand the box outward so every edge sits on a multiple of `n`.
    ///
    /// Never shrinks the box. Grid sizes below 2 leave the box unchanged.
    pub fn round_bounds(&mut self, n: i32) {
        if n <= 1 {
            return;
        }
        self.min_x = round_down(self.min_x, n);
        self.min_y = round_down(self.min_y, n);
        self.max_x = round_up(self.max_x, n);
        self.max_y = round_up(self.max_y, n);
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Whether `other` lies entirely within this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) ({}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
