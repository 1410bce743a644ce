//! Group aggregation and pivot-preserving box adjustment.
//!
//! This is the heart of the cropper. [`total_bbox`] folds the per-frame
//! boxes of a group into one shared envelope. [`adjusted_bbox`] then grows
//! each frame's own box inside that envelope so that cropping to it leaves
//! the pivot at the same relative offset in every frame of the group.

use crate::bbox::BoundingBox;
use crate::pivot::Pivot;
use thiserror::Error;

/// A group contained no frames with any foreground pixels.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("group has no non-empty frames to aggregate")]
pub struct EmptyGroup;

/// Compute the shared envelope for a group of frames.
///
/// Unions every `Some` box (empty frames contribute `None` and are
/// ignored), then expands the result outward to the grid. Fold order does
/// not matter. Fails with [`EmptyGroup`] when there is nothing to union.
pub fn total_bbox(
    boxes: impl IntoIterator<Item = Option<BoundingBox>>,
    grid: i32,
) -> Result<BoundingBox, EmptyGroup> {
    let mut total: Option<BoundingBox> = None;

    for bb in boxes.into_iter().flatten() {
        match total {
            None => total = Some(bb),
            Some(ref mut t) => t.grow_to_fit(&bb),
        }
    }

    let mut total = total.ok_or(EmptyGroup)?;
    total.round_bounds(grid);
    Ok(total)
}

/// Adjust one edge pair so the pivot lands at ratio `p` along the axis.
///
/// `bb` must lie within `total` on this axis. Grows exactly one side of
/// the box (never shrinks): whichever margin is too large relative to the
/// `p : (1 - p)` split absorbs the growth. Pivot values of exactly 0 or 1
/// pin the corresponding edge to the envelope.
fn adjust_axis(bb_min: i32, bb_max: i32, total_min: i32, total_max: i32, p: f64) -> (i32, i32) {
    if p == 0.0 {
        return (total_min, bb_max);
    }
    if p == 1.0 {
        return (bb_min, total_max);
    }

    let pivot_ratio = p / (1.0 - p);
    let d_min = bb_min - total_min;
    let d_max = total_max - bb_max;

    // The d_max == 0 check must come before the ratio division.
    if d_max == 0 || (d_min as f64 / d_max as f64) > pivot_ratio {
        // The min-side margin is too large: grow leftward until the
        // margins satisfy the pivot ratio. Truncation toward zero keeps
        // the growth from overshooting past the envelope.
        let offset = (d_min as f64 - d_max as f64 * pivot_ratio) as i32;
        (bb_min - offset, bb_max)
    } else {
        let offset = (d_max as f64 - d_min as f64 / pivot_ratio) as i32;
        (bb_min, bb_max + offset)
    }
}

/// Enlarge a frame's box so cropping to it preserves the pivot.
///
/// `bb` must be contained within `total` (guaranteed when `total` came
/// from [`total_bbox`] over a set including `bb`). The result always
/// contains `bb`; before grid rounding it lies within `total`, and when
/// `total` is itself grid-aligned the rounded result stays within it too.
pub fn adjusted_bbox(
    bb: &BoundingBox,
    total: &BoundingBox,
    pivot: Pivot,
    grid: i32,
) -> BoundingBox {
    let (min_x, max_x) = adjust_axis(bb.min_x, bb.max_x, total.min_x, total.max_x, pivot.x);
    let (min_y, max_y) = adjust_axis(bb.min_y, bb.max_y, total.min_y, total.max_y, pivot.y);

    let mut adjusted = BoundingBox::new(min_x, min_y, max_x, max_y);
    adjusted.round_bounds(grid);
    adjusted
}


// ============================================================================
// Property-Based Tests
// ============================================================================
