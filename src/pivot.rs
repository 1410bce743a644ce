//! Pivot points: normalized positions preserved by the crop.
//!
//! A pivot is an `(x, y)` pair in `[0, 1]^2`: `(0, 0)` is the top-left
//! corner, `(1, 1)` the bottom-right, `(0.5, 0.5)` the center. Every frame
//! in a group is cropped so the pivot keeps the same relative offset.

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing or validating a pivot
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PivotError {
    /// Pivot name not in the named vocabulary
    #[error("unknown pivot name '{0}' (try center, left, right, top, bottom, or a corner)")]
    UnknownName(String),
    /// Component outside [0, 1]
    #[error("pivot component {0} is out of range (must be within 0.0..=1.0)")]
    OutOfRange(f64),
    /// String was neither a name nor an `x,y` pair
    #[error("expected a pivot name or 'x,y' pair, got '{0}'")]
    Malformed(String),
}

/// Normalized pivot position within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pivot {
    /// Horizontal position, 0 = left edge, 1 = right edge
    pub x: f64,
    /// Vertical position, 0 = top edge, 1 = bottom edge
    pub y: f64,
}

impl Pivot {
    pub const CENTER: Pivot = Pivot { x: 0.5, y: 0.5 };
    pub const LEFT: Pivot = Pivot { x: 0.0, y: 0.5 };
    pub const RIGHT: Pivot = Pivot { x: 1.0, y: 0.5 };
    pub const TOP: Pivot = Pivot { x: 0.5, y: 0.0 };
    pub const BOTTOM: Pivot = Pivot { x: 0.5, y: 1.0 };
    pub const TOP_LEFT: Pivot = Pivot { x: 0.0, y: 0.0 };
    pub const TOP_RIGHT: Pivot = Pivot { x: 1.0, y: 0.0 };
    pub const BOTTOM_LEFT: Pivot = Pivot { x: 0.0, y: 1.0 };
    pub const BOTTOM_RIGHT: Pivot = Pivot { x: 1.0, y: 1.0 };

    /// Create a pivot, validating both components are within `[0, 1]`.
    pub fn new(x: f64, y: f64) -> Result<Self, PivotError> {
        for v in [x, y] {
            if !(0.0..=1.0).contains(&v) || v.is_nan() {
                return Err(PivotError::OutOfRange(v));
            }
        }
        Ok(Self { x, y })
    }

    /// Look up a pivot by its configuration name.
    pub fn from_name(name: &str) -> Result<Self, PivotError> {
        match name {
            "center" => Ok(Self::CENTER),
            "left" => Ok(Self::LEFT),
            "right" => Ok(Self::RIGHT),
            "top" => Ok(Self::TOP),
            "bottom" => Ok(Self::BOTTOM),
            "top-left" => Ok(Self::TOP_LEFT),
            "top-right" => Ok(Self::TOP_RIGHT),
            "bottom-left" => Ok(Self::BOTTOM_LEFT),
            "bottom-right" => Ok(Self::BOTTOM_RIGHT),
            _ => Err(PivotError::UnknownName(name.to_string())),
        }
    }
}

impl FromStr for Pivot {
    type Err = PivotError;

    /// Parse either a named pivot (`"bottom"`) or a coordinate pair
    /// (`"0.6,0.75"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((x, y)) = s.split_once(',') {
            let x: f64 =
                x.trim().parse().map_err(|_| PivotError::Malformed(s.to_string()))?;
            let y: f64 =
                y.trim().parse().map_err(|_| PivotError::Malformed(s.to_string()))?;
            return Pivot::new(x, y);
        }
        Pivot::from_name(s)
    }
}

impl std::fmt::Display for Pivot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
