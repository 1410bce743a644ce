//! Framecrop - Library for batch-cropping transparent PNG animation frames
//!
//! This library provides functionality to:
//! - Extract foreground bounding boxes from transparent PNG frames
//! - Aggregate frame boxes into one shared, grid-aligned envelope per group
//! - Adjust each frame's crop so a pivot point keeps its relative position
//! - Write cropped frames into a mirrored output tree

pub mod adjust;
pub mod bbox;
pub mod cli;
pub mod config;
pub mod crop;
pub mod init;
pub mod marker;
pub mod output;
pub mod pivot;
pub mod terminal;
pub mod watch;
