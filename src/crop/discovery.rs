//! Frame discovery for the crop pipeline.
//!
//! Finds `.png` frames under a group's directories, recursively. Frames
//! are sorted within each directory; directories keep their declared
//! order so reports read the way the config is written.

use glob::glob;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Error during frame discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    InvalidPattern(String, glob::PatternError),
    /// IO error during file enumeration
    Io(std::io::Error),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::InvalidPattern(pattern, err) => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, err)
            }
            DiscoveryError::Io(err) => write!(f, "IO error during discovery: {}", err),
        }
    }
}

impl std::error::Error for DiscoveryError {}

impl From<std::io::Error> for DiscoveryError {
    fn from(err: std::io::Error) -> Self {
        DiscoveryError::Io(err)
    }
}

/// Check if a path is a PNG frame (case-insensitive extension).
fn is_png_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Discover all PNG frames under a directory, recursively, sorted.
pub fn discover_frames(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let pattern = format!("{}/**/*.png", dir.display());

    let paths =
        glob(&pattern).map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() && is_png_file(&path) {
                    files.push(path);
                }
            }
            Err(e) => {
                // Log but continue on glob errors
                eprintln!("Warning: error reading path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Discover the frames for one group: each configured directory in its
/// declared order, sorted within the directory, deduplicated across
/// overlapping directories.
pub fn discover_group_frames(
    root: &Path,
    dirs: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut frames = Vec::new();

    for dir in dirs {
        for frame in discover_frames(&root.join(dir))? {
            if seen.insert(frame.clone()) {
                frames.push(frame);
            }
        }
    }

    Ok(frames)
}
