//! Crop run result types.
//!
//! Contains types for representing the outcome of a crop run, both for
//! the human summary and the `--json` report.

use crate::bbox::BoundingBox;
use crate::pivot::Pivot;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

fn duration_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Status of a single frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    /// Cropped and written
    Written,
    /// Would have been written (dry run)
    Skipped,
    /// No foreground pixels; excluded from the group
    Empty,
    /// Unreadable or unwritable
    Failed(String),
}

impl FrameStatus {
    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, FrameStatus::Failed(_))
    }
}

impl std::fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameStatus::Written => write!(f, "written"),
            FrameStatus::Skipped => write!(f, "skipped"),
            FrameStatus::Empty => write!(f, "empty"),
            FrameStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of processing a single frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    /// Source frame path
    pub source: PathBuf,
    /// Output path (None for empty or failed frames)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Frame status
    pub status: FrameStatus,
}

impl FrameResult {
    /// A frame that was cropped and written.
    pub fn written(source: PathBuf, output: PathBuf) -> Self {
        Self { source, output: Some(output), status: FrameStatus::Written }
    }

    /// A frame that would have been written (dry run).
    pub fn skipped(source: PathBuf, output: PathBuf) -> Self {
        Self { source, output: Some(output), status: FrameStatus::Skipped }
    }

    /// A frame with no foreground pixels.
    pub fn empty(source: PathBuf) -> Self {
        Self { source, output: None, status: FrameStatus::Empty }
    }

    /// A frame that failed to read or write.
    pub fn failed(source: PathBuf, error: String) -> Self {
        Self { source, output: None, status: FrameStatus::Failed(error) }
    }
}

/// Status of a whole group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// Total box computed and frames cropped
    Cropped,
    /// No frame in the group had foreground pixels (or no frames at all)
    Empty,
    /// The group could not be processed
    Failed(String),
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupStatus::Cropped => write!(f, "cropped"),
            GroupStatus::Empty => write!(f, "empty"),
            GroupStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Report for one directory group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    /// Group name
    pub name: String,
    /// Pivot used for the group
    pub pivot: Pivot,
    /// Group status
    pub status: GroupStatus,
    /// The shared envelope, when one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bounds: Option<BoundingBox>,
    /// Per-frame results
    pub frames: Vec<FrameResult>,
    /// Processing duration
    #[serde(rename = "duration_ms", serialize_with = "duration_millis")]
    pub duration: Duration,
}

impl GroupReport {
    /// Create a report with no frames yet.
    pub fn new(name: String, pivot: Pivot) -> Self {
        Self {
            name,
            pivot,
            status: GroupStatus::Cropped,
            total_bounds: None,
            frames: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// A group that failed outright.
    pub fn failed(name: String, pivot: Pivot, error: String) -> Self {
        Self { status: GroupStatus::Failed(error), ..Self::new(name, pivot) }
    }

    /// Check if the group succeeded: cropped, with no failed frames.
    pub fn is_success(&self) -> bool {
        self.status == GroupStatus::Cropped
            && self.frames.iter().all(|f| !f.status.is_failure())
    }

    /// Number of frames written (or skipped in a dry run).
    pub fn written_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f.status, FrameStatus::Written | FrameStatus::Skipped))
            .count()
    }
}

/// Result of a complete crop run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Reports for each group
    pub groups: Vec<GroupReport>,
    /// Total run duration
    #[serde(rename = "total_duration_ms", serialize_with = "duration_millis")]
    pub total_duration: Duration,
}

impl RunSummary {
    /// Create a new empty run summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group report.
    pub fn add_report(&mut self, report: GroupReport) {
        self.groups.push(report);
    }

    /// Total frames written (or skipped in a dry run) across all groups.
    pub fn written_count(&self) -> usize {
        self.groups.iter().map(|g| g.written_count()).sum()
    }

    /// Total empty frames across all groups.
    pub fn empty_frame_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.frames.iter())
            .filter(|f| f.status == FrameStatus::Empty)
            .count()
    }

    /// Frames that failed, across all groups.
    pub fn failed_frames(&self) -> Vec<&FrameResult> {
        self.groups
            .iter()
            .flat_map(|g| g.frames.iter())
            .filter(|f| f.status.is_failure())
            .collect()
    }

    /// Groups that did not succeed (empty or failed).
    pub fn failed_groups(&self) -> Vec<&GroupReport> {
        self.groups.iter().filter(|g| !g.is_success()).collect()
    }

    /// Check if the overall run succeeded.
    ///
    /// A run with zero groups is a successful no-op; a run with any
    /// empty or failed group, or any failed frame, is a failure.
    pub fn is_success(&self) -> bool {
        self.failed_groups().is_empty()
    }

    /// Format a summary of the run.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let total = self.groups.len();
        let written = self.written_count();
        let failed_groups = self.failed_groups();
        let failed_frames = self.failed_frames();

        if total == 0 {
            lines.push("Nothing to crop (no groups configured)".to_string());
        } else if failed_groups.is_empty() {
            lines.push(format!(
                "Crop succeeded: {} frame{} written across {} group{} in {:?}",
                written,
                if written == 1 { "" } else { "s" },
                total,
                if total == 1 { "" } else { "s" },
                self.total_duration
            ));
        } else {
            lines.push(format!(
                "Crop failed: {} of {} group{} had problems",
                failed_groups.len(),
                total,
                if total == 1 { "" } else { "s" }
            ));
            for group in &failed_groups {
                lines.push(format!("  - {}: {}", group.name, group.status));
            }
            for frame in &failed_frames {
                lines.push(format!("  - {}: {}", frame.source.display(), frame.status));
            }
        }

        let empty = self.empty_frame_count();
        if empty > 0 {
            lines.push(format!(
                "{} empty frame{} skipped",
                empty,
                if empty == 1 { "" } else { "s" }
            ));
        }

        lines.join("\n")
    }
}
