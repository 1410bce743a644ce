//! The crop pipeline: from configured groups to a mirrored output tree.
//!
//! Each group is processed in two passes. The first pass opens every
//! frame in parallel and extracts its foreground bounding box; the second
//! pass re-opens frames one at a time, crops them to their adjusted box,
//! and writes the mirrored output. Frames are not held in memory between
//! passes, so group size is bounded by the largest single frame.

use crate::adjust::{adjusted_bbox, total_bbox};
use crate::bbox::BoundingBox;
use crate::config::GroupConfig;
use crate::crop::context::CropContext;
use crate::crop::discovery::discover_group_frames;
use crate::crop::result::{FrameResult, GroupReport, GroupStatus, RunSummary};
use crate::marker::{draw_marker, pivot_pixel, MARKER_COLOR};
use crate::output::{crop_image, mirrored_path, save_png};
use crate::pivot::Pivot;
use crate::terminal;
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Error that aborts a crop run before any group is processed.
#[derive(Debug)]
pub enum CropError {
    /// A `--group` filter named a group that does not exist
    UnknownGroup(String),
}

impl std::fmt::Display for CropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropError::UnknownGroup(name) => {
                write!(f, "No group named '{}' in the configuration", name)
            }
        }
    }
}

impl std::error::Error for CropError {}

/// Pipeline that crops every configured group.
pub struct CropPipeline {
    context: CropContext,
    fail_fast: bool,
}

impl CropPipeline {
    /// Create a new pipeline from a crop context.
    pub fn new(context: CropContext) -> Self {
        Self { context, fail_fast: false }
    }

    /// Stop after the first group that does not succeed.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run the pipeline over every configured group.
    ///
    /// Problems inside a group (unreadable frames, a group with no
    /// foreground pixels) are recorded in the summary rather than
    /// aborting the run; later groups still get processed.
    pub fn run(&self) -> Result<RunSummary, CropError> {
        let start = Instant::now();
        let groups = self.selected_groups()?;

        let mut summary = RunSummary::new();
        for group in groups {
            if self.context.is_verbose() {
                println!("Cropping group '{}'", group.display_name());
            }
            let report = self.crop_group(group);
            let failed = !report.is_success();
            summary.add_report(report);
            if failed && self.fail_fast {
                break;
            }
        }

        summary.total_duration = start.elapsed();
        Ok(summary)
    }

    /// Resolve the `--group` filter against the configured groups.
    fn selected_groups(&self) -> Result<Vec<&GroupConfig>, CropError> {
        let groups = &self.context.config().groups;

        match self.context.group_filter() {
            None => Ok(groups.iter().collect()),
            Some(filter) => {
                for name in filter {
                    if !groups.iter().any(|g| g.display_name() == name) {
                        return Err(CropError::UnknownGroup(name.clone()));
                    }
                }
                Ok(groups
                    .iter()
                    .filter(|g| filter.iter().any(|n| g.display_name() == n))
                    .collect())
            }
        }
    }

    /// Crop one group: discover frames, compute the shared envelope,
    /// write every frame's adjusted crop.
    fn crop_group(&self, group: &GroupConfig) -> GroupReport {
        let start = Instant::now();
        let name = group.display_name().to_string();

        // Validated at load time, so this only fails for configs built
        // programmatically with a bad pivot.
        let pivot = match group.pivot.resolve() {
            Ok(p) => p,
            Err(e) => return GroupReport::failed(name, Pivot::CENTER, e.to_string()),
        };

        let src_dir = self.context.src_dir();
        let frames = match discover_group_frames(&src_dir, &group.dirs) {
            Ok(frames) => frames,
            Err(e) => {
                let mut report = GroupReport::failed(name, pivot, e.to_string());
                report.duration = start.elapsed();
                return report;
            }
        };

        let mut report = GroupReport::new(name, pivot);

        // First pass: foreground boxes, in parallel.
        let extracted: Vec<(PathBuf, Result<Option<BoundingBox>, String>)> = frames
            .par_iter()
            .map(|frame| (frame.clone(), extract_bbox(frame)))
            .collect();

        let mut boxed_frames = Vec::new();
        for (frame, result) in extracted {
            match result {
                Ok(Some(bbox)) => boxed_frames.push((frame, bbox)),
                Ok(None) => {
                    terminal::warn(&format!(
                        "Frame {} is fully transparent, skipping",
                        frame.display()
                    ));
                    report.frames.push(FrameResult::empty(frame));
                }
                Err(e) => {
                    terminal::error(&format!("Failed to read {}: {}", frame.display(), e));
                    report.frames.push(FrameResult::failed(frame, e));
                }
            }
        }

        let grid = self.context.grid();
        let total = match total_bbox(boxed_frames.iter().map(|(_, b)| Some(*b)), grid) {
            Ok(total) => total,
            Err(_) => {
                terminal::warn(&format!(
                    "Group '{}' has no frames with foreground pixels",
                    report.name
                ));
                report.status = GroupStatus::Empty;
                report.duration = start.elapsed();
                return report;
            }
        };
        report.total_bounds = Some(total);

        // Second pass: crop and write, sequentially.
        let out_dir = self.context.out_dir();
        for (frame, bbox) in boxed_frames {
            let crop_box = adjusted_bbox(&bbox, &total, pivot, grid);
            let output = mirrored_path(&frame, &src_dir, &out_dir);
            report.frames.push(self.write_frame(&frame, output, &crop_box, pivot));
        }

        report.duration = start.elapsed();
        report
    }

    /// Crop a single frame to its box and write the mirrored output.
    fn write_frame(
        &self,
        frame: &Path,
        output: PathBuf,
        crop_box: &BoundingBox,
        pivot: Pivot,
    ) -> FrameResult {
        let image = match open_rgba(frame) {
            Ok(image) => image,
            Err(e) => return FrameResult::failed(frame.to_path_buf(), e),
        };

        let mut cropped = crop_image(&image, crop_box);
        if self.context.debug_pivot() {
            let center = pivot_pixel(cropped.width(), cropped.height(), pivot);
            draw_marker(&mut cropped, center, self.context.marker_radius(), MARKER_COLOR);
        }

        if self.context.is_verbose() {
            println!("  {} -> {} {}", frame.display(), output.display(), crop_box);
        }

        if self.context.is_dry_run() {
            return FrameResult::skipped(frame.to_path_buf(), output);
        }

        match save_png(&cropped, &output) {
            Ok(()) => FrameResult::written(frame.to_path_buf(), output),
            Err(e) => FrameResult::failed(frame.to_path_buf(), e.to_string()),
        }
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage, String> {
    image::open(path).map(|i| i.to_rgba8()).map_err(|e| e.to_string())
}

/// Open a frame and extract its foreground bounding box.
///
/// `Ok(None)` means the frame decoded but has no opaque pixels.
fn extract_bbox(path: &Path) -> Result<Option<BoundingBox>, String> {
    let image = open_rgba(path)?;
    Ok(BoundingBox::from_image(&image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DefaultsConfig, FcropConfig, PivotSpec, ProjectConfig, WatchConfig,
    };
    use image::Rgba;
    use tempfile::TempDir;

    fn write_frame_png(path: &Path, size: u32, fill: BoundingBox) {
        let mut image = RgbaImage::new(size, size);
        for y in fill.min_y..fill.max_y {
            for x in fill.min_x..fill.max_x {
                image.put_pixel(x as u32, y as u32, Rgba([200, 100, 50, 255]));
            }
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        image.save(path).unwrap();
    }

    fn test_config(groups: Vec<GroupConfig>) -> FcropConfig {
        FcropConfig {
            project: ProjectConfig {
                name: "test".to_string(),
                src: PathBuf::from("frames"),
                out: PathBuf::from("build"),
            },
            defaults: DefaultsConfig::default(),
            watch: WatchConfig::default(),
            groups,
        }
    }

    fn walk_group() -> GroupConfig {
        GroupConfig {
            name: Some("walk".to_string()),
            pivot: PivotSpec::Named("center".to_string()),
            dirs: vec!["walk".to_string()],
        }
    }

    #[test]
    fn test_pipeline_crops_group() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        write_frame_png(&frames.join("walk/a.png"), 100, BoundingBox::new(20, 20, 80, 80));
        write_frame_png(&frames.join("walk/b.png"), 100, BoundingBox::new(30, 40, 70, 60));

        let context =
            CropContext::new(test_config(vec![walk_group()]), temp.path().to_path_buf());
        let summary = CropPipeline::new(context).run().unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.written_count(), 2);
        // Envelope (20, 20, 80, 80) is already aligned to the default grid.
        assert_eq!(
            summary.groups[0].total_bounds,
            Some(BoundingBox::new(20, 20, 80, 80))
        );

        // a fills the envelope; b has equal margins on both axes so it
        // keeps its own box, widened only by grid rounding: (30, 40, 70, 60)
        // becomes (28, 40, 72, 60).
        let out_a = image::open(temp.path().join("build/walk/a.png")).unwrap();
        assert_eq!(out_a.to_rgba8().dimensions(), (60, 60));
        let out_b = image::open(temp.path().join("build/walk/b.png")).unwrap();
        assert_eq!(out_b.to_rgba8().dimensions(), (44, 20));
    }

    #[test]
    fn test_pipeline_empty_group_reports_failure() {
        let temp = TempDir::new().unwrap();
        let blank = RgbaImage::new(32, 32);
        std::fs::create_dir_all(temp.path().join("frames/walk")).unwrap();
        blank.save(temp.path().join("frames/walk/blank.png")).unwrap();

        let context =
            CropContext::new(test_config(vec![walk_group()]), temp.path().to_path_buf());
        let summary = CropPipeline::new(context).run().unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.groups[0].status, GroupStatus::Empty);
        assert!(!temp.path().join("build/walk/blank.png").exists());
    }

    #[test]
    fn test_pipeline_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        write_frame_png(&frames.join("walk/a.png"), 100, BoundingBox::new(20, 20, 80, 80));

        let context =
            CropContext::new(test_config(vec![walk_group()]), temp.path().to_path_buf())
                .with_dry_run(true);
        let summary = CropPipeline::new(context).run().unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.written_count(), 1);
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn test_pipeline_group_filter() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        write_frame_png(&frames.join("walk/a.png"), 100, BoundingBox::new(20, 20, 80, 80));
        write_frame_png(&frames.join("jump/a.png"), 100, BoundingBox::new(20, 20, 80, 80));

        let jump = GroupConfig {
            name: Some("jump".to_string()),
            pivot: PivotSpec::Named("bottom".to_string()),
            dirs: vec!["jump".to_string()],
        };

        let context = CropContext::new(
            test_config(vec![walk_group(), jump]),
            temp.path().to_path_buf(),
        )
        .with_filter(vec!["jump".to_string()]);
        let summary = CropPipeline::new(context).run().unwrap();

        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].name, "jump");
        assert!(temp.path().join("build/jump/a.png").exists());
        assert!(!temp.path().join("build/walk/a.png").exists());
    }

    #[test]
    fn test_pipeline_unknown_group_filter_errors() {
        let temp = TempDir::new().unwrap();
        let context =
            CropContext::new(test_config(vec![walk_group()]), temp.path().to_path_buf())
                .with_filter(vec!["nope".to_string()]);

        let result = CropPipeline::new(context).run();
        assert!(matches!(result, Err(CropError::UnknownGroup(_))));
    }

    #[test]
    fn test_pipeline_fail_fast_stops_after_failed_group() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        // walk has no frames at all, jump is healthy.
        std::fs::create_dir_all(frames.join("walk")).unwrap();
        write_frame_png(&frames.join("jump/a.png"), 100, BoundingBox::new(20, 20, 80, 80));

        let jump = GroupConfig {
            name: Some("jump".to_string()),
            pivot: PivotSpec::Named("center".to_string()),
            dirs: vec!["jump".to_string()],
        };

        let context = CropContext::new(
            test_config(vec![walk_group(), jump]),
            temp.path().to_path_buf(),
        );
        let summary = CropPipeline::new(context).with_fail_fast(true).run().unwrap();

        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].status, GroupStatus::Empty);
        assert!(!temp.path().join("build/jump/a.png").exists());
    }

    #[test]
    fn test_pipeline_no_groups_is_noop() {
        let temp = TempDir::new().unwrap();
        let context = CropContext::new(test_config(Vec::new()), temp.path().to_path_buf());

        let summary = CropPipeline::new(context).run().unwrap();
        assert!(summary.is_success());
        assert!(summary.groups.is_empty());
    }

    #[test]
    fn test_pipeline_empty_frame_excluded_from_envelope() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        write_frame_png(&frames.join("walk/a.png"), 100, BoundingBox::new(20, 20, 80, 80));
        let blank = RgbaImage::new(100, 100);
        blank.save(frames.join("walk/blank.png")).unwrap();

        let context =
            CropContext::new(test_config(vec![walk_group()]), temp.path().to_path_buf());
        let summary = CropPipeline::new(context).run().unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.written_count(), 1);
        assert_eq!(summary.empty_frame_count(), 1);
        assert!(!temp.path().join("build/walk/blank.png").exists());
    }

    #[test]
    fn test_pipeline_debug_pivot_draws_marker() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        write_frame_png(&frames.join("walk/a.png"), 100, BoundingBox::new(20, 20, 80, 80));

        let mut config = test_config(vec![walk_group()]);
        config.defaults.debug_pivot = true;
        let context = CropContext::new(config, temp.path().to_path_buf());
        CropPipeline::new(context).run().unwrap();

        // Center pivot on a 60x60 output puts the marker at (30, 30).
        let out = image::open(temp.path().join("build/walk/a.png")).unwrap().to_rgba8();
        assert_eq!(*out.get_pixel(30, 30), MARKER_COLOR);
    }

    #[test]
    fn test_pipeline_mirrors_nested_directories() {
        let temp = TempDir::new().unwrap();
        let frames = temp.path().join("frames");
        write_frame_png(
            &frames.join("Motion/A/Walk/Walk2a.png"),
            100,
            BoundingBox::new(20, 20, 80, 80),
        );

        let group = GroupConfig {
            name: None,
            pivot: PivotSpec::Named("bottom".to_string()),
            dirs: vec!["Motion".to_string()],
        };
        let context =
            CropContext::new(test_config(vec![group]), temp.path().to_path_buf());
        let summary = CropPipeline::new(context).run().unwrap();

        assert!(summary.is_success());
        assert!(temp.path().join("build/Motion/A/Walk/Walk2a.png").exists());
    }
}
