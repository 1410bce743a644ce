//! Inspect command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::bbox::BoundingBox;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct InspectReport {
    path: PathBuf,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rounded: Option<BoundingBox>,
}

/// Run the inspect command: print each frame's foreground bounding box.
pub fn run_inspect(files: &[PathBuf], grid: i32, json: bool) -> ExitCode {
    let mut reports = Vec::new();
    let mut failed = false;

    for path in files {
        match inspect_frame(path, grid) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&reports) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for report in &reports {
            match (&report.bounds, &report.rounded) {
                (Some(bounds), Some(rounded)) => {
                    println!(
                        "{}: {}x{} bounds {} rounded {}",
                        report.path.display(),
                        report.width,
                        report.height,
                        bounds,
                        rounded
                    );
                }
                _ => {
                    println!(
                        "{}: {}x{} empty (no foreground pixels)",
                        report.path.display(),
                        report.width,
                        report.height
                    );
                }
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}

fn inspect_frame(path: &Path, grid: i32) -> Result<InspectReport, image::ImageError> {
    let image = image::open(path)?.to_rgba8();
    let bounds = BoundingBox::from_image(&image);
    let rounded = bounds.map(|mut b| {
        b.round_bounds(grid);
        b
    });

    Ok(InspectReport {
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        bounds,
        rounded,
    })
}
