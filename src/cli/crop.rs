//! Crop command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::{find_config, load_config, merge_cli_overrides, CliOverrides};
use crate::crop::{CropContext, CropError, CropPipeline};

/// Run the crop command
pub fn run_crop(
    config_path: Option<&Path>,
    root: Option<&Path>,
    out: Option<&Path>,
    groups: &[String],
    grid: Option<i32>,
    debug_pivot: bool,
    dry_run: bool,
    watch: bool,
    json: bool,
    verbose: bool,
) -> ExitCode {
    // Find the config file and determine the project root.
    let (config, project_root) = match config_path.map(Path::to_path_buf).or_else(find_config) {
        Some(path) => {
            if verbose {
                println!("Using config: {}", path.display());
            }
            let config = match load_config(Some(&path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            };
            let root = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
            (config, root)
        }
        None => {
            if verbose {
                println!("No fcrop.toml found, using defaults");
            }
            let root = std::env::current_dir().unwrap_or_default();
            (crate::config::default_config(), root)
        }
    };

    let mut config = config;
    let overrides = CliOverrides {
        out: out.map(|p| p.to_path_buf()),
        src: root.map(|p| p.to_path_buf()),
        grid,
        debug_pivot: debug_pivot.then_some(true),
    };
    merge_cli_overrides(&mut config, &overrides);

    if config.defaults.grid <= 0 {
        eprintln!("Error: --grid must be a positive integer");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    if config.groups.is_empty() {
        println!("Nothing to crop: no groups configured in fcrop.toml");
        return ExitCode::from(EXIT_SUCCESS);
    }

    let mut context = CropContext::new(config, project_root)
        .with_verbose(verbose)
        .with_dry_run(dry_run);
    if !groups.is_empty() {
        context = context.with_filter(groups.to_vec());
    }

    if watch {
        let watch_config = context.config().watch.clone();

        println!("Starting watch mode...");
        println!("Press Ctrl+C to stop");
        println!();

        return match crate::watch::watch_and_recrop(context, watch_config) {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(e) => {
                eprintln!("Watch error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    match CropPipeline::new(context).run() {
        Ok(summary) => {
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(report) => println!("{}", report),
                    Err(e) => {
                        eprintln!("Error serializing report: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                println!("{}", summary.summary());
            }

            if summary.is_success() {
                ExitCode::from(EXIT_SUCCESS)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e @ CropError::UnknownGroup(_)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
    }
}
