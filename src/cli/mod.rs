//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod crop;
mod init;
mod inspect;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Framecrop - Crop animation frame sequences to a shared pivot-preserving box
#[derive(Parser)]
#[command(name = "fcrop")]
#[command(about = "Framecrop - Batch-crop PNG animation frames around a shared pivot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crop every configured group into the output tree
    Crop {
        /// Path to fcrop.toml (default: search upward from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the input root the frame directories live under
        #[arg(long)]
        root: Option<PathBuf>,

        /// Override the output root
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Crop only the named group (repeatable)
        #[arg(short, long)]
        group: Vec<String>,

        /// Override the grid size crop edges are aligned to
        #[arg(long)]
        grid: Option<i32>,

        /// Draw a pivot marker on every output frame
        #[arg(long)]
        debug_pivot: bool,

        /// Report what would be written without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Watch the input root and re-crop on changes
        #[arg(short, long)]
        watch: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        /// Print per-frame progress
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the foreground bounding box of individual frames
    Inspect {
        /// PNG frames to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Grid size used for the rounded bounds
        #[arg(long, default_value = "4")]
        grid: i32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new framecrop project
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<PathBuf>,

        /// Project name (default: directory name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Parse arguments and dispatch to the subcommand implementations.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crop {
            config,
            root,
            out,
            group,
            grid,
            debug_pivot,
            dry_run,
            watch,
            json,
            verbose,
        } => crop::run_crop(
            config.as_deref(),
            root.as_deref(),
            out.as_deref(),
            &group,
            grid,
            debug_pivot,
            dry_run,
            watch,
            json,
            verbose,
        ),
        Commands::Inspect { files, grid, json } => inspect::run_inspect(&files, grid, json),
        Commands::Init { path, name } => init::run_init(path.as_deref(), name.as_deref()),
    }
}
