//! Framecrop - Command-line tool for cropping PNG animation frame sequences

use std::process::ExitCode;

use framecrop::cli;

fn main() -> ExitCode {
    cli::run()
}
