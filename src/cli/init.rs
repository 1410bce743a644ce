//! Init command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::init::init_project;

/// Run the init command
pub fn run_init(path: Option<&Path>, name: Option<&str>) -> ExitCode {
    let target = path.unwrap_or_else(|| Path::new("."));

    let name = match name {
        Some(name) => name.to_string(),
        None => project_name_from(target),
    };

    match init_project(target, &name) {
        Ok(()) => {
            println!("Created framecrop project '{}'", name);
            println!();
            println!("  {}/", target.display());
            println!("  ├── fcrop.toml");
            println!("  └── frames/");
            println!();
            println!("Drop frame directories under frames/, declare them in");
            println!("fcrop.toml under [[groups]], then run: fcrop crop");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Project name from the target directory, falling back to the current
/// directory's name when initializing in place.
fn project_name_from(target: &Path) -> String {
    let named = if target == Path::new(".") {
        std::env::current_dir().ok().and_then(|p| {
            p.file_name().map(|n| n.to_string_lossy().into_owned())
        })
    } else {
        target.file_name().map(|n| n.to_string_lossy().into_owned())
    };

    named.unwrap_or_else(|| "framecrop-project".to_string())
}
