//! Project initialization for framecrop
//!
//! Scaffolds a new project: an `fcrop.toml` with a commented group
//! example plus an empty frames directory.

use std::fs;
use std::path::Path;

/// Error during project initialization
#[derive(Debug)]
pub enum InitError {
    /// An fcrop.toml already exists at the target
    ConfigExists(String),
    /// Failed to create directory
    CreateDir(std::io::Error),
    /// Failed to write file
    WriteFile(std::io::Error),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::ConfigExists(path) => {
                write!(f, "fcrop.toml already exists: {}", path)
            }
            InitError::CreateDir(e) => write!(f, "Failed to create directory: {}", e),
            InitError::WriteFile(e) => write!(f, "Failed to write file: {}", e),
        }
    }
}

impl std::error::Error for InitError {}

/// Initialize a new framecrop project.
///
/// Creates `path` if needed, writes a starter `fcrop.toml`, and creates
/// the frames directory. Refuses to overwrite an existing config.
pub fn init_project(path: &Path, name: &str) -> Result<(), InitError> {
    let config_path = path.join("fcrop.toml");
    if config_path.exists() {
        return Err(InitError::ConfigExists(config_path.display().to_string()));
    }

    create_dir(path)?;
    create_dir(&path.join("frames"))?;

    write_file(&config_path, &generate_config(name))?;

    Ok(())
}

fn create_dir(path: &Path) -> Result<(), InitError> {
    fs::create_dir_all(path).map_err(InitError::CreateDir)
}

fn write_file(path: &Path, contents: &str) -> Result<(), InitError> {
    fs::write(path, contents).map_err(InitError::WriteFile)
}

fn generate_config(name: &str) -> String {
    format!(
        r#"# Framecrop project configuration
[project]
name = "{}"
src = "frames"
out = "build"

[defaults]
# Crop edges are aligned outward to this grid.
grid = 4
# Set to true to paint a marker at each frame's pivot.
# debug_pivot = true

# Each group shares one crop envelope across its directories.
#
# [[groups]]
# name = "walk"
# pivot = "bottom"           # or [0.5, 1.0]
# dirs = ["walk", "walk-flipped"]
"#,
        name
    )
}
