//! Configuration schema types for `fcrop.toml`
//!
//! Defines the structure and validation rules for framecrop project
//! configuration.

use crate::pivot::Pivot;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Input root the frame directories live under
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Output root the cropped tree is mirrored into
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("frames")
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

/// Default settings applied to all groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Grid size crop edges are aligned to
    #[serde(default = "default_grid")]
    pub grid: i32,
    /// Draw the pivot marker on every output frame
    #[serde(default)]
    pub debug_pivot: bool,
    /// Pivot marker half-size in pixels
    #[serde(default = "default_marker_radius")]
    pub marker_radius: i32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            grid: default_grid(),
            debug_pivot: false,
            marker_radius: default_marker_radius(),
        }
    }
}

fn default_grid() -> i32 {
    4
}

fn default_marker_radius() -> i32 {
    4
}

/// Watch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between runs
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100, clear_screen: true }
    }
}

/// Pivot as written in the config file: a name or an `[x, y]` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PivotSpec {
    /// Named pivot ("center", "bottom", "top-left", ...)
    Named(String),
    /// Explicit coordinates in `[0, 1]^2`
    Coords([f64; 2]),
}

impl PivotSpec {
    /// Resolve to a validated [`Pivot`].
    pub fn resolve(&self) -> Result<Pivot, crate::pivot::PivotError> {
        match self {
            PivotSpec::Named(name) => Pivot::from_name(name),
            PivotSpec::Coords([x, y]) => Pivot::new(*x, *y),
        }
    }
}

/// One directory group: a set of directories cropped against a shared
/// bounding box with one pivot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Group name for reports and `--group` filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pivot preserved across the group's frames
    pub pivot: PivotSpec,
    /// Directories (relative to the input root) sharing one total box
    pub dirs: Vec<String>,
}

impl GroupConfig {
    /// Name used in reports: the declared name, or the first directory.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.dirs.first().map(String::as_str).unwrap_or("<unnamed>"),
        }
    }
}

/// Complete fcrop.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcropConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Default settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
    /// Directory groups to crop
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "groups[0].dirs")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fcrop.toml: '{}' {}", self.field, self.message)
    }
}

impl FcropConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.defaults.grid <= 0 {
            errors.push(ConfigValidationError {
                field: "defaults.grid".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.defaults.marker_radius <= 0 {
            errors.push(ConfigValidationError {
                field: "defaults.marker_radius".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        for (i, group) in self.groups.iter().enumerate() {
            if group.dirs.is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("groups[{}].dirs", i),
                    message: "must contain at least one directory".to_string(),
                });
            }

            if let Err(e) = group.pivot.resolve() {
                errors.push(ConfigValidationError {
                    field: format!("groups[{}].pivot", i),
                    message: e.to_string(),
                });
            }
        }

        errors
    }
}
