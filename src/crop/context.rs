//! Crop context containing configuration and state for a run.

use crate::config::FcropConfig;
use std::path::{Path, PathBuf};

/// Context for a crop run: the loaded configuration plus run options.
#[derive(Debug, Clone)]
pub struct CropContext {
    /// The loaded configuration
    config: FcropConfig,
    /// Project root directory (where fcrop.toml is located)
    project_root: PathBuf,
    /// Whether to print per-frame progress
    verbose: bool,
    /// Whether to report without writing outputs
    dry_run: bool,
    /// Optional filter to crop specific groups only
    group_filter: Option<Vec<String>>,
}

impl CropContext {
    /// Create a new crop context.
    pub fn new(config: FcropConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, verbose: false, dry_run: false, group_filter: None }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FcropConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the input root (resolved to an absolute path).
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Get the output root (resolved to an absolute path).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set a filter to crop only the named groups.
    pub fn with_filter(mut self, groups: Vec<String>) -> Self {
        self.group_filter = Some(groups);
        self
    }

    /// Get the group filter.
    pub fn group_filter(&self) -> Option<&[String]> {
        self.group_filter.as_deref()
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Get the grid size from config.
    pub fn grid(&self) -> i32 {
        self.config.defaults.grid
    }

    /// Whether the pivot marker is drawn on outputs.
    pub fn debug_pivot(&self) -> bool {
        self.config.defaults.debug_pivot
    }

    /// Get the marker half-size from config.
    pub fn marker_radius(&self) -> i32 {
        self.config.defaults.marker_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    #[test]
    fn test_crop_context_new() {
        let config = default_config();
        let root = PathBuf::from("/project");
        let ctx = CropContext::new(config, root.clone());

        assert_eq!(ctx.project_root(), &root);
        assert!(!ctx.is_verbose());
        assert!(!ctx.is_dry_run());
        assert!(ctx.group_filter().is_none());
    }

    #[test]
    fn test_crop_context_with_options() {
        let config = default_config();
        let ctx = CropContext::new(config, PathBuf::from("/project"))
            .with_verbose(true)
            .with_dry_run(true)
            .with_filter(vec!["walk".to_string()]);

        assert!(ctx.is_verbose());
        assert!(ctx.is_dry_run());
        assert_eq!(ctx.group_filter(), Some(&["walk".to_string()][..]));
    }

    #[test]
    fn test_crop_context_dirs() {
        let config = default_config();
        let ctx = CropContext::new(config, PathBuf::from("/project"));

        assert_eq!(ctx.src_dir(), PathBuf::from("/project/frames"));
        assert_eq!(ctx.out_dir(), PathBuf::from("/project/build"));
    }

    #[test]
    fn test_crop_context_resolve_path_absolute() {
        let config = default_config();
        let ctx = CropContext::new(config, PathBuf::from("/project"));

        assert_eq!(ctx.resolve_path(Path::new("/other/path")), PathBuf::from("/other/path"));
        assert_eq!(ctx.resolve_path(Path::new("frames")), PathBuf::from("/project/frames"));
    }

    #[test]
    fn test_crop_context_defaults() {
        let config = default_config();
        let ctx = CropContext::new(config, PathBuf::from("/project"));

        assert_eq!(ctx.grid(), 4);
        assert!(!ctx.debug_pivot());
        assert_eq!(ctx.marker_radius(), 4);
    }
}
