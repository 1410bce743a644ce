//! Watch mode for automatic re-crops on file changes
//!
//! Provides file system watching with debouncing for the `fcrop crop --watch`
//! command.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::config::WatchConfig;
use crate::crop::{CropPipeline, CropContext, RunSummary};

/// Error during watch mode
#[derive(Debug)]
pub enum WatchError {
    /// Failed to initialize file watcher
    WatcherInit(notify::Error),
    /// Failed to add watch path
    WatchPath(notify::Error),
    /// Channel receive error
    ChannelError(String),
    /// A `--group` filter named a group that does not exist
    Pipeline(String),
    /// Input root not found
    SourceNotFound(PathBuf),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::WatcherInit(e) => write!(f, "Failed to initialize file watcher: {}", e),
            WatchError::WatchPath(e) => write!(f, "Failed to watch path: {}", e),
            WatchError::ChannelError(msg) => write!(f, "Watch channel error: {}", msg),
            WatchError::Pipeline(msg) => write!(f, "Crop failed: {}", msg),
            WatchError::SourceNotFound(path) => {
                write!(f, "Input root not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for WatchError {}

/// Tracks frames that failed across crop iterations for recovery detection
#[derive(Debug, Default)]
pub struct ErrorTracker {
    /// Frames that failed in the previous run
    failed_frames: HashSet<PathBuf>,
}

impl ErrorTracker {
    /// Create a new error tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Update tracker with a new run summary, returns the frames fixed
    /// since the previous run.
    pub fn update(&mut self, summary: &RunSummary) -> Vec<PathBuf> {
        let current: HashSet<PathBuf> =
            summary.failed_frames().iter().map(|f| f.source.clone()).collect();

        let fixed: Vec<PathBuf> = self.failed_frames.difference(&current).cloned().collect();

        self.failed_frames = current;
        fixed
    }

    /// Check if there are any tracked failures
    pub fn has_errors(&self) -> bool {
        !self.failed_frames.is_empty()
    }

    /// Get the number of failed frames
    pub fn error_count(&self) -> usize {
        self.failed_frames.len()
    }
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
}

/// Format duration for display
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Get current timestamp for logging
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400; // seconds since midnight
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Check if a change to this file should trigger a re-crop
fn is_relevant_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Watch the input root and re-crop every group on changes.
///
/// This function blocks and runs until interrupted (Ctrl+C).
pub fn watch_and_recrop(context: CropContext, config: WatchConfig) -> Result<(), WatchError> {
    let src_dir = context.src_dir();
    if !src_dir.exists() {
        return Err(WatchError::SourceNotFound(src_dir));
    }

    // Create channel for debounced events
    let (tx, rx) = channel();

    let debounce_duration = Duration::from_millis(config.debounce_ms as u64);
    let mut debouncer = new_debouncer(debounce_duration, tx).map_err(WatchError::WatcherInit)?;

    debouncer
        .watcher()
        .watch(&src_dir, RecursiveMode::Recursive)
        .map_err(WatchError::WatchPath)?;

    let pipeline = CropPipeline::new(context);
    let mut error_tracker = ErrorTracker::new();

    // Initial crop
    if config.clear_screen {
        clear_screen();
    }
    println!("[{}] Cropping...", timestamp());
    let summary = pipeline.run().map_err(|e| WatchError::Pipeline(e.to_string()))?;
    print_run_summary(&summary, &[]);
    error_tracker.update(&summary);
    println!("[{}] Watching {} for changes...", timestamp(), src_dir.display());

    // Watch loop
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant_changes: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        matches!(e.kind, DebouncedEventKind::Any) && is_relevant_file(&e.path)
                    })
                    .collect();

                if !relevant_changes.is_empty() {
                    for event in &relevant_changes {
                        if let Some(name) = event.path.file_name() {
                            println!("[{}] Changed: {}", timestamp(), name.to_string_lossy());
                        }
                    }

                    if config.clear_screen {
                        clear_screen();
                    }

                    println!("[{}] Cropping...", timestamp());
                    let summary =
                        pipeline.run().map_err(|e| WatchError::Pipeline(e.to_string()))?;

                    // Track fixed frames before updating the tracker
                    let fixed_frames = error_tracker.update(&summary);
                    print_run_summary(&summary, &fixed_frames);

                    println!(
                        "[{}] Watching {} for changes...",
                        timestamp(),
                        src_dir.display()
                    );
                }
            }
            Ok(Err(error)) => {
                // Watch error (non-fatal) - log but continue watching
                eprintln!("[{}] Watch error: {:?}", timestamp(), error);
                eprintln!("[{}] Continuing to watch...", timestamp());
            }
            Err(e) => {
                return Err(WatchError::ChannelError(e.to_string()));
            }
        }
    }
}

/// Print a run summary to console with fixed frame notifications
fn print_run_summary(summary: &RunSummary, fixed_frames: &[PathBuf]) {
    // Report fixed frames first (before showing new failures)
    for fixed in fixed_frames {
        if let Some(name) = fixed.file_name() {
            println!("[{}] Fixed: {}", timestamp(), name.to_string_lossy());
        }
    }

    if summary.is_success() {
        println!(
            "[{}] Crop complete ({}) - {} frame{} written",
            timestamp(),
            format_duration(summary.total_duration),
            summary.written_count(),
            if summary.written_count() == 1 { "" } else { "s" }
        );
    } else {
        println!(
            "[{}] Crop failed ({})",
            timestamp(),
            format_duration(summary.total_duration)
        );
        for group in summary.failed_groups() {
            eprintln!("[{}] Group '{}': {}", timestamp(), group.name, group.status);
        }
        for frame in summary.failed_frames() {
            eprintln!("[{}] {}: {}", timestamp(), frame.source.display(), frame.status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use crate::crop::{FrameResult, GroupReport};
    use crate::pivot::Pivot;

    fn summary_with_failures(files: &[&str]) -> RunSummary {
        let mut report = GroupReport::new("walk".to_string(), Pivot::CENTER);
        for file in files {
            report
                .frames
                .push(FrameResult::failed(PathBuf::from(file), "unreadable".to_string()));
        }
        let mut summary = RunSummary::new();
        summary.add_report(report);
        summary
    }

    #[test]
    fn test_is_relevant_file() {
        assert!(is_relevant_file(Path::new("frame.png")));
        assert!(is_relevant_file(Path::new("frame.PNG")));
        assert!(!is_relevant_file(Path::new("readme.md")));
        assert!(!is_relevant_file(Path::new("noextension")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.00s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn test_error_tracker_new() {
        let tracker = ErrorTracker::new();
        assert!(!tracker.has_errors());
        assert_eq!(tracker.error_count(), 0);
    }

    #[test]
    fn test_error_tracker_tracks_failures() {
        let mut tracker = ErrorTracker::new();

        let fixed = tracker.update(&summary_with_failures(&["a.png", "b.png"]));
        assert!(fixed.is_empty()); // No fixed frames on first run
        assert!(tracker.has_errors());
        assert_eq!(tracker.error_count(), 2);
    }

    #[test]
    fn test_error_tracker_detects_fixed_frames() {
        let mut tracker = ErrorTracker::new();
        tracker.update(&summary_with_failures(&["a.png", "b.png"]));

        // Second run: a.png is fixed, b.png still fails
        let fixed = tracker.update(&summary_with_failures(&["b.png"]));

        assert_eq!(fixed, vec![PathBuf::from("a.png")]);
        assert!(tracker.has_errors());
        assert_eq!(tracker.error_count(), 1);
    }

    #[test]
    fn test_error_tracker_all_fixed() {
        let mut tracker = ErrorTracker::new();
        tracker.update(&summary_with_failures(&["a.png"]));

        let fixed = tracker.update(&RunSummary::new());
        assert_eq!(fixed, vec![PathBuf::from("a.png")]);
        assert!(!tracker.has_errors());
    }

    #[test]
    fn test_watch_error_source_not_found() {
        let context = CropContext::new(
            default_config(),
            PathBuf::from("/nonexistent/project"),
        );

        let result = watch_and_recrop(context, WatchConfig::default());
        assert!(matches!(result, Err(WatchError::SourceNotFound(_))));
    }
}
