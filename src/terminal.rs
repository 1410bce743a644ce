//! Colored diagnostics on stderr.
//!
//! Warnings and errors get ANSI colors only when stderr is a TTY, so
//! redirected output stays clean.

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// Bright yellow, used for warnings
pub const ANSI_WARNING: &str = "\x1b[93m";

/// Bright red, used for errors
pub const ANSI_FAIL: &str = "\x1b[91m";

fn supports_color() -> bool {
    atty::is(atty::Stream::Stderr)
}

/// Print a warning to stderr, colored when stderr is a TTY.
pub fn warn(message: &str) {
    if supports_color() {
        eprintln!("{}WARNING: {}{}", ANSI_WARNING, message, ANSI_RESET);
    } else {
        eprintln!("WARNING: {}", message);
    }
}

/// Print an error to stderr, colored when stderr is a TTY.
pub fn error(message: &str) {
    if supports_color() {
        eprintln!("{}ERROR: {}{}", ANSI_FAIL, message, ANSI_RESET);
    } else {
        eprintln!("ERROR: {}", message);
    }
}
