//! Application-wide constants.
//!
//! Centralizes refresh cadences, fallback markers, layout sizes and paths.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Minimum allowed refresh cadence (ms) for either timer.
pub const MIN_REFRESH_MS: u64 = 250;
/// Default process list refresh cadence (ms).
pub const DEFAULT_PROCESS_REFRESH_MS: u64 = 2000;
/// Default system info refresh cadence (ms).
pub const DEFAULT_SYSTEM_REFRESH_MS: u64 = 1000;
/// Delay between CPU priming and the real CPU sample (ms).
pub const CPU_SETTLE_MS: u64 = 100;
/// Event poll timeout (ms) -- how often the UI checks for input.
pub const EVENT_POLL_MS: u64 = 50;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;

// ── CLI ───────────────────────────────────────────────────────────
/// Rows printed by `proc-peek list` when `--count` is not given.
pub const DEFAULT_LIST_COUNT: usize = 10;

// ── Fallback markers ──────────────────────────────────────────────
/// Name used for a process whose handle could not be opened.
pub const NOT_AVAILABLE: &str = "[Process not available]";
/// Placeholder for string fields the OS refused to reveal.
pub const ACCESS_DENIED: &str = "[Access Denied]";
/// Placeholder for an unknown owner.
pub const UNKNOWN_USER: &str = "unknown";

// ── UI Layout ─────────────────────────────────────────────────────
/// Page up/down step size.
pub const PAGE_SIZE: usize = 20;
/// Height of the system info panel (including borders).
pub const SYSTEM_PANEL_HEIGHT: u16 = 7;
/// Percentage of the body width given to the process table.
pub const TABLE_WIDTH_PCT: u16 = 62;
/// Help overlay width.
pub const HELP_POPUP_WIDTH: u16 = 52;
/// Help overlay height.
pub const HELP_POPUP_HEIGHT: u16 = 24;
/// Kill confirmation dialog width.
pub const CONFIRM_POPUP_WIDTH: u16 = 56;
/// Kill confirmation dialog height.
pub const CONFIRM_POPUP_HEIGHT: u16 = 9;

// ── Usage Color Thresholds ────────────────────────────────────────
/// Usage percentage above which color is "critical".
pub const USAGE_CRITICAL_PCT: f32 = 90.0;
/// Usage percentage above which color is "high".
pub const USAGE_HIGH_PCT: f32 = 70.0;
/// Usage percentage above which color is "mid".
pub const USAGE_MID_PCT: f32 = 40.0;
/// Temperature above which color is "critical" (Celsius).
pub const TEMP_CRITICAL_C: f32 = 90.0;
/// Temperature above which color is "high" (Celsius).
pub const TEMP_HIGH_C: f32 = 75.0;
/// Temperature above which color is "mid" (Celsius).
pub const TEMP_MID_C: f32 = 60.0;

// ── Logging ───────────────────────────────────────────────────────
/// Default tracing filter when neither RUST_LOG nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "proc-peek.log";

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    PathBuf::from(std::env::var(var).unwrap_or_else(|_| std::env::temp_dir().display().to_string()))
}

/// Returns `~/.config/proc-peek/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("proc-peek")
}

/// Returns `~/.config/proc-peek/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.local/share/proc-peek/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("proc-peek")
}

/// Disk whose usage is reported in the system panel when the config does not name one.
pub fn default_disk_path() -> String {
    if cfg!(windows) {
        std::env::var("SYSTEMDRIVE").unwrap_or_else(|_| "C:".to_string())
    } else {
        "/".to_string()
    }
}
