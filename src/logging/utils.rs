//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::fs;
use std::path::{Path, PathBuf};

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range).
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve `homestage/` under `cache_home`, or under `$HOME/.cache` when unset.
fn cache_dir_in(cache_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    cache_home
        .unwrap_or_else(|| home.unwrap_or_else(|| PathBuf::from(".")).join(".cache"))
        .join("homestage")
}

/// Return the `$XDG_CACHE_HOME/homestage/` directory, creating it if needed.
pub(super) fn homestage_cache_dir() -> Option<PathBuf> {
    let dir = cache_dir_in(
        std::env::var_os("XDG_CACHE_HOME").map(PathBuf::from),
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from),
    );
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path for `command` inside `dir`.
pub(super) fn log_file_in(dir: &Path, command: &str) -> PathBuf {
    dir.join(format!("{command}.log"))
}

/// Return the log file path under `$XDG_CACHE_HOME/homestage/` (or `~/.cache/homestage/`).
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(log_file_in(&homestage_cache_dir()?, command))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
