//! Platform-specific directory utilities.
//!
//! Follows platform conventions through `directories::ProjectDirs`, falling
//! back to local paths when no home directory is known.

use std::path::PathBuf;

const APPLICATION: &str = "effect-engine";

/// Platform-specific log directory.
///
/// - macOS: `~/Library/Caches/effect-engine/logs`
/// - Linux: `~/.cache/effect-engine/logs` (or `$XDG_CACHE_HOME/effect-engine/logs`)
/// - Windows: `%LOCALAPPDATA%\effect-engine\cache\logs`
/// - Fallback: `/tmp/effect-engine/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp").join(APPLICATION))
        .join("logs")
}

/// Platform-specific data directory for persisted owners and timers.
///
/// - macOS: `~/Library/Application Support/effect-engine`
/// - Linux: `~/.local/share/effect-engine` (or `$XDG_DATA_HOME/effect-engine`)
/// - Windows: `%APPDATA%\effect-engine\data`
/// - Fallback: `./save_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}
