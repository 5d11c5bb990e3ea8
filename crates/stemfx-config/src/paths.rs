//! Platform-specific paths for configuration and sessions.
//!
//! - **User config**: `~/.config/stemfx/` (Linux), `~/Library/Application Support/stemfx/` (macOS), `%APPDATA%\stemfx\` (Windows)
//! - **Sessions**: `<user config>/sessions/`

use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "stemfx";

/// Subdirectory name for sessions.
const SESSIONS_SUBDIR: &str = "sessions";

/// File name of the engine configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default engine configuration file path.
pub fn user_config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Returns the user-specific sessions directory.
pub fn user_sessions_dir() -> PathBuf {
    user_config_dir().join(SESSIONS_SUBDIR)
}

/// Find a session file by name.
///
/// `name` may be a path to an existing file, or a session name (with or
/// without `.toml`) looked up in [`user_sessions_dir`].
pub fn find_session(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    };
    let candidate = user_sessions_dir().join(filename);
    candidate.is_file().then_some(candidate)
}

/// Session names stored in `dir`, sorted.
pub fn list_sessions(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

/// Ensure the parent directory of `path` exists.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
    }
    Ok(())
}
