//! Path normalization for watch paths and player filenames

use std::path::{Component, Path, PathBuf};

/// Replace a leading `~` with the home directory
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Remove `.` and `..` components without touching the filesystem
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expand `~`, anchor relative paths at the working directory and clean
/// the result
pub fn normalize(raw: &str) -> PathBuf {
    let expanded = expand_home(raw.trim());
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    };
    clean(&absolute)
}

/// Convert a filename reported by the player into a plain path.
///
/// Audacious may report `file://` URIs; anything else passes through.
pub fn from_player_filename(raw: &str) -> String {
    let raw = raw.trim();
    match url::Url::parse(raw) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|()| raw.to_string()),
        _ => raw.to_string(),
    }
}
