//! Audio file discovery
use std::path::{Path, PathBuf};

/// Extensions accepted when no allow-list is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "wav", "m4a", "aac", "wma", "opus", "aiff", "ape", "mpc", "wv", "tta",
];

/// Finds audio files below a directory
#[derive(Debug, Clone)]
pub struct AudioFileScanner {
    /// Lowercase extensions without the leading dot
    extensions: Vec<String>,
}

impl Default for AudioFileScanner {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl AudioFileScanner {
    /// Create a scanner accepting the given extensions (case-insensitive,
    /// leading dots ignored)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Check if file has an allowed audio extension
    pub fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }

    /// Regular files under `dir` with an allowed extension, sorted by path.
    ///
    /// Only direct children are returned unless `recursive` is set. A missing
    /// or unreadable directory yields no files.
    pub fn discover(&self, dir: &Path, recursive: bool) -> Vec<PathBuf> {
        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "Scan target is not a directory");
            return Vec::new();
        }

        let mut walker = walkdir::WalkDir::new(dir).follow_links(false).min_depth(1);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| self.is_supported_file(path))
            .collect();

        files.sort();
        files
    }
}
