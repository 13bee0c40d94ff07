//! File browser - lists directories and audio files below a fixed root
use crate::error::{Result, ServerError};
use cadence_metadata::AudioFileScanner;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserEntry {
    pub name: String,
    /// Relative to the root for directories, absolute for files
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    pub current_directory: String,
    /// `None` at the root
    pub parent_directory: Option<String>,
    /// Empty at the root
    pub relative_path: String,
    pub dirs: Vec<BrowserEntry>,
    pub files: Vec<BrowserEntry>,
}

#[derive(Debug, Clone)]
pub struct FileBrowser {
    root: PathBuf,
    scanner: AudioFileScanner,
}

impl FileBrowser {
    pub fn new(root: PathBuf, scanner: AudioFileScanner) -> Self {
        Self { root, scanner }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List `directory` (relative to the root, or absolute).
    ///
    /// Anything that does not resolve to a directory inside the root lists
    /// the root instead. Hidden entries are skipped.
    pub async fn browse(&self, directory: Option<&str>) -> Result<DirectoryListing> {
        let root = fs::canonicalize(&self.root)
            .await
            .unwrap_or_else(|_| self.root.clone());
        let target = self.resolve(&root, directory).await;

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        match fs::read_dir(&target).await {
            Ok(mut entries) => {
                while let Some(entry) = entries.next_entry().await? {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if name.starts_with('.') {
                        continue;
                    }

                    let path = entry.path();
                    // Follows symlinks, like the listing's consumers will
                    let Ok(metadata) = fs::metadata(&path).await else {
                        continue;
                    };

                    if metadata.is_dir() {
                        let relative = path.strip_prefix(&root).unwrap_or(&path);
                        dirs.push(BrowserEntry {
                            name,
                            path: relative.to_string_lossy().into_owned(),
                            kind: EntryKind::Directory,
                            extension: None,
                        });
                    } else if metadata.is_file() && self.scanner.is_supported_file(&path) {
                        let extension = path
                            .extension()
                            .map(|e| e.to_string_lossy().to_lowercase());
                        files.push(BrowserEntry {
                            name,
                            path: path.to_string_lossy().into_owned(),
                            kind: EntryKind::File,
                            extension,
                        });
                    }
                }
            }
            Err(e) => {
                tracing::error!("Error accessing directory {}: {}", target.display(), e);
            }
        }

        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let at_root = target == root;
        Ok(DirectoryListing {
            current_directory: target.to_string_lossy().into_owned(),
            parent_directory: target
                .parent()
                .filter(|_| !at_root)
                .map(|p| p.to_string_lossy().into_owned()),
            relative_path: target
                .strip_prefix(&root)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            dirs,
            files,
        })
    }

    async fn resolve(&self, root: &Path, directory: Option<&str>) -> PathBuf {
        let Some(directory) = directory.map(str::trim).filter(|d| !d.is_empty()) else {
            return root.to_path_buf();
        };

        let requested = root.join(cadence_library::paths::expand_home(directory));
        match fs::canonicalize(&requested).await {
            Ok(path) if path.starts_with(root) && path.is_dir() => path,
            _ => {
                tracing::warn!("Refusing to browse outside the root: {}", directory);
                root.to_path_buf()
            }
        }
    }
}

/// `file://` URL for an absolute file path, as the player expects
pub fn file_url(path: &str) -> Result<String> {
    url::Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| ServerError::BadRequest(format!("Not an absolute path: {path}")))
}
