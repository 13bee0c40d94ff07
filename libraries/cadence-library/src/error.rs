//! Error types for the playlist service

use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Storage error: {0}")]
    Storage(#[from] cadence_core::CadenceError),

    #[error("Watcher error: {0}")]
    Watch(String),
}

impl From<notify::Error> for LibraryError {
    fn from(err: notify::Error) -> Self {
        Self::Watch(err.to_string())
    }
}
