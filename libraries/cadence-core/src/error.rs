//! Errors shared by the storage and metadata layers
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CadenceError>;

/// Failure inside a storage or metadata backend.
///
/// Missing entities are not errors; lookups return `Option` or `bool`.
#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Query failure reported by the database driver
    #[error("Database error: {0}")]
    Database(String),
}

impl CadenceError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CadenceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
