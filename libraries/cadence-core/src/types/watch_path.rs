//! Watch path domain types
use crate::types::{PlaylistId, WatchPathId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory bound to a playlist for bulk ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchPath {
    pub id: WatchPathId,

    /// Normalized absolute directory path
    pub path: String,

    /// Descend into subdirectories when scanning
    pub recursive: bool,

    /// Scan on creation and pick up new files while watched
    pub auto_add: bool,

    /// Owning playlist
    pub playlist_id: PlaylistId,

    pub created_at: DateTime<Utc>,

    pub version: i64,
}

/// Data for registering a watch path; `path` must already be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWatchPath {
    pub playlist_id: PlaylistId,
    pub path: String,
    pub recursive: bool,
    pub auto_add: bool,
}

/// Outcome of upserting a watch path on (playlist, path)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPathUpsert {
    pub watch_path: WatchPath,

    /// False when an existing row had its flags updated in place
    pub created: bool,
}
