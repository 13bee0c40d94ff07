//! Storage trait for the track, playlist and watch-path collections

use crate::error::Result;
use crate::types::{
    CreateTrack, CreateWatchPath, Playlist, PlaylistId, PlaylistSettings, SettingsUpdate, Track,
    TrackId, WatchPath, WatchPathId, WatchPathUpsert,
};
use async_trait::async_trait;

/// Storage context providing access to database operations
///
/// Lookups of a missing entity return `Ok(None)` (or `Ok(false)` for
/// mutations); `Err` is reserved for backend failures.
#[async_trait]
pub trait StorageContext: Send + Sync {
    // ========================================================================
    // Tracks
    // ========================================================================

    /// Get all tracks
    async fn get_all_tracks(&self) -> Result<Vec<Track>>;

    /// Get track by ID
    async fn get_track_by_id(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Get track by its file path
    async fn get_track_by_filename(&self, filename: &str) -> Result<Option<Track>>;

    /// Insert a track, or return the existing row when the filename is taken
    async fn create_track(&self, track: CreateTrack) -> Result<Track>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Get all playlists in creation order
    async fn get_all_playlists(&self) -> Result<Vec<Playlist>>;

    /// Get playlist by ID
    async fn get_playlist_by_id(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Get the tracks of a playlist in playback order
    async fn get_playlist_tracks(&self, id: &PlaylistId) -> Result<Option<Vec<Track>>>;

    /// Create a new, empty playlist
    async fn create_playlist(&self, name: &str, settings: PlaylistSettings) -> Result<Playlist>;

    /// Rename a playlist
    async fn rename_playlist(&self, id: &PlaylistId, name: &str) -> Result<Option<Playlist>>;

    /// Overwrite the settings present in `update`
    async fn update_playlist_settings(
        &self,
        id: &PlaylistId,
        update: SettingsUpdate,
    ) -> Result<Option<Playlist>>;

    /// Delete a playlist together with its watch paths
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<bool>;

    /// Append a track. `None` if the playlist is missing, `Some(false)` if
    /// the track was already present.
    async fn add_track_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<Option<bool>>;

    /// Remove a track; false if the playlist or track reference is missing
    async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<bool>;

    /// Move a track to a clamped index; false if nothing moved
    async fn reorder_playlist_track(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        new_index: i64,
    ) -> Result<bool>;

    // ========================================================================
    // Watch paths
    // ========================================================================

    /// Get every watch path
    async fn get_all_watch_paths(&self) -> Result<Vec<WatchPath>>;

    /// Get watch path by ID
    async fn get_watch_path_by_id(&self, id: &WatchPathId) -> Result<Option<WatchPath>>;

    /// Get the watch paths bound to a playlist
    async fn get_watch_paths_for_playlist(&self, playlist_id: &PlaylistId)
        -> Result<Vec<WatchPath>>;

    /// Insert a watch path or update the flags of the existing
    /// (playlist, path) row. `None` if the playlist is missing.
    async fn upsert_watch_path(&self, watch_path: CreateWatchPath)
        -> Result<Option<WatchPathUpsert>>;

    /// Delete a watch path
    async fn delete_watch_path(&self, id: &WatchPathId) -> Result<bool>;
}
