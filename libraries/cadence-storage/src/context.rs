use crate::{playlists, tracks, watch_paths};
use async_trait::async_trait;
use cadence_core::{error::Result, storage::StorageContext, types::*};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    // Tracks
    async fn get_all_tracks(&self) -> Result<Vec<Track>> {
        tracks::get_all(&self.pool).await
    }

    async fn get_track_by_id(&self, id: &TrackId) -> Result<Option<Track>> {
        tracks::get_by_id(&self.pool, id).await
    }

    async fn get_track_by_filename(&self, filename: &str) -> Result<Option<Track>> {
        tracks::get_by_filename(&self.pool, filename).await
    }

    async fn create_track(&self, track: CreateTrack) -> Result<Track> {
        tracks::create(&self.pool, track).await
    }

    // Playlists
    async fn get_all_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_all(&self.pool).await
    }

    async fn get_playlist_by_id(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn get_playlist_tracks(&self, id: &PlaylistId) -> Result<Option<Vec<Track>>> {
        playlists::get_tracks(&self.pool, id).await
    }

    async fn create_playlist(&self, name: &str, settings: PlaylistSettings) -> Result<Playlist> {
        playlists::create(&self.pool, name, settings).await
    }

    async fn rename_playlist(&self, id: &PlaylistId, name: &str) -> Result<Option<Playlist>> {
        playlists::rename(&self.pool, id, name).await
    }

    async fn update_playlist_settings(
        &self,
        id: &PlaylistId,
        update: SettingsUpdate,
    ) -> Result<Option<Playlist>> {
        playlists::update_settings(&self.pool, id, update).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<bool> {
        playlists::delete(&self.pool, id).await
    }

    async fn add_track_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<Option<bool>> {
        playlists::add_track(&self.pool, playlist_id, track_id).await
    }

    async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<bool> {
        playlists::remove_track(&self.pool, playlist_id, track_id).await
    }

    async fn reorder_playlist_track(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        new_index: i64,
    ) -> Result<bool> {
        playlists::reorder_track(&self.pool, playlist_id, track_id, new_index).await
    }

    // Watch paths
    async fn get_all_watch_paths(&self) -> Result<Vec<WatchPath>> {
        watch_paths::get_all(&self.pool).await
    }

    async fn get_watch_path_by_id(&self, id: &WatchPathId) -> Result<Option<WatchPath>> {
        watch_paths::get_by_id(&self.pool, id).await
    }

    async fn get_watch_paths_for_playlist(
        &self,
        playlist_id: &PlaylistId,
    ) -> Result<Vec<WatchPath>> {
        watch_paths::get_for_playlist(&self.pool, playlist_id).await
    }

    async fn upsert_watch_path(
        &self,
        watch_path: CreateWatchPath,
    ) -> Result<Option<WatchPathUpsert>> {
        watch_paths::upsert(&self.pool, watch_path).await
    }

    async fn delete_watch_path(&self, id: &WatchPathId) -> Result<bool> {
        watch_paths::delete(&self.pool, id).await
    }
}
