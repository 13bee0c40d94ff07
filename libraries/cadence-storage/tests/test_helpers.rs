//! Test helpers and fixtures for storage integration tests
//!
//! Test databases are REAL SQLite files (not in-memory) so migrations,
//! constraints and cascades behave as in production.

#![allow(dead_code)]

use cadence_core::types::*;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = cadence_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        cadence_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: register a track for `filename`
pub async fn create_test_track(pool: &SqlitePool, filename: &str) -> Track {
    cadence_storage::tracks::create(pool, CreateTrack::from_metadata(filename, None))
        .await
        .expect("Failed to create test track")
}

/// Test fixture: create a playlist with default settings
pub async fn create_test_playlist(pool: &SqlitePool, name: &str) -> Playlist {
    cadence_storage::playlists::create(pool, name, PlaylistSettings::default())
        .await
        .expect("Failed to create test playlist")
}

/// Test fixture: playlist holding `count` fresh tracks, in order
pub async fn playlist_with_tracks(pool: &SqlitePool, count: usize) -> (Playlist, Vec<TrackId>) {
    let playlist = create_test_playlist(pool, "Fixture").await;
    let mut ids = Vec::new();

    for i in 0..count {
        let track = create_test_track(pool, &format!("/music/track{i}.mp3")).await;
        cadence_storage::playlists::add_track(pool, &playlist.id, &track.id)
            .await
            .expect("Failed to add track");
        ids.push(track.id);
    }

    (playlist, ids)
}
