//! Integration tests for the playlists slice
//!
//! Covers creation order, membership without duplicates, clamped reordering
//! with contiguous positions, and cascading deletes.

mod test_helpers;

use cadence_core::types::*;
use sqlx::Row;
use test_helpers::*;

async fn stored_positions(pool: &sqlx::SqlitePool, playlist_id: &PlaylistId) -> Vec<i64> {
    sqlx::query("SELECT position FROM playlist_tracks WHERE playlist_id = ? ORDER BY position")
        .bind(playlist_id)
        .fetch_all(pool)
        .await
        .unwrap()
        .iter()
        .map(|row| row.get("position"))
        .collect()
}

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let playlist = create_test_playlist(pool, "Morning").await;

    assert_eq!(playlist.name, "Morning");
    assert_eq!(playlist.settings, PlaylistSettings::default());
    assert!(playlist.track_ids.is_empty());
    assert_eq!(playlist.version, 1);

    let retrieved = cadence_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(retrieved.id, playlist.id);
    assert_eq!(retrieved.name, "Morning");
}

#[tokio::test]
async fn test_create_with_settings() {
    let test_db = TestDb::new().await;
    let settings = PlaylistSettings {
        shuffle: true,
        repeat: true,
        stop_after_current: false,
        auto_advance: false,
    };

    let playlist = cadence_storage::playlists::create(test_db.pool(), "Imported", settings)
        .await
        .unwrap();
    assert_eq!(playlist.settings, settings);
}

#[tokio::test]
async fn test_get_all_in_creation_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    for name in ["A", "B", "C"] {
        create_test_playlist(pool, name).await;
    }

    let names: Vec<_> = cadence_storage::playlists::get_all(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_add_track_twice_keeps_single_reference() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let playlist = create_test_playlist(pool, "P").await;
    let track = create_test_track(pool, "/music/one.mp3").await;

    let first = cadence_storage::playlists::add_track(pool, &playlist.id, &track.id)
        .await
        .unwrap();
    let second = cadence_storage::playlists::add_track(pool, &playlist.id, &track.id)
        .await
        .unwrap();

    assert_eq!(first, Some(true));
    assert_eq!(second, Some(false));

    let loaded = cadence_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.track_ids, vec![track.id]);
    assert_eq!(loaded.version, 2);
}

#[tokio::test]
async fn test_add_track_to_missing_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let track = create_test_track(pool, "/music/one.mp3").await;

    let result = cadence_storage::playlists::add_track(pool, &PlaylistId::new("missing"), &track.id)
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_remove_track_closes_gap() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist, ids) = playlist_with_tracks(pool, 4).await;

    let removed = cadence_storage::playlists::remove_track(pool, &playlist.id, &ids[1])
        .await
        .unwrap();
    assert!(removed);

    let loaded = cadence_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.track_ids, vec![ids[0].clone(), ids[2].clone(), ids[3].clone()]);
    assert_eq!(stored_positions(pool, &playlist.id).await, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_remove_absent_track_returns_false() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist, ids) = playlist_with_tracks(pool, 2).await;
    let stranger = create_test_track(pool, "/music/stranger.mp3").await;

    let removed = cadence_storage::playlists::remove_track(pool, &playlist.id, &stranger.id)
        .await
        .unwrap();
    assert!(!removed);

    let loaded = cadence_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.track_ids, ids);
}

#[tokio::test]
async fn test_reorder_moves_and_keeps_positions_contiguous() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist, ids) = playlist_with_tracks(pool, 4).await;

    let moved = cadence_storage::playlists::reorder_track(pool, &playlist.id, &ids[3], 1)
        .await
        .unwrap();
    assert!(moved);

    let loaded = cadence_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        loaded.track_ids,
        vec![ids[0].clone(), ids[3].clone(), ids[1].clone(), ids[2].clone()]
    );
    assert_eq!(stored_positions(pool, &playlist.id).await, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_clamps_out_of_bounds_index() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist, ids) = playlist_with_tracks(pool, 3).await;

    assert!(cadence_storage::playlists::reorder_track(pool, &playlist.id, &ids[0], 100)
        .await
        .unwrap());

    let loaded = cadence_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        loaded.track_ids,
        vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]
    );

    // Already last: clamping lands on the current index
    assert!(!cadence_storage::playlists::reorder_track(pool, &playlist.id, &ids[0], 50)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_get_tracks_in_playback_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist, ids) = playlist_with_tracks(pool, 3).await;

    cadence_storage::playlists::reorder_track(pool, &playlist.id, &ids[2], 0)
        .await
        .unwrap();

    let tracks = cadence_storage::playlists::get_tracks(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    let filenames: Vec<_> = tracks.iter().map(|t| t.filename.as_str()).collect();
    assert_eq!(
        filenames,
        vec!["/music/track2.mp3", "/music/track0.mp3", "/music/track1.mp3"]
    );

    let missing = cadence_storage::playlists::get_tracks(pool, &PlaylistId::new("missing"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_rename_and_update_settings_bump_version() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let playlist = create_test_playlist(pool, "Old").await;

    let renamed = cadence_storage::playlists::rename(pool, &playlist.id, "New")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "New");
    assert_eq!(renamed.version, 2);

    let update = SettingsUpdate {
        repeat: Some(true),
        ..Default::default()
    };
    let updated = cadence_storage::playlists::update_settings(pool, &playlist.id, update)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.settings.repeat);
    assert!(updated.settings.auto_advance);
    assert_eq!(updated.version, 3);

    let missing = cadence_storage::playlists::rename(pool, &PlaylistId::new("x"), "y")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_cascades_but_keeps_tracks() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist, ids) = playlist_with_tracks(pool, 2).await;

    cadence_storage::watch_paths::upsert(
        pool,
        CreateWatchPath {
            playlist_id: playlist.id.clone(),
            path: "/music".to_string(),
            recursive: true,
            auto_add: false,
        },
    )
    .await
    .unwrap();

    assert!(cadence_storage::playlists::delete(pool, &playlist.id).await.unwrap());
    assert!(!cadence_storage::playlists::delete(pool, &playlist.id).await.unwrap());

    let remaining = cadence_storage::watch_paths::get_for_playlist(pool, &playlist.id)
        .await
        .unwrap();
    assert!(remaining.is_empty());
    assert!(stored_positions(pool, &playlist.id).await.is_empty());

    for id in &ids {
        assert!(cadence_storage::tracks::get_by_id(pool, id).await.unwrap().is_some());
    }
}
