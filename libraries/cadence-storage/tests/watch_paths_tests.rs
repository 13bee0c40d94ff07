//! Integration tests for the watch_paths slice

mod test_helpers;

use cadence_core::types::*;
use test_helpers::*;

fn watch(playlist_id: &PlaylistId, path: &str, recursive: bool, auto_add: bool) -> CreateWatchPath {
    CreateWatchPath {
        playlist_id: playlist_id.clone(),
        path: path.to_string(),
        recursive,
        auto_add,
    }
}

#[tokio::test]
async fn test_upsert_creates_then_updates_in_place() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let playlist = create_test_playlist(pool, "P").await;

    let first = cadence_storage::watch_paths::upsert(pool, watch(&playlist.id, "/music/a", true, true))
        .await
        .unwrap()
        .unwrap();
    assert!(first.created);
    assert!(first.watch_path.recursive);

    let second = cadence_storage::watch_paths::upsert(pool, watch(&playlist.id, "/music/a", false, false))
        .await
        .unwrap()
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.watch_path.id, first.watch_path.id);
    assert!(!second.watch_path.recursive);
    assert!(!second.watch_path.auto_add);
    assert_eq!(second.watch_path.version, 2);

    let all = cadence_storage::watch_paths::get_for_playlist(pool, &playlist.id)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_same_path_on_two_playlists_is_two_rows() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let a = create_test_playlist(pool, "A").await;
    let b = create_test_playlist(pool, "B").await;

    for playlist in [&a, &b] {
        cadence_storage::watch_paths::upsert(pool, watch(&playlist.id, "/music", true, false))
            .await
            .unwrap()
            .unwrap();
    }

    assert_eq!(cadence_storage::watch_paths::get_all(pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_upsert_for_missing_playlist_returns_none() {
    let test_db = TestDb::new().await;
    let result = cadence_storage::watch_paths::upsert(
        test_db.pool(),
        watch(&PlaylistId::new("missing"), "/music", true, true),
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_watch_path() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let playlist = create_test_playlist(pool, "P").await;

    let saved = cadence_storage::watch_paths::upsert(pool, watch(&playlist.id, "/music", true, true))
        .await
        .unwrap()
        .unwrap();

    assert!(cadence_storage::watch_paths::delete(pool, &saved.watch_path.id).await.unwrap());
    assert!(!cadence_storage::watch_paths::delete(pool, &saved.watch_path.id).await.unwrap());
    assert!(cadence_storage::watch_paths::get_by_id(pool, &saved.watch_path.id)
        .await
        .unwrap()
        .is_none());
}
