use crate::time::{from_millis, now_millis};
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

const WATCH_PATH_COLUMNS: &str =
    "id, playlist_id, path, recursive_scan, auto_add, created_at, version";

fn from_row(row: &SqliteRow) -> WatchPath {
    WatchPath {
        id: row.get("id"),
        playlist_id: row.get("playlist_id"),
        path: row.get("path"),
        recursive: row.get::<i64, _>("recursive_scan") != 0,
        auto_add: row.get::<i64, _>("auto_add") != 0,
        created_at: from_millis(row.get("created_at")),
        version: row.get("version"),
    }
}

async fn fetch_by_key(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    path: &str,
) -> Result<Option<WatchPath>> {
    let row = sqlx::query(&format!(
        "SELECT {WATCH_PATH_COLUMNS} FROM watch_paths WHERE playlist_id = ? AND path = ?"
    ))
    .bind(playlist_id)
    .bind(path)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(from_row))
}

/// Get every watch path
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<WatchPath>> {
    let rows = sqlx::query(&format!(
        "SELECT {WATCH_PATH_COLUMNS} FROM watch_paths ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Get watch path by ID
pub async fn get_by_id(pool: &SqlitePool, id: &WatchPathId) -> Result<Option<WatchPath>> {
    let row = sqlx::query(&format!(
        "SELECT {WATCH_PATH_COLUMNS} FROM watch_paths WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

/// Get the watch paths of a playlist
pub async fn get_for_playlist(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<WatchPath>> {
    let rows = sqlx::query(&format!(
        "SELECT {WATCH_PATH_COLUMNS} FROM watch_paths WHERE playlist_id = ? ORDER BY created_at, rowid"
    ))
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Insert a watch path, or update the flags of the existing
/// (playlist, path) row in place.
pub async fn upsert(pool: &SqlitePool, watch_path: CreateWatchPath) -> Result<Option<WatchPathUpsert>> {
    let mut tx = pool.begin().await?;

    let playlist = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
        .bind(&watch_path.playlist_id)
        .fetch_optional(&mut *tx)
        .await?;
    if playlist.is_none() {
        return Ok(None);
    }

    let existing = fetch_by_key(&mut tx, &watch_path.playlist_id, &watch_path.path).await?;
    let created = existing.is_none();

    match existing {
        Some(existing) => {
            sqlx::query(
                r#"
                UPDATE watch_paths
                SET recursive_scan = ?, auto_add = ?, version = version + 1
                WHERE id = ?
                "#,
            )
            .bind(watch_path.recursive)
            .bind(watch_path.auto_add)
            .bind(&existing.id)
            .execute(&mut *tx)
            .await?;
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO watch_paths (id, playlist_id, path, recursive_scan, auto_add, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(WatchPathId::generate())
            .bind(&watch_path.playlist_id)
            .bind(&watch_path.path)
            .bind(watch_path.recursive)
            .bind(watch_path.auto_add)
            .bind(now_millis())
            .execute(&mut *tx)
            .await?;
        }
    }

    let saved = fetch_by_key(&mut tx, &watch_path.playlist_id, &watch_path.path)
        .await?
        .ok_or_else(|| CadenceError::storage("Failed to retrieve saved watch path"))?;
    tx.commit().await?;

    Ok(Some(WatchPathUpsert {
        watch_path: saved,
        created,
    }))
}

/// Delete watch path
pub async fn delete(pool: &SqlitePool, id: &WatchPathId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM watch_paths WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
