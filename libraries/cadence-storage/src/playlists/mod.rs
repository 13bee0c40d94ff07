use crate::time::{from_millis, now_millis};
use crate::tracks;
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;

const PLAYLIST_COLUMNS: &str = "id, name, shuffle, repeat, stop_after_current, auto_advance, \
                                created_at, updated_at, version";

fn from_row(row: &SqliteRow, track_ids: Vec<TrackId>) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        settings: PlaylistSettings {
            shuffle: row.get::<i64, _>("shuffle") != 0,
            repeat: row.get::<i64, _>("repeat") != 0,
            stop_after_current: row.get::<i64, _>("stop_after_current") != 0,
            auto_advance: row.get::<i64, _>("auto_advance") != 0,
        },
        track_ids,
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
        version: row.get("version"),
    }
}

async fn fetch_track_ids(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Vec<TrackId>> {
    let rows = sqlx::query(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.iter().map(|row| row.get("track_id")).collect())
}

async fn fetch(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let track_ids = fetch_track_ids(conn, id).await?;
    Ok(Some(from_row(&row, track_ids)))
}

/// Bump `updated_at` and `version`
async fn touch(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ?, version = version + 1 WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Persist the in-memory order of `playlist` as contiguous positions
async fn write_positions(conn: &mut SqliteConnection, playlist: &Playlist) -> Result<()> {
    for (position, track_id) in playlist.track_ids.iter().enumerate() {
        sqlx::query(
            "UPDATE playlist_tracks SET position = ? WHERE playlist_id = ? AND track_id = ?",
        )
        .bind(position as i64)
        .bind(&playlist.id)
        .bind(track_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Get all playlists in creation order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    let membership = sqlx::query(
        "SELECT playlist_id, track_id FROM playlist_tracks ORDER BY playlist_id, position",
    )
    .fetch_all(pool)
    .await?;

    let mut by_playlist: HashMap<PlaylistId, Vec<TrackId>> = HashMap::new();
    for row in &membership {
        by_playlist
            .entry(row.get("playlist_id"))
            .or_default()
            .push(row.get("track_id"));
    }

    Ok(rows
        .iter()
        .map(|row| {
            let id: PlaylistId = row.get("id");
            let track_ids = by_playlist.remove(&id).unwrap_or_default();
            from_row(row, track_ids)
        })
        .collect())
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, id).await
}

/// Get the tracks of a playlist in playback order
pub async fn get_tracks(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Vec<Track>>> {
    let exists = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let rows = sqlx::query(
        r#"
        SELECT t.id, t.title, t.artist, t.album, t.length, t.length_seconds,
               t.filename, t.created_at, t.version
        FROM playlist_tracks pt
        INNER JOIN tracks t ON pt.track_id = t.id
        WHERE pt.playlist_id = ?
        ORDER BY pt.position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(rows.iter().map(tracks::from_row).collect()))
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, name: &str, settings: PlaylistSettings) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = now_millis();

    sqlx::query(
        r#"
        INSERT INTO playlists
            (id, name, shuffle, repeat, stop_after_current, auto_advance, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(settings.shuffle)
    .bind(settings.repeat)
    .bind(settings.stop_after_current)
    .bind(settings.auto_advance)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CadenceError::storage("Failed to retrieve created playlist"))
}

/// Rename playlist
pub async fn rename(pool: &SqlitePool, id: &PlaylistId, name: &str) -> Result<Option<Playlist>> {
    let result = sqlx::query(
        "UPDATE playlists SET name = ?, updated_at = ?, version = version + 1 WHERE id = ?",
    )
    .bind(name)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_by_id(pool, id).await
}

/// Overwrite only the settings present in `update`
pub async fn update_settings(
    pool: &SqlitePool,
    id: &PlaylistId,
    update: SettingsUpdate,
) -> Result<Option<Playlist>> {
    let mut tx = pool.begin().await?;

    let Some(mut playlist) = fetch(&mut tx, id).await? else {
        return Ok(None);
    };
    update.apply_to(&mut playlist.settings);

    sqlx::query(
        r#"
        UPDATE playlists
        SET shuffle = ?, repeat = ?, stop_after_current = ?, auto_advance = ?,
            updated_at = ?, version = version + 1
        WHERE id = ?
        "#,
    )
    .bind(playlist.settings.shuffle)
    .bind(playlist.settings.repeat)
    .bind(playlist.settings.stop_after_current)
    .bind(playlist.settings.auto_advance)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let updated = fetch(&mut tx, id).await?;
    tx.commit().await?;

    Ok(updated)
}

/// Delete playlist, its track references and its watch paths
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM watch_paths WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Append track to playlist.
///
/// `None` if the playlist does not exist, `Some(false)` if the track was
/// already a member.
pub async fn add_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<Option<bool>> {
    let mut tx = pool.begin().await?;

    let Some(mut playlist) = fetch(&mut tx, playlist_id).await? else {
        return Ok(None);
    };
    if !playlist.append_track(track_id.clone()) {
        return Ok(Some(false));
    }

    sqlx::query(
        r#"
        INSERT INTO playlist_tracks (playlist_id, track_id, position)
        VALUES (?, ?, ?)
        ON CONFLICT(playlist_id, track_id) DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(track_id)
    .bind(playlist.len() as i64 - 1)
    .execute(&mut *tx)
    .await?;

    touch(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(Some(true))
}

/// Remove track from playlist, closing the gap in positions
pub async fn remove_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut playlist) = fetch(&mut tx, playlist_id).await? else {
        return Ok(false);
    };
    if !playlist.remove_track(track_id) {
        return Ok(false);
    }

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
        .bind(playlist_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;

    write_positions(&mut tx, &playlist).await?;
    touch(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(true)
}

/// Move a track to `new_index` (clamped into the playlist bounds)
pub async fn reorder_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    new_index: i64,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut playlist) = fetch(&mut tx, playlist_id).await? else {
        return Ok(false);
    };
    if !playlist.move_track(track_id, new_index) {
        return Ok(false);
    }

    write_positions(&mut tx, &playlist).await?;
    touch(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(true)
}
