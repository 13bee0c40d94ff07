use crate::time::{from_millis, now_millis};
use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const TRACK_COLUMNS: &str =
    "id, title, artist, album, length, length_seconds, filename, created_at, version";

pub(crate) fn from_row(row: &SqliteRow) -> Track {
    Track {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        length: row.get("length"),
        length_seconds: row.get("length_seconds"),
        filename: row.get("filename"),
        created_at: from_millis(row.get("created_at")),
        version: row.get("version"),
    }
}

/// Get all tracks in registration order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Get track by ID
pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Get track by file path
pub async fn get_by_filename(pool: &SqlitePool, filename: &str) -> Result<Option<Track>> {
    let row = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE filename = ?"
    ))
    .bind(filename)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

/// Register a track.
///
/// The insert yields to the unique filename constraint, so concurrent
/// creators of the same path all read back the single winning row.
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    let id = TrackId::generate();

    let result = sqlx::query(
        r#"
        INSERT INTO tracks (id, title, artist, album, length, length_seconds, filename, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(filename) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(&track.length)
    .bind(track.length_seconds)
    .bind(&track.filename)
    .bind(now_millis())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(filename = %track.filename, "Track already registered");
    }

    get_by_filename(pool, &track.filename)
        .await?
        .ok_or_else(|| CadenceError::storage("Failed to retrieve created track"))
}
