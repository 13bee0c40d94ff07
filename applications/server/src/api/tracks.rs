//! Tracks API routes
use crate::{
    api::{ok, ApiResult},
    error::ServerError,
    state::AppState,
};
use axum::extract::{rejection::QueryRejection, Path, Query, State};
use cadence_core::{Track, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    /// Case-insensitive match on title, artist, album or filename
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    500
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub tracks: Vec<Track>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub track: Track,
}

fn matches(track: &Track, needle: &str) -> bool {
    [
        track.title.as_deref(),
        track.artist.as_deref(),
        track.album.as_deref(),
        Some(track.filename.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

/// GET /api/tracks
pub async fn list_tracks(
    State(app_state): State<AppState>,
    query: Result<Query<TrackQuery>, QueryRejection>,
) -> ApiResult<TracksResponse> {
    let Query(query) = query?;
    let mut tracks = app_state.service.all_tracks().await?;

    if let Some(needle) = query.q.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) {
        tracks.retain(|track| matches(track, &needle));
    }

    // Simple pagination
    let total = tracks.len();
    let tracks = tracks
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    ok(TracksResponse { tracks, total })
}

/// GET /api/tracks/:id
pub async fn get_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<TrackResponse> {
    let track = app_state
        .service
        .get_track(&TrackId::new(id))
        .await?
        .ok_or_else(|| ServerError::not_found("Track"))?;
    ok(TrackResponse { track })
}
