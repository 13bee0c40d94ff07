//! Playlists API routes
use crate::{
    api::{done, ok, required, required_text, ApiResult},
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use cadence_core::{Playlist, PlaylistId, SettingsUpdate, Track, TrackId};
use cadence_library::LoadReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub position: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub track_count: usize,
    pub is_current: bool,
}

#[derive(Debug, Serialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<PlaylistSummary>,
    pub current_playlist_id: Option<PlaylistId>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub playlist: Playlist,
}

#[derive(Debug, Serialize)]
pub struct PlaylistDetailResponse {
    pub playlist: Option<Playlist>,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub track: Track,
}

#[derive(Debug, Serialize)]
pub struct MigrationResponse {
    pub count: usize,
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    #[serde(flatten)]
    pub report: LoadReport,
}

fn playlist_not_found() -> ServerError {
    ServerError::not_found("Playlist")
}

/// GET /api/playlists
pub async fn list_playlists(State(app_state): State<AppState>) -> ApiResult<PlaylistsResponse> {
    let service = &app_state.service;
    let current_playlist_id = service.get_current_playlist().await?.map(|p| p.id);
    let playlists = service
        .list_playlists()
        .await?
        .into_iter()
        .map(|playlist| PlaylistSummary {
            track_count: playlist.len(),
            is_current: current_playlist_id.as_ref() == Some(&playlist.id),
            playlist,
        })
        .collect();

    ok(PlaylistsResponse {
        playlists,
        current_playlist_id,
    })
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult<PlaylistResponse> {
    let Json(req) = payload?;
    let name = required_text(req.name, "name")?;

    let playlist = app_state.service.create_playlist(&name).await?;
    ok(PlaylistResponse { playlist })
}

/// GET /api/playlists/current
/// The current playlist with its tracks; `playlist` is null when none exist
pub async fn get_current_playlist(
    State(app_state): State<AppState>,
) -> ApiResult<PlaylistDetailResponse> {
    let service = &app_state.service;
    let Some(playlist) = service.get_current_playlist().await? else {
        return ok(PlaylistDetailResponse {
            playlist: None,
            tracks: Vec::new(),
        });
    };

    let tracks = service
        .get_playlist_tracks(&playlist.id)
        .await?
        .unwrap_or_default();
    ok(PlaylistDetailResponse {
        playlist: Some(playlist),
        tracks,
    })
}

/// POST /api/playlists/migrate
/// Import every playlist the player holds
pub async fn migrate_from_player(State(app_state): State<AppState>) -> ApiResult<MigrationResponse> {
    let playlists = app_state.service.migrate_from_player().await?;
    ok(MigrationResponse {
        count: playlists.len(),
        playlists,
    })
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<PlaylistDetailResponse> {
    let playlist_id = PlaylistId::new(id);
    let service = &app_state.service;

    let playlist = service
        .get_playlist(&playlist_id)
        .await?
        .ok_or_else(playlist_not_found)?;
    let tracks = service
        .get_playlist_tracks(&playlist_id)
        .await?
        .unwrap_or_default();

    ok(PlaylistDetailResponse {
        playlist: Some(playlist),
        tracks,
    })
}

/// PUT /api/playlists/:id
pub async fn rename_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<NameRequest>, JsonRejection>,
) -> ApiResult<PlaylistResponse> {
    let Json(req) = payload?;
    let name = required_text(req.name, "name")?;

    let playlist = app_state
        .service
        .rename_playlist(&PlaylistId::new(id), &name)
        .await?
        .ok_or_else(playlist_not_found)?;
    ok(PlaylistResponse { playlist })
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult {
    if !app_state.service.delete_playlist(&PlaylistId::new(id)).await? {
        return Err(playlist_not_found());
    }
    done()
}

/// PUT /api/playlists/:id/settings
/// Body holds any subset of shuffle, repeat, stop_after_current, auto_advance
pub async fn update_settings(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<SettingsUpdate>, JsonRejection>,
) -> ApiResult<PlaylistResponse> {
    let Json(update) = payload?;
    if update.is_empty() {
        return Err(ServerError::missing("settings"));
    }

    let playlist = app_state
        .service
        .update_settings(&PlaylistId::new(id), update)
        .await?
        .ok_or_else(playlist_not_found)?;
    ok(PlaylistResponse { playlist })
}

/// POST /api/playlists/:id/current
pub async fn set_current_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<PlaylistResponse> {
    let playlist = app_state
        .service
        .set_current_playlist(&PlaylistId::new(id))
        .await?
        .ok_or_else(playlist_not_found)?;
    ok(PlaylistResponse { playlist })
}

/// POST /api/playlists/:id/load
/// Replace the player queue with this playlist
pub async fn load_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<LoadResponse> {
    let report = app_state
        .service
        .load_playlist_to_player(&PlaylistId::new(id))
        .await?
        .ok_or_else(playlist_not_found)?;
    ok(LoadResponse { report })
}

/// GET /api/playlists/:id/tracks
pub async fn get_playlist_tracks(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<TracksResponse> {
    let tracks = app_state
        .service
        .get_playlist_tracks(&PlaylistId::new(id))
        .await?
        .ok_or_else(playlist_not_found)?;
    ok(TracksResponse { tracks })
}

/// POST /api/playlists/:id/tracks
/// Add a file by path; the track is created on first use
pub async fn add_track_to_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<AddTrackRequest>, JsonRejection>,
) -> ApiResult<TrackResponse> {
    let Json(req) = payload?;
    let path = required_text(req.path, "path")?;

    let track = app_state
        .service
        .add_track_to_playlist(&PlaylistId::new(id), &path)
        .await?
        .ok_or_else(playlist_not_found)?;
    ok(TrackResponse { track })
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track_from_playlist(
    Path((id, track_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
) -> ApiResult {
    let removed = app_state
        .service
        .remove_track_from_playlist(&PlaylistId::new(id), &TrackId::new(track_id))
        .await?;
    require_member(removed)?;
    done()
}

/// PUT /api/playlists/:id/tracks/:track_id/position
/// Out-of-range positions are clamped
pub async fn reorder_track(
    Path((id, track_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<PositionRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let position = required(req.position, "position")?;

    let playlist_id = PlaylistId::new(id);
    let track_id = TrackId::new(track_id);
    let service = &app_state.service;

    if !service.reorder_track(&playlist_id, &track_id, position).await? {
        // Already in place is not an error
        let playlist = service
            .get_playlist(&playlist_id)
            .await?
            .ok_or_else(playlist_not_found)?;
        require_member(playlist.contains(&track_id))?;
    }
    done()
}

fn require_member(present: bool) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(ServerError::not_found("Track in playlist"))
    }
}
