//! Watch path API routes
use crate::{
    api::{done, ok, required_text, ApiResult},
    error::ServerError,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use cadence_core::{PlaylistId, WatchPath, WatchPathId};
use cadence_library::ScanReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddWatchPathRequest {
    pub path: Option<String>,
    #[serde(default = "default_true")]
    pub recursive: bool,
    #[serde(default = "default_true")]
    pub auto_add: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct WatchPathsResponse {
    pub watch_paths: Vec<WatchPath>,
}

#[derive(Debug, Serialize)]
pub struct WatchPathResponse {
    pub watch_path: WatchPath,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    #[serde(flatten)]
    pub report: ScanReport,
}

/// GET /api/playlists/:id/watch-paths
pub async fn list_watch_paths(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<WatchPathsResponse> {
    let watch_paths = app_state
        .service
        .list_watch_paths(&PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::not_found("Playlist"))?;
    ok(WatchPathsResponse { watch_paths })
}

/// POST /api/playlists/:id/watch-paths
/// Re-adding a directory updates its flags in place
pub async fn add_watch_path(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    payload: Result<Json<AddWatchPathRequest>, JsonRejection>,
) -> ApiResult<WatchPathResponse> {
    let Json(req) = payload?;
    let path = required_text(req.path, "path")?;

    let watch_path = app_state
        .service
        .add_watch_path(&PlaylistId::new(id), &path, req.recursive, req.auto_add)
        .await?
        .ok_or_else(|| ServerError::not_found("Playlist"))?;
    ok(WatchPathResponse { watch_path })
}

/// DELETE /api/watch-paths/:id
pub async fn remove_watch_path(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult {
    if !app_state
        .service
        .remove_watch_path(&WatchPathId::new(id))
        .await?
    {
        return Err(ServerError::not_found("Watch path"));
    }
    done()
}

/// POST /api/watch-paths/:id/scan
pub async fn scan_watch_path(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> ApiResult<ScanResponse> {
    let report = app_state
        .service
        .scan_watch_path(&WatchPathId::new(id))
        .await?
        .ok_or_else(|| ServerError::not_found("Watch path"))?;
    ok(ScanResponse { report })
}
