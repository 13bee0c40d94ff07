//! File browser API routes
use crate::{
    api::{done, ok, required_text, ApiResult},
    services::{file_url, DirectoryListing},
    state::AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileRequest {
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub directory: DirectoryListing,
}

/// GET /api/files/browse?directory=
pub async fn browse(
    State(app_state): State<AppState>,
    query: Result<Query<BrowseQuery>, QueryRejection>,
) -> ApiResult<BrowseResponse> {
    let Query(query) = query?;
    let directory = app_state.browser.browse(query.directory.as_deref()).await?;
    ok(BrowseResponse { directory })
}

/// POST /api/files/play
/// Replace the player queue with one file and start playback
pub async fn play_file(
    State(app_state): State<AppState>,
    payload: Result<Json<FileRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let url = file_url(&required_text(req.path, "path")?)?;

    app_state.service.play_url(&url).await;
    done()
}

/// POST /api/files/queue
/// Append one file to the player queue
pub async fn queue_file(
    State(app_state): State<AppState>,
    payload: Result<Json<FileRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let url = file_url(&required_text(req.path, "path")?)?;

    app_state.service.queue_url(&url).await;
    done()
}
