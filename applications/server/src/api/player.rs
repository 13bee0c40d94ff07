//! Player control API routes
//!
//! Commands run through the playlist service so they never interleave with a
//! load or migration. Writes succeed even when the player is unreachable;
//! reads fall back to defaults.
use crate::{
    api::{done, ok, required, ApiResult},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use cadence_core::{PlayerSetting, PlaylistSettings};
use cadence_library::{NowPlaying, PlayerCommand, QueueView};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    /// Seconds from the start of the song
    pub position: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SeekRelativeRequest {
    /// Seconds, negative to rewind
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    pub volume: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    pub volume: u8,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: PlaylistSettings,
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    #[serde(flatten)]
    pub queue: QueueView,
}

/// GET /api/player/status
/// Fresh player state plus the id of the matching library track
pub async fn status(State(app_state): State<AppState>) -> ApiResult<NowPlaying> {
    ok(app_state.service.player_status().await?)
}

async fn send(app_state: &AppState, command: PlayerCommand) -> ApiResult {
    app_state.service.send_player_command(command).await;
    done()
}

/// POST /api/player/play
pub async fn play(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::Play).await
}

/// POST /api/player/pause
pub async fn pause(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::Pause).await
}

/// POST /api/player/playpause
pub async fn play_pause(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::PlayPause).await
}

/// POST /api/player/stop
pub async fn stop(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::Stop).await
}

/// POST /api/player/next
pub async fn next(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::Next).await
}

/// POST /api/player/previous
pub async fn previous(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::Previous).await
}

/// POST /api/player/clear
pub async fn clear(State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::ClearQueue).await
}

/// POST /api/player/seek
pub async fn seek(
    State(app_state): State<AppState>,
    payload: Result<Json<SeekRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let position = required(req.position, "position")?;

    send(&app_state, PlayerCommand::Seek(position)).await
}

/// POST /api/player/seek-relative
pub async fn seek_relative(
    State(app_state): State<AppState>,
    payload: Result<Json<SeekRelativeRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload?;
    let offset = required(req.offset, "offset")?;

    send(&app_state, PlayerCommand::SeekRelative(offset)).await
}

/// GET /api/player/volume
pub async fn get_volume(State(app_state): State<AppState>) -> ApiResult<VolumeResponse> {
    let volume = app_state.service.player_volume().await;
    ok(VolumeResponse { volume })
}

/// POST /api/player/volume
/// Values outside 0..=100 are clamped
pub async fn set_volume(
    State(app_state): State<AppState>,
    payload: Result<Json<VolumeRequest>, JsonRejection>,
) -> ApiResult<VolumeResponse> {
    let Json(req) = payload?;
    let requested = required(req.volume, "volume")?;

    let volume = app_state.service.set_player_volume(requested).await;
    ok(VolumeResponse { volume })
}

/// GET /api/player/settings
pub async fn get_settings(State(app_state): State<AppState>) -> ApiResult<SettingsResponse> {
    let settings = app_state.service.player_settings().await;
    ok(SettingsResponse { settings })
}

async fn toggle(app_state: &AppState, setting: PlayerSetting) -> ApiResult<SettingsResponse> {
    let settings = app_state.service.toggle_player_setting(setting).await;
    ok(SettingsResponse { settings })
}

/// POST /api/player/settings/toggle-shuffle
pub async fn toggle_shuffle(State(app_state): State<AppState>) -> ApiResult<SettingsResponse> {
    toggle(&app_state, PlayerSetting::Shuffle).await
}

/// POST /api/player/settings/toggle-repeat
pub async fn toggle_repeat(State(app_state): State<AppState>) -> ApiResult<SettingsResponse> {
    toggle(&app_state, PlayerSetting::Repeat).await
}

/// POST /api/player/settings/toggle-stop-after
pub async fn toggle_stop_after(State(app_state): State<AppState>) -> ApiResult<SettingsResponse> {
    toggle(&app_state, PlayerSetting::StopAfter).await
}

/// POST /api/player/settings/toggle-auto-advance
pub async fn toggle_auto_advance(State(app_state): State<AppState>) -> ApiResult<SettingsResponse> {
    toggle(&app_state, PlayerSetting::AutoAdvance).await
}

/// GET /api/player/queue
/// Every entry of the player's active playlist
pub async fn queue(State(app_state): State<AppState>) -> ApiResult<QueueResponse> {
    let queue = app_state.service.player_queue().await;
    ok(QueueResponse { queue })
}

/// POST /api/player/queue/jump/:position
pub async fn jump(Path(position): Path<usize>, State(app_state): State<AppState>) -> ApiResult {
    send(&app_state, PlayerCommand::Jump(position)).await
}

/// DELETE /api/player/queue/:position
pub async fn delete_entry(
    Path(position): Path<usize>,
    State(app_state): State<AppState>,
) -> ApiResult {
    send(&app_state, PlayerCommand::Delete(position)).await
}
