//! API route modules and the router
pub mod files;
pub mod health;
pub mod player;
pub mod playlists;
pub mod tracks;
pub mod watch_paths;

use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Success envelope: `{"success": true, ...body}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

/// Body-less success
#[derive(Debug, Serialize)]
pub struct Empty {}

pub type ApiResult<T = Empty> = Result<Json<Envelope<T>>>;

pub fn ok<T: Serialize>(body: T) -> ApiResult<T> {
    Ok(Json(Envelope {
        success: true,
        body,
    }))
}

pub fn done() -> ApiResult {
    ok(Empty {})
}

/// Unwrap a required request field
pub fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| ServerError::missing(name))
}

/// Unwrap a required, non-blank string field
pub fn required_text(value: Option<String>, name: &str) -> Result<String> {
    required(value, name).and_then(|text| {
        let text = text.trim();
        if text.is_empty() {
            Err(ServerError::missing(name))
        } else {
            Ok(text.to_string())
        }
    })
}

pub fn create_router(app_state: AppState) -> Router {
    let playlist_routes = Router::new()
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route("/playlists/current", get(playlists::get_current_playlist))
        .route("/playlists/migrate", post(playlists::migrate_from_player))
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .put(playlists::rename_playlist)
                .delete(playlists::delete_playlist),
        )
        .route("/playlists/:id/settings", put(playlists::update_settings))
        .route("/playlists/:id/current", post(playlists::set_current_playlist))
        .route("/playlists/:id/load", post(playlists::load_playlist))
        .route(
            "/playlists/:id/tracks",
            get(playlists::get_playlist_tracks).post(playlists::add_track_to_playlist),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            delete(playlists::remove_track_from_playlist),
        )
        .route(
            "/playlists/:id/tracks/:track_id/position",
            put(playlists::reorder_track),
        )
        .route(
            "/playlists/:id/watch-paths",
            get(watch_paths::list_watch_paths).post(watch_paths::add_watch_path),
        )
        .route("/watch-paths/:id", delete(watch_paths::remove_watch_path))
        .route("/watch-paths/:id/scan", post(watch_paths::scan_watch_path));

    let track_routes = Router::new()
        .route("/tracks", get(tracks::list_tracks))
        .route("/tracks/:id", get(tracks::get_track));

    let player_routes = Router::new()
        .route("/player/status", get(player::status))
        .route("/player/play", post(player::play))
        .route("/player/pause", post(player::pause))
        .route("/player/playpause", post(player::play_pause))
        .route("/player/stop", post(player::stop))
        .route("/player/next", post(player::next))
        .route("/player/previous", post(player::previous))
        .route("/player/clear", post(player::clear))
        .route("/player/seek", post(player::seek))
        .route("/player/seek-relative", post(player::seek_relative))
        .route(
            "/player/volume",
            get(player::get_volume).post(player::set_volume),
        )
        .route("/player/settings", get(player::get_settings))
        .route(
            "/player/settings/toggle-shuffle",
            post(player::toggle_shuffle),
        )
        .route("/player/settings/toggle-repeat", post(player::toggle_repeat))
        .route(
            "/player/settings/toggle-stop-after",
            post(player::toggle_stop_after),
        )
        .route(
            "/player/settings/toggle-auto-advance",
            post(player::toggle_auto_advance),
        )
        .route("/player/queue", get(player::queue))
        .route("/player/queue/jump/:position", post(player::jump))
        .route("/player/queue/:position", delete(player::delete_entry));

    let file_routes = Router::new()
        .route("/files/browse", get(files::browse))
        .route("/files/play", post(files::play_file))
        .route("/files/queue", post(files::queue_file));

    Router::new()
        .route("/health", get(health::health))
        .nest(
            "/api",
            playlist_routes
                .merge(track_routes)
                .merge(player_routes)
                .merge(file_routes),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
