//! Domain types for Cadence

mod ids;
mod playlist;
mod track;
mod watch_path;

pub use ids::{PlaylistId, TrackId, WatchPathId};
pub use playlist::{PlayerSetting, Playlist, PlaylistSettings, SettingsUpdate};
pub use track::{format_length, CreateTrack, Track, TrackMetadata};
pub use watch_path::{CreateWatchPath, WatchPath, WatchPathUpsert};
