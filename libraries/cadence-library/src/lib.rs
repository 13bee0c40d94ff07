//! Cadence Library
//!
//! The playlist service: keeps the internal playlist database consistent
//! and drives the external player from it.
//!
//! # Architecture
//!
//! - [`PlaylistService`] owns the current-playlist pointer and serializes
//!   every operation behind one async lock
//! - Watch paths bind directories to playlists; [`WatchPathMonitor`] picks up
//!   new files below auto-add paths
//! - Player state is never cached; every status read goes to the player
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_library::PlaylistService;
//! # async fn example(service: PlaylistService) -> cadence_library::Result<()> {
//! let playlist = service.create_playlist("Evening").await?;
//! service.add_track_to_playlist(&playlist.id, "/music/song.flac").await?;
//! service.load_playlist_to_player(&playlist.id).await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod paths;
mod service;
pub mod watcher;

pub use error::{LibraryError, Result};
pub use service::{
    LoadReport, NowPlaying, PlayerCommand, PlaylistService, QueueView, ScanReport,
};
pub use watcher::{WatchPathMonitor, WatcherEvent};
