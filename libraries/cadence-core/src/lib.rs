//! Cadence Core
//!
//! Domain types, traits, and error handling shared by every Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `WatchPath` and their ids
//! - **Core Traits**: `MetadataReader`, `StorageContext`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! Ordering rules for playlists (append without duplicates, clamped moves)
//! live on [`Playlist`] itself so that every storage backend applies the
//! same semantics.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, TrackId};
//!
//! let mut playlist = Playlist::new("Road Trip");
//! let track = TrackId::generate();
//!
//! assert!(playlist.append_track(track.clone()));
//! assert!(!playlist.append_track(track));
//! assert_eq!(playlist.track_ids.len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use storage::StorageContext;
pub use traits::MetadataReader;

pub use types::{
    format_length, CreateTrack, CreateWatchPath, Playlist, PlaylistId, PlaylistSettings,
    PlayerSetting, SettingsUpdate, Track, TrackId, TrackMetadata, WatchPath, WatchPathId,
    WatchPathUpsert,
};
