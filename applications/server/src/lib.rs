//! Cadence Server Library
//!
//! HTTP control surface for the playlist service: playlists, tracks, watch
//! paths, the external player and a confined file browser.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::FileBrowser;
pub use state::AppState;
