//! Shared application state
use crate::services::FileBrowser;
use cadence_library::PlaylistService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlaylistService>,
    pub browser: Arc<FileBrowser>,
}

impl AppState {
    pub fn new(service: Arc<PlaylistService>, browser: Arc<FileBrowser>) -> Self {
        Self { service, browser }
    }
}
