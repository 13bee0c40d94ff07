//! Directory watcher for auto-add watch paths
//!
//! Each auto-add watch path gets its own debounced watcher. Debounced events
//! are forwarded over a channel and applied by [`run_event_loop`], which
//! appends new audio files to the watch path's playlist.

use crate::service::PlaylistService;
use crate::{LibraryError, Result};
use cadence_core::{WatchPath, WatchPathId};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

/// Default debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Debounced filesystem event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherEvent {
    /// A file was created or moved into the watched directory
    Created(PathBuf),
    /// A file was written to
    Modified(PathBuf),
}

impl WatcherEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatcherEvent::Created(path) | WatcherEvent::Modified(path) => path,
        }
    }
}

struct WatcherHandle {
    path: PathBuf,
    // Dropping the debouncer stops the watch
    #[allow(dead_code)]
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

/// Keeps one debounced watcher per watch path
pub struct WatchPathMonitor {
    debounce: Duration,
    watchers: RwLock<HashMap<WatchPathId, WatcherHandle>>,
    event_tx: mpsc::Sender<(WatchPathId, WatcherEvent)>,
}

impl WatchPathMonitor {
    /// Create a monitor and the receiver its events arrive on
    pub fn new(debounce: Duration) -> (Self, mpsc::Receiver<(WatchPathId, WatcherEvent)>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let monitor = Self {
            debounce,
            watchers: RwLock::new(HashMap::new()),
            event_tx,
        };
        (monitor, event_rx)
    }

    /// Start (or restart) watching a watch path's directory
    pub async fn watch(&self, watch_path: &WatchPath) -> Result<()> {
        let path = Path::new(&watch_path.path);
        if !path.is_dir() {
            return Err(LibraryError::Watch(format!(
                "not a directory: {}",
                watch_path.path
            )));
        }

        let id = watch_path.id.clone();
        let event_tx = self.event_tx.clone();

        let mut debouncer = new_debouncer(
            self.debounce,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(watcher_event) = convert_event(&event.event) {
                            if event_tx.blocking_send((id.clone(), watcher_event)).is_err() {
                                return;
                            }
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        error!(?error, "Watcher error");
                    }
                }
            },
        )?;

        let mode = if watch_path.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watch(path, mode)?;

        let handle = WatcherHandle {
            path: path.to_path_buf(),
            debouncer,
        };
        self.watchers
            .write()
            .await
            .insert(watch_path.id.clone(), handle);

        info!(watch_path_id = %watch_path.id, path = %watch_path.path, "Started watching");
        Ok(())
    }

    pub async fn unwatch(&self, id: &WatchPathId) {
        if let Some(handle) = self.watchers.write().await.remove(id) {
            info!(watch_path_id = %id, path = ?handle.path, "Stopped watching");
        }
    }

    pub async fn stop_all(&self) {
        self.watchers.write().await.clear();
    }

    pub async fn watcher_count(&self) -> usize {
        self.watchers.read().await.len()
    }

    pub async fn is_watching(&self, id: &WatchPathId) -> bool {
        self.watchers.read().await.contains_key(id)
    }
}

fn convert_event(event: &Event) -> Option<WatcherEvent> {
    let paths = &event.paths;

    match &event.kind {
        EventKind::Create(_) => paths.first().cloned().map(WatcherEvent::Created),
        // A rename reports the destination last
        EventKind::Modify(ModifyKind::Name(RenameMode::Both | RenameMode::To)) => {
            paths.last().cloned().map(WatcherEvent::Created)
        }
        EventKind::Modify(ModifyKind::Name(_)) => None,
        EventKind::Modify(_) => paths.first().cloned().map(WatcherEvent::Modified),
        _ => None,
    }
}

/// Apply watcher events until every sender is gone.
///
/// Run this in its own task.
pub async fn run_event_loop(
    service: Arc<PlaylistService>,
    mut event_rx: mpsc::Receiver<(WatchPathId, WatcherEvent)>,
) {
    while let Some((watch_path_id, event)) = event_rx.recv().await {
        debug!(%watch_path_id, ?event, "Watcher event");

        match service.handle_watch_event(&watch_path_id, &event).await {
            Ok(Some(track)) => {
                info!(track_id = %track.id, filename = %track.filename, "Auto-added track");
            }
            Ok(None) => {}
            Err(e) => warn!(%watch_path_id, error = %e, "Failed to apply watcher event"),
        }
    }
}
