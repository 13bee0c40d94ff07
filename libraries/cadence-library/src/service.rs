//! Playlist service
//!
//! Coordinates the track, playlist and watch-path stores with the external
//! player. Every public operation holds the session lock for its whole
//! duration, so loads, migrations and scans never interleave.

use crate::error::Result;
use crate::paths;
use crate::watcher::{WatchPathMonitor, WatcherEvent};
use cadence_core::{
    CreateTrack, CreateWatchPath, MetadataReader, PlayerSetting, Playlist, PlaylistId,
    PlaylistSettings, SettingsUpdate, StorageContext, Track, TrackId, TrackMetadata, WatchPath,
    WatchPathId,
};
use cadence_metadata::AudioFileScanner;
use cadence_player::{AudtoolPlayer, PlayerStatus, QueueEntry, Reply};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Result of pushing a playlist into the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub playlist_id: PlaylistId,
    pub tracks_queued: usize,
    /// Settings that differed on the player and were toggled
    pub toggled: Vec<PlayerSetting>,
}

/// Result of scanning one watch path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub watch_path_id: WatchPathId,
    pub files_found: usize,
    pub tracks_added: usize,
}

/// Live player status plus the matching library track, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NowPlaying {
    #[serde(flatten)]
    pub status: PlayerStatus,
    pub track_id: Option<TrackId>,
}

/// Fire-and-forget player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Previous,
    ClearQueue,
    /// Absolute position in seconds
    Seek(u64),
    /// Offset in seconds, negative to rewind
    SeekRelative(i64),
    /// 0-based queue position
    Jump(usize),
    /// 0-based queue position
    Delete(usize),
}

/// The player's queue as last reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueView {
    /// Current 0-based position; `None` for an empty queue
    pub position: Option<usize>,
    pub entries: Vec<QueueEntry>,
}

#[derive(Debug, Default)]
struct Session {
    current: Option<PlaylistId>,
}

pub struct PlaylistService {
    storage: Arc<dyn StorageContext>,
    reader: Arc<dyn MetadataReader>,
    player: AudtoolPlayer,
    scanner: AudioFileScanner,
    monitor: Option<Arc<WatchPathMonitor>>,
    session: Mutex<Session>,
}

impl PlaylistService {
    pub fn new(
        storage: Arc<dyn StorageContext>,
        reader: Arc<dyn MetadataReader>,
        player: AudtoolPlayer,
        scanner: AudioFileScanner,
    ) -> Self {
        Self {
            storage,
            reader,
            player,
            scanner,
            monitor: None,
            session: Mutex::new(Session::default()),
        }
    }

    /// Keep auto-add watch paths registered with `monitor`
    pub fn with_monitor(mut self, monitor: Arc<WatchPathMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn scanner(&self) -> &AudioFileScanner {
        &self.scanner
    }

    async fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }

    // ========================================================================
    // Tracks
    // ========================================================================

    pub async fn all_tracks(&self) -> Result<Vec<Track>> {
        let _session = self.lock().await;
        Ok(self.storage.get_all_tracks().await?)
    }

    pub async fn get_track(&self, id: &TrackId) -> Result<Option<Track>> {
        let _session = self.lock().await;
        Ok(self.storage.get_track_by_id(id).await?)
    }

    async fn read_metadata(&self, filename: &str) -> Option<TrackMetadata> {
        let reader = Arc::clone(&self.reader);
        let path = PathBuf::from(filename);

        match tokio::task::spawn_blocking(move || reader.read(&path)).await {
            Ok(Ok(metadata)) => Some(metadata),
            Ok(Err(e)) => {
                warn!(filename, error = %e, "Metadata extraction failed, using file name");
                None
            }
            Err(e) => {
                warn!(filename, error = %e, "Metadata task failed, using file name");
                None
            }
        }
    }

    /// Existing track for `filename`, or a new one built from its metadata
    async fn find_or_create_track(&self, filename: &str) -> Result<Track> {
        if let Some(track) = self.storage.get_track_by_filename(filename).await? {
            return Ok(track);
        }

        let metadata = self.read_metadata(filename).await;
        let track = self
            .storage
            .create_track(CreateTrack::from_metadata(filename, metadata))
            .await?;

        debug!(track_id = %track.id, filename, "Registered track");
        Ok(track)
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// All playlists in creation order
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let _session = self.lock().await;
        Ok(self.storage.get_all_playlists().await?)
    }

    pub async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        let _session = self.lock().await;
        Ok(self.storage.get_playlist_by_id(id).await?)
    }

    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let _session = self.lock().await;
        let playlist = self
            .storage
            .create_playlist(name, PlaylistSettings::default())
            .await?;

        info!(playlist_id = %playlist.id, name, "Created playlist");
        Ok(playlist)
    }

    pub async fn rename_playlist(&self, id: &PlaylistId, name: &str) -> Result<Option<Playlist>> {
        let _session = self.lock().await;
        Ok(self.storage.rename_playlist(id, name).await?)
    }

    pub async fn update_settings(
        &self,
        id: &PlaylistId,
        update: SettingsUpdate,
    ) -> Result<Option<Playlist>> {
        let _session = self.lock().await;
        Ok(self.storage.update_playlist_settings(id, update).await?)
    }

    /// Delete a playlist and its watch paths; tracks are kept
    pub async fn delete_playlist(&self, id: &PlaylistId) -> Result<bool> {
        let mut session = self.lock().await;

        let watch_paths = self.storage.get_watch_paths_for_playlist(id).await?;
        if !self.storage.delete_playlist(id).await? {
            return Ok(false);
        }

        if let Some(monitor) = &self.monitor {
            for watch_path in &watch_paths {
                monitor.unwatch(&watch_path.id).await;
            }
        }
        if session.current.as_ref() == Some(id) {
            session.current = None;
        }

        info!(playlist_id = %id, "Deleted playlist");
        Ok(true)
    }

    async fn resolve_current(&self, session: &mut Session) -> Result<Option<Playlist>> {
        if let Some(id) = &session.current {
            if let Some(playlist) = self.storage.get_playlist_by_id(id).await? {
                return Ok(Some(playlist));
            }
        }

        let first = self.storage.get_all_playlists().await?.into_iter().next();
        session.current = first.as_ref().map(|p| p.id.clone());
        Ok(first)
    }

    /// The active playlist, defaulting to the first one
    pub async fn get_current_playlist(&self) -> Result<Option<Playlist>> {
        let mut session = self.lock().await;
        self.resolve_current(&mut session).await
    }

    pub async fn set_current_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        let mut session = self.lock().await;

        let playlist = self.storage.get_playlist_by_id(id).await?;
        if playlist.is_some() {
            session.current = Some(id.clone());
        }
        Ok(playlist)
    }

    pub async fn get_playlist_tracks(&self, id: &PlaylistId) -> Result<Option<Vec<Track>>> {
        let _session = self.lock().await;
        Ok(self.storage.get_playlist_tracks(id).await?)
    }

    /// Resolve or create the track for `filename`, then append it.
    ///
    /// Returns the track whether or not it was already in the playlist, and
    /// `None` if the playlist does not exist.
    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        filename: &str,
    ) -> Result<Option<Track>> {
        let _session = self.lock().await;
        Ok(self
            .add_track_locked(playlist_id, filename)
            .await?
            .map(|(track, _)| track))
    }

    /// Returns the track and whether it was newly appended
    async fn add_track_locked(
        &self,
        playlist_id: &PlaylistId,
        filename: &str,
    ) -> Result<Option<(Track, bool)>> {
        if self.storage.get_playlist_by_id(playlist_id).await?.is_none() {
            return Ok(None);
        }

        let track = self.find_or_create_track(filename).await?;
        let added = self
            .storage
            .add_track_to_playlist(playlist_id, &track.id)
            .await?;

        Ok(added.map(|added| {
            if added {
                debug!(%playlist_id, track_id = %track.id, "Appended track");
            }
            (track, added)
        }))
    }

    pub async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<bool> {
        let _session = self.lock().await;
        Ok(self
            .storage
            .remove_track_from_playlist(playlist_id, track_id)
            .await?)
    }

    /// Move a track; out-of-range indices are clamped
    pub async fn reorder_track(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        new_index: i64,
    ) -> Result<bool> {
        let _session = self.lock().await;
        Ok(self
            .storage
            .reorder_playlist_track(playlist_id, track_id, new_index)
            .await?)
    }

    // ========================================================================
    // Watch paths
    // ========================================================================

    pub async fn all_watch_paths(&self) -> Result<Vec<WatchPath>> {
        let _session = self.lock().await;
        Ok(self.storage.get_all_watch_paths().await?)
    }

    /// Watch paths of a playlist; `None` if the playlist does not exist
    pub async fn list_watch_paths(&self, playlist_id: &PlaylistId) -> Result<Option<Vec<WatchPath>>> {
        let _session = self.lock().await;
        if self.storage.get_playlist_by_id(playlist_id).await?.is_none() {
            return Ok(None);
        }
        Ok(Some(
            self.storage.get_watch_paths_for_playlist(playlist_id).await?,
        ))
    }

    /// Bind a directory to a playlist.
    ///
    /// Re-adding the same directory updates its flags. A newly created
    /// auto-add path is scanned right away.
    pub async fn add_watch_path(
        &self,
        playlist_id: &PlaylistId,
        path: &str,
        recursive: bool,
        auto_add: bool,
    ) -> Result<Option<WatchPath>> {
        let _session = self.lock().await;

        let normalized = paths::normalize(path).to_string_lossy().into_owned();
        let Some(saved) = self
            .storage
            .upsert_watch_path(CreateWatchPath {
                playlist_id: playlist_id.clone(),
                path: normalized,
                recursive,
                auto_add,
            })
            .await?
        else {
            return Ok(None);
        };

        let watch_path = saved.watch_path;
        info!(
            watch_path_id = %watch_path.id,
            path = %watch_path.path,
            created = saved.created,
            "Saved watch path"
        );

        if saved.created && watch_path.auto_add {
            self.scan_locked(&watch_path).await?;
        }

        if let Some(monitor) = &self.monitor {
            if watch_path.auto_add {
                if let Err(e) = monitor.watch(&watch_path).await {
                    warn!(path = %watch_path.path, error = %e, "Cannot watch directory");
                }
            } else {
                monitor.unwatch(&watch_path.id).await;
            }
        }

        Ok(Some(watch_path))
    }

    pub async fn remove_watch_path(&self, id: &WatchPathId) -> Result<bool> {
        let _session = self.lock().await;

        let removed = self.storage.delete_watch_path(id).await?;
        if removed {
            if let Some(monitor) = &self.monitor {
                monitor.unwatch(id).await;
            }
        }
        Ok(removed)
    }

    /// Add every allowed audio file below the watch path to its playlist
    pub async fn scan_watch_path(&self, id: &WatchPathId) -> Result<Option<ScanReport>> {
        let _session = self.lock().await;

        let Some(watch_path) = self.storage.get_watch_path_by_id(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.scan_locked(&watch_path).await?))
    }

    async fn scan_locked(&self, watch_path: &WatchPath) -> Result<ScanReport> {
        let scanner = self.scanner.clone();
        let dir = PathBuf::from(&watch_path.path);
        let recursive = watch_path.recursive;

        let files = tokio::task::spawn_blocking(move || scanner.discover(&dir, recursive))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Directory scan task failed");
                Vec::new()
            });

        let mut tracks_added = 0;
        for file in &files {
            let filename = file.to_string_lossy();
            if let Some((_, true)) = self
                .add_track_locked(&watch_path.playlist_id, &filename)
                .await?
            {
                tracks_added += 1;
            }
        }

        info!(
            watch_path_id = %watch_path.id,
            files_found = files.len(),
            tracks_added,
            "Scanned watch path"
        );

        Ok(ScanReport {
            watch_path_id: watch_path.id.clone(),
            files_found: files.len(),
            tracks_added,
        })
    }

    /// Register every auto-add watch path with the monitor
    pub async fn start_watching(&self) -> Result<usize> {
        let _session = self.lock().await;
        let Some(monitor) = &self.monitor else {
            return Ok(0);
        };

        let mut watched = 0;
        for watch_path in self.storage.get_all_watch_paths().await? {
            if !watch_path.auto_add {
                continue;
            }
            match monitor.watch(&watch_path).await {
                Ok(()) => watched += 1,
                Err(e) => warn!(path = %watch_path.path, error = %e, "Cannot watch directory"),
            }
        }
        Ok(watched)
    }

    /// Add a file reported by the directory watcher.
    ///
    /// Ignored unless the watch path still exists with auto-add on and the
    /// file has an allowed extension.
    pub async fn handle_watch_event(
        &self,
        watch_path_id: &WatchPathId,
        event: &WatcherEvent,
    ) -> Result<Option<Track>> {
        let _session = self.lock().await;

        let path = event.path();
        if !self.scanner.is_supported_file(path) || !path.is_file() {
            return Ok(None);
        }
        let Some(watch_path) = self.storage.get_watch_path_by_id(watch_path_id).await? else {
            return Ok(None);
        };
        if !watch_path.auto_add || !is_within(path, &watch_path) {
            return Ok(None);
        }

        let filename = path.to_string_lossy();
        Ok(self
            .add_track_locked(&watch_path.playlist_id, &filename)
            .await?
            .and_then(|(track, added)| added.then_some(track)))
    }

    // ========================================================================
    // Player synchronization
    // ========================================================================

    /// Replace the player's queue with a playlist.
    ///
    /// Makes the playlist current, clears the queue, toggles each player
    /// setting that differs from the playlist's, then appends every track.
    /// The player is not kept in sync afterwards.
    pub async fn load_playlist_to_player(&self, id: &PlaylistId) -> Result<Option<LoadReport>> {
        let mut session = self.lock().await;

        let Some(playlist) = self.storage.get_playlist_by_id(id).await? else {
            return Ok(None);
        };
        let tracks = self
            .storage
            .get_playlist_tracks(id)
            .await?
            .unwrap_or_default();

        session.current = Some(id.clone());

        self.player.clear_queue().await;

        let mut toggled = Vec::new();
        for setting in PlayerSetting::ALL {
            let target = playlist.settings.get(setting);
            match self.player.setting(setting).await {
                Reply::Ok(current) if current != target => {
                    self.player.toggle_setting(setting).await;
                    toggled.push(setting);
                }
                Reply::Ok(_) => {}
                Reply::Unavailable => {
                    warn!(?setting, "Player did not report setting, leaving it unchanged");
                }
            }
        }

        for track in &tracks {
            self.player.append_url(&track.filename).await;
        }

        info!(
            playlist_id = %id,
            tracks = tracks.len(),
            ?toggled,
            "Loaded playlist into player"
        );

        Ok(Some(LoadReport {
            playlist_id: id.clone(),
            tracks_queued: tracks.len(),
            toggled,
        }))
    }

    /// Import every player playlist as a new internal playlist.
    ///
    /// Tracks are shared with existing ones by filename. The player's
    /// active slot is restored afterwards. One-way: nothing is written back.
    pub async fn migrate_from_player(&self) -> Result<Vec<Playlist>> {
        let _session = self.lock().await;

        let count = match self.player.playlist_count().await {
            Reply::Ok(count) if count > 0 => count,
            _ => {
                info!("Player reported no playlists to migrate");
                return Ok(Vec::new());
            }
        };

        let original_slot = self.player.current_playlist_index().await;
        let imported = self.import_player_playlists(count).await;

        if let Reply::Ok(slot) = original_slot {
            self.player.set_current_playlist_index(slot).await;
        }

        let imported = imported?;
        info!(playlists = imported.len(), "Migrated playlists from player");
        Ok(imported)
    }

    async fn import_player_playlists(&self, count: usize) -> Result<Vec<Playlist>> {
        let mut imported = Vec::with_capacity(count);

        for slot in 0..count {
            if self.player.set_current_playlist_index(slot).await.is_unavailable() {
                warn!(slot, "Cannot switch player playlist, skipping");
                continue;
            }

            let name = self
                .player
                .current_playlist_name()
                .await
                .or_else(|| format!("Playlist {}", slot + 1));

            // Unreported settings import as off
            let mut settings = PlaylistSettings::default();
            for setting in PlayerSetting::ALL {
                settings.set(setting, self.player.setting(setting).await.or(false));
            }

            let filenames = self.player.queue_filenames().await;
            let playlist = self.storage.create_playlist(&name, settings).await?;

            for raw in &filenames {
                let filename = paths::from_player_filename(raw);
                let track = self.find_or_create_track(&filename).await?;
                self.storage
                    .add_track_to_playlist(&playlist.id, &track.id)
                    .await?;
            }

            debug!(slot, name = %playlist.name, tracks = filenames.len(), "Imported player playlist");

            let playlist = self
                .storage
                .get_playlist_by_id(&playlist.id)
                .await?
                .unwrap_or(playlist);
            imported.push(playlist);
        }

        Ok(imported)
    }

    /// Fresh player status, matched against the track library
    pub async fn player_status(&self) -> Result<NowPlaying> {
        let _session = self.lock().await;

        let status = self.player.status().await;
        let filename = status
            .song
            .as_ref()
            .and_then(|song| song.filename.as_deref())
            .map(paths::from_player_filename);

        let track_id = match filename {
            Some(filename) => self
                .storage
                .get_track_by_filename(&filename)
                .await?
                .map(|track| track.id),
            None => None,
        };

        Ok(NowPlaying { status, track_id })
    }

    // ========================================================================
    // Player controls
    // ========================================================================
    //
    // These share the session lock with load and migrate, which read a
    // setting and toggle it in two steps.

    pub async fn send_player_command(&self, command: PlayerCommand) {
        let _session = self.lock().await;
        let player = &self.player;

        let reply = match command {
            PlayerCommand::Play => player.play().await,
            PlayerCommand::Pause => player.pause().await,
            PlayerCommand::PlayPause => player.play_pause().await,
            PlayerCommand::Stop => player.stop().await,
            PlayerCommand::Next => player.next().await,
            PlayerCommand::Previous => player.previous().await,
            PlayerCommand::ClearQueue => player.clear_queue().await,
            PlayerCommand::Seek(seconds) => player.seek(seconds).await,
            PlayerCommand::SeekRelative(offset) => player.seek_relative(offset).await,
            PlayerCommand::Jump(position) => player.jump_to(position).await,
            PlayerCommand::Delete(position) => player.delete_at(position).await,
        };

        if reply.is_unavailable() {
            debug!(?command, "Player did not accept command");
        }
    }

    /// Player volume, or the configured default when unreadable
    pub async fn player_volume(&self) -> u8 {
        let _session = self.lock().await;
        self.player
            .volume()
            .await
            .or(self.player.default_volume())
    }

    /// Set the volume; returns the value clamped to 0..=100
    pub async fn set_player_volume(&self, volume: i64) -> u8 {
        let _session = self.lock().await;
        self.player.set_volume(volume).await;
        volume.clamp(0, 100) as u8
    }

    pub async fn player_settings(&self) -> PlaylistSettings {
        let _session = self.lock().await;
        self.player.settings().await
    }

    /// Flip one player setting and return the settings afterwards
    pub async fn toggle_player_setting(&self, setting: PlayerSetting) -> PlaylistSettings {
        let _session = self.lock().await;
        self.player.toggle_setting(setting).await;
        self.player.settings().await
    }

    pub async fn player_queue(&self) -> QueueView {
        let _session = self.lock().await;

        let entries = self.player.queue_entries().await;
        let position = if entries.is_empty() {
            None
        } else {
            self.player.queue_position().await.ok()
        };
        QueueView { position, entries }
    }

    /// Replace the queue with one URL and start playback
    pub async fn play_url(&self, url: &str) {
        let _session = self.lock().await;
        self.player.clear_queue().await;
        self.player.append_url(url).await;
        self.player.play().await;
        debug!(url, "Playing single file");
    }

    pub async fn queue_url(&self, url: &str) {
        let _session = self.lock().await;
        self.player.append_url(url).await;
    }
}

fn is_within(path: &Path, watch_path: &WatchPath) -> bool {
    let root = Path::new(&watch_path.path);
    if watch_path.recursive {
        path.starts_with(root)
    } else {
        path.parent() == Some(root)
    }
}
