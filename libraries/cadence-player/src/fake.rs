//! In-memory stand-in for audtool.
//!
//! Models the command surface the adapter uses, including audtool's 1-based
//! numbering and exit-status checks, and records every call for assertions.

use crate::error::PlayerError;
use crate::runner::CommandRunner;
use async_trait::async_trait;
use cadence_core::{format_length, PlaylistSettings};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A playlist inside the fake player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePlaylist {
    pub name: String,
    pub songs: Vec<String>,
    pub settings: PlaylistSettings,
    /// 0-based entry the playlist is positioned on
    pub position: usize,
}

impl FakePlaylist {
    pub fn new<I, S>(name: &str, songs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            songs: songs.into_iter().map(Into::into).collect(),
            settings: PlaylistSettings::default(),
            position: 0,
        }
    }

    pub fn with_settings(mut self, settings: PlaylistSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[derive(Debug)]
struct FakeState {
    available: bool,
    playlists: Vec<FakePlaylist>,
    current: usize,
    playing: bool,
    paused: bool,
    volume: u8,
    calls: Vec<String>,
}

/// Scripted audtool replacement
#[derive(Debug)]
pub struct FakeAudtool {
    state: Mutex<FakeState>,
}

impl Default for FakeAudtool {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAudtool {
    /// A running player with one empty playlist
    pub fn new() -> Self {
        Self::with_playlists(vec![FakePlaylist::new("Untitled Playlist", Vec::<String>::new())])
    }

    pub fn with_playlists(playlists: Vec<FakePlaylist>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                available: true,
                playlists,
                current: 0,
                playing: false,
                paused: false,
                volume: 80,
                calls: Vec::new(),
            }),
        }
    }

    /// A player whose binary cannot be started
    pub fn unavailable() -> Self {
        let fake = Self::new();
        fake.set_available(false);
        fake
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    pub fn set_playing(&self, playing: bool) {
        let mut state = self.lock();
        state.playing = playing;
        state.paused = false;
    }

    pub fn set_current_slot(&self, slot: usize) {
        self.lock().current = slot;
    }

    pub fn set_settings(&self, slot: usize, settings: PlaylistSettings) {
        if let Some(playlist) = self.lock().playlists.get_mut(slot) {
            playlist.settings = settings;
        }
    }

    /// Every command received, formatted as `command arg...`
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Command names only, in order
    pub fn commands(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn playlists(&self) -> Vec<FakePlaylist> {
        self.lock().playlists.clone()
    }

    /// 0-based active slot
    pub fn current_slot(&self) -> usize {
        self.lock().current
    }

    pub fn current_playlist(&self) -> FakePlaylist {
        let state = self.lock();
        state.playlists[state.current].clone()
    }

    pub fn volume(&self) -> u8 {
        self.lock().volume
    }
}

fn title_of(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn failed(command: &str, stderr: &str) -> PlayerError {
    PlayerError::Failed {
        command: command.to_string(),
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

/// Parse a 1-based index argument into a 0-based index below `len`
fn index_arg(command: &str, args: &[String], len: usize) -> Result<usize, PlayerError> {
    args.first()
        .and_then(|a| a.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .filter(|i| *i < len)
        .ok_or_else(|| failed(command, "index out of range"))
}

fn toggle(value: &mut bool) -> String {
    *value = !*value;
    String::new()
}

fn switch(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

impl FakeState {
    fn playlist(&mut self) -> &mut FakePlaylist {
        if self.playlists.is_empty() {
            self.playlists.push(FakePlaylist::new("Untitled Playlist", Vec::<String>::new()));
            self.current = 0;
        }
        let current = self.current.min(self.playlists.len() - 1);
        &mut self.playlists[current]
    }

    fn current_song(&mut self) -> Option<String> {
        let playlist = self.playlist();
        playlist.songs.get(playlist.position).cloned()
    }

    fn handle(&mut self, command: &str, args: &[String]) -> Result<String, PlayerError> {
        let output = match command {
            "playback-playing" if self.playing => String::new(),
            "playback-paused" if self.paused => String::new(),
            "playback-playing" | "playback-paused" => return Err(failed(command, "")),
            "playback-play" => {
                self.playing = true;
                self.paused = false;
                String::new()
            }
            "playback-pause" => {
                if self.playing {
                    self.playing = false;
                    self.paused = true;
                }
                String::new()
            }
            "playback-playpause" => {
                std::mem::swap(&mut self.playing, &mut self.paused);
                if !self.playing && !self.paused {
                    self.playing = true;
                }
                String::new()
            }
            "playback-stop" => {
                self.playing = false;
                self.paused = false;
                String::new()
            }
            "playback-seek" | "playback-seek-relative" => String::new(),
            "playlist-advance" => {
                let playlist = self.playlist();
                if playlist.position + 1 < playlist.songs.len() {
                    playlist.position += 1;
                }
                String::new()
            }
            "playlist-reverse" => {
                let playlist = self.playlist();
                playlist.position = playlist.position.saturating_sub(1);
                String::new()
            }
            "get-volume" => self.volume.to_string(),
            "set-volume" => {
                self.volume = args
                    .first()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| failed(command, "bad volume"))?;
                String::new()
            }
            "playlist-length" => self.playlist().songs.len().to_string(),
            "playlist-position" => {
                let playlist = self.playlist();
                if playlist.songs.is_empty() {
                    "0".to_string()
                } else {
                    (playlist.position + 1).to_string()
                }
            }
            "playlist-jump" => {
                let playlist = self.playlist();
                playlist.position = index_arg(command, args, playlist.songs.len())?;
                String::new()
            }
            "playlist-delete" => {
                let playlist = self.playlist();
                let index = index_arg(command, args, playlist.songs.len())?;
                playlist.songs.remove(index);
                if playlist.position >= playlist.songs.len() {
                    playlist.position = playlist.songs.len().saturating_sub(1);
                }
                String::new()
            }
            "playlist-song" | "playlist-song-filename" | "playlist-song-length" => {
                let playlist = self.playlist();
                let index = index_arg(command, args, playlist.songs.len())?;
                let song = &playlist.songs[index];
                match command {
                    "playlist-song" => title_of(song),
                    "playlist-song-filename" => song.clone(),
                    _ => format_length(0),
                }
            }
            "playlist-clear" => {
                let playlist = self.playlist();
                playlist.songs.clear();
                playlist.position = 0;
                String::new()
            }
            "playlist-addurl" => {
                let url = args
                    .first()
                    .cloned()
                    .ok_or_else(|| failed(command, "missing url"))?;
                self.playlist().songs.push(url);
                String::new()
            }
            "number-of-playlists" => self.playlists.len().to_string(),
            "current-playlist" => (self.current + 1).to_string(),
            "set-current-playlist" => {
                self.current = index_arg(command, args, self.playlists.len())?;
                String::new()
            }
            "current-playlist-name" => self.playlist().name.clone(),
            "set-current-playlist-name" => {
                self.playlist().name = args.join(" ");
                String::new()
            }
            "new-playlist" => {
                let slot = (self.current + 1).min(self.playlists.len());
                self.playlists
                    .insert(slot, FakePlaylist::new("New Playlist", Vec::<String>::new()));
                self.current = slot;
                String::new()
            }
            "delete-current-playlist" => {
                if !self.playlists.is_empty() {
                    self.playlists.remove(self.current.min(self.playlists.len() - 1));
                }
                self.current = self.current.min(self.playlists.len().saturating_sub(1));
                String::new()
            }
            "playlist-shuffle-status" => switch(self.playlist().settings.shuffle),
            "playlist-repeat-status" => switch(self.playlist().settings.repeat),
            "playlist-stop-after-status" => switch(self.playlist().settings.stop_after_current),
            "playlist-auto-advance-status" => switch(self.playlist().settings.auto_advance),
            "playlist-shuffle-toggle" => toggle(&mut self.playlist().settings.shuffle),
            "playlist-repeat-toggle" => toggle(&mut self.playlist().settings.repeat),
            "playlist-stop-after-toggle" => {
                toggle(&mut self.playlist().settings.stop_after_current)
            }
            "playlist-auto-advance-toggle" => toggle(&mut self.playlist().settings.auto_advance),
            "current-song" => self.current_song().map(|s| title_of(&s)).unwrap_or_default(),
            "current-song-filename" => self.current_song().unwrap_or_default(),
            "current-song-tuple-data" => String::new(),
            "current-song-length" | "current-song-output-length" => self
                .current_song()
                .map(|_| format_length(0))
                .unwrap_or_default(),
            "current-song-length-seconds" | "current-song-output-length-seconds" => self
                .current_song()
                .map(|_| "0".to_string())
                .unwrap_or_default(),
            "current-song-bitrate-kbps" => self
                .current_song()
                .map(|_| "320".to_string())
                .unwrap_or_default(),
            _ => return Err(failed(command, "unknown command")),
        };

        Ok(output)
    }
}

#[async_trait]
impl CommandRunner for FakeAudtool {
    async fn run(&self, command: &str, args: &[String]) -> Result<String, PlayerError> {
        let mut state = self.lock();

        let mut call = command.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        state.calls.push(call);

        if !state.available {
            return Err(PlayerError::Spawn {
                program: "audtool".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }

        state.handle(command, args)
    }
}
