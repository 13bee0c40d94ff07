//! Audacious control through audtool
use crate::reply::Reply;
use crate::runner::CommandRunner;
use crate::status::{PlaybackState, PlayerStatus, QueueEntry, SongInfo};
use cadence_core::{PlayerSetting, PlaylistSettings};
use std::sync::Arc;

/// Commands whose exit status is the answer; a non-zero exit is not an error
const EXIT_STATUS_COMMANDS: &[&str] = &["playback-playing", "playback-paused"];

fn setting_command(setting: PlayerSetting) -> &'static str {
    match setting {
        PlayerSetting::Shuffle => "playlist-shuffle",
        PlayerSetting::Repeat => "playlist-repeat",
        PlayerSetting::StopAfter => "playlist-stop-after",
        PlayerSetting::AutoAdvance => "playlist-auto-advance",
    }
}

/// Adapter exposing the player with 0-based positions and tolerant reads
#[derive(Clone)]
pub struct AudtoolPlayer {
    runner: Arc<dyn CommandRunner>,
    default_volume: u8,
}

impl AudtoolPlayer {
    /// `default_volume` is reported whenever the player cannot be asked
    pub fn new(runner: Arc<dyn CommandRunner>, default_volume: u8) -> Self {
        Self {
            runner,
            default_volume: default_volume.min(100),
        }
    }

    /// Volume reported while the player cannot be asked
    pub fn default_volume(&self) -> u8 {
        self.default_volume
    }

    async fn query(&self, command: &str, args: &[String]) -> Reply<String> {
        match self.runner.run(command, args).await {
            Ok(output) => {
                tracing::debug!(command, ?args, "audtool ok");
                Reply::Ok(output)
            }
            Err(e) if e.is_exit_status() && EXIT_STATUS_COMMANDS.contains(&command) => {
                Reply::Unavailable
            }
            Err(e) => {
                tracing::warn!(command, ?args, error = %e, "audtool command failed");
                Reply::Unavailable
            }
        }
    }

    async fn command(&self, command: &str, args: &[String]) -> Reply<()> {
        self.query(command, args).await.map(|_| ())
    }

    async fn at_position(&self, command: &str, position: usize) -> Reply<String> {
        self.query(command, &[(position + 1).to_string()]).await
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub async fn play(&self) -> Reply<()> {
        self.command("playback-play", &[]).await
    }

    pub async fn pause(&self) -> Reply<()> {
        self.command("playback-pause", &[]).await
    }

    pub async fn play_pause(&self) -> Reply<()> {
        self.command("playback-playpause", &[]).await
    }

    pub async fn stop(&self) -> Reply<()> {
        self.command("playback-stop", &[]).await
    }

    pub async fn next(&self) -> Reply<()> {
        self.command("playlist-advance", &[]).await
    }

    pub async fn previous(&self) -> Reply<()> {
        self.command("playlist-reverse", &[]).await
    }

    /// Seek to an absolute position in seconds
    pub async fn seek(&self, seconds: u64) -> Reply<()> {
        self.command("playback-seek", &[seconds.to_string()]).await
    }

    /// Seek forward (positive) or backward (negative) by seconds
    pub async fn seek_relative(&self, offset: i64) -> Reply<()> {
        self.command("playback-seek-relative", &[offset.to_string()])
            .await
    }

    /// Playing, paused, or stopped when neither check answers
    pub async fn playback_state(&self) -> PlaybackState {
        if self.query("playback-playing", &[]).await.is_ok() {
            PlaybackState::Playing
        } else if self.query("playback-paused", &[]).await.is_ok() {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        }
    }

    // ========================================================================
    // Volume
    // ========================================================================

    pub async fn volume(&self) -> Reply<u8> {
        self.query("get-volume", &[])
            .await
            .parse::<u8>()
            .map(|v| v.min(100))
    }

    /// Set volume clamped to `[0, 100]`; answers with the value sent
    pub async fn set_volume(&self, volume: i64) -> Reply<u8> {
        let volume = volume.clamp(0, 100) as u8;
        self.command("set-volume", &[volume.to_string()])
            .await
            .map(|()| volume)
    }

    // ========================================================================
    // Queue (the player's active playlist)
    // ========================================================================

    pub async fn queue_length(&self) -> Reply<usize> {
        self.query("playlist-length", &[]).await.parse()
    }

    /// 0-based position of the current entry
    pub async fn queue_position(&self) -> Reply<usize> {
        self.query("playlist-position", &[])
            .await
            .parse::<usize>()
            .map(|p| p.saturating_sub(1))
    }

    pub async fn jump_to(&self, position: usize) -> Reply<()> {
        self.at_position("playlist-jump", position).await.map(|_| ())
    }

    pub async fn delete_at(&self, position: usize) -> Reply<()> {
        self.at_position("playlist-delete", position)
            .await
            .map(|_| ())
    }

    pub async fn song_title(&self, position: usize) -> Reply<String> {
        self.at_position("playlist-song", position)
            .await
            .non_empty()
    }

    pub async fn song_filename(&self, position: usize) -> Reply<String> {
        self.at_position("playlist-song-filename", position)
            .await
            .non_empty()
    }

    pub async fn song_length(&self, position: usize) -> Reply<String> {
        self.at_position("playlist-song-length", position)
            .await
            .non_empty()
    }

    pub async fn clear_queue(&self) -> Reply<()> {
        self.command("playlist-clear", &[]).await
    }

    /// Append a file path or URL to the queue
    pub async fn append_url(&self, url: &str) -> Reply<()> {
        self.command("playlist-addurl", &[url.to_string()]).await
    }

    /// Every queue entry; empty when the length is unknown
    pub async fn queue_entries(&self) -> Vec<QueueEntry> {
        let length = self.queue_length().await.or(0);
        let mut entries = Vec::with_capacity(length);

        for position in 0..length {
            entries.push(QueueEntry {
                position,
                title: self.song_title(position).await.ok(),
                filename: self.song_filename(position).await.ok(),
                length: self.song_length(position).await.ok(),
            });
        }

        entries
    }

    /// Filenames of every queue entry that reported one
    pub async fn queue_filenames(&self) -> Vec<String> {
        let length = self.queue_length().await.or(0);
        let mut filenames = Vec::with_capacity(length);

        for position in 0..length {
            if let Reply::Ok(filename) = self.song_filename(position).await {
                filenames.push(filename);
            }
        }

        filenames
    }

    // ========================================================================
    // Player playlists
    // ========================================================================

    pub async fn playlist_count(&self) -> Reply<usize> {
        self.query("number-of-playlists", &[]).await.parse()
    }

    /// 0-based slot of the active player playlist
    pub async fn current_playlist_index(&self) -> Reply<usize> {
        self.query("current-playlist", &[])
            .await
            .parse::<usize>()
            .and_then(|slot| slot.checked_sub(1).into())
    }

    pub async fn set_current_playlist_index(&self, index: usize) -> Reply<()> {
        self.command("set-current-playlist", &[(index + 1).to_string()])
            .await
    }

    pub async fn current_playlist_name(&self) -> Reply<String> {
        self.query("current-playlist-name", &[]).await.non_empty()
    }

    pub async fn set_current_playlist_name(&self, name: &str) -> Reply<()> {
        self.command("set-current-playlist-name", &[name.to_string()])
            .await
    }

    pub async fn new_playlist(&self) -> Reply<()> {
        self.command("new-playlist", &[]).await
    }

    pub async fn delete_current_playlist(&self) -> Reply<()> {
        self.command("delete-current-playlist", &[]).await
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub async fn setting(&self, setting: PlayerSetting) -> Reply<bool> {
        let command = format!("{}-status", setting_command(setting));
        self.query(&command, &[]).await.switch()
    }

    pub async fn toggle_setting(&self, setting: PlayerSetting) -> Reply<()> {
        let command = format!("{}-toggle", setting_command(setting));
        self.command(&command, &[]).await
    }

    /// All four settings, reporting off for any the player did not answer
    pub async fn settings(&self) -> PlaylistSettings {
        let mut settings = PlaylistSettings {
            shuffle: false,
            repeat: false,
            stop_after_current: false,
            auto_advance: false,
        };
        for setting in PlayerSetting::ALL {
            settings.set(setting, self.setting(setting).await.or(false));
        }
        settings
    }

    // ========================================================================
    // Current song and composite status
    // ========================================================================

    pub async fn current_song(&self) -> Option<SongInfo> {
        let info = SongInfo {
            title: self.query("current-song", &[]).await.non_empty().ok(),
            artist: self
                .query("current-song-tuple-data", &["artist".to_string()])
                .await
                .non_empty()
                .ok(),
            album: self
                .query("current-song-tuple-data", &["album".to_string()])
                .await
                .non_empty()
                .ok(),
            length: self.query("current-song-length", &[]).await.non_empty().ok(),
            length_seconds: self
                .query("current-song-length-seconds", &[])
                .await
                .parse()
                .ok(),
            position: self
                .query("current-song-output-length", &[])
                .await
                .non_empty()
                .ok(),
            position_seconds: self
                .query("current-song-output-length-seconds", &[])
                .await
                .parse()
                .ok(),
            bitrate_kbps: self
                .query("current-song-bitrate-kbps", &[])
                .await
                .parse()
                .ok(),
            filename: self
                .query("current-song-filename", &[])
                .await
                .non_empty()
                .ok(),
        };

        (!info.is_empty()).then_some(info)
    }

    /// Fresh snapshot of the player; never cached
    pub async fn status(&self) -> PlayerStatus {
        let state = self.playback_state().await;
        let volume = self.volume().await.or(self.default_volume);
        let position = self.queue_position().await.or(0);
        let length = self.queue_length().await.or(0);
        let song = self.current_song().await;
        let settings = self.settings().await;

        PlayerStatus {
            state,
            volume,
            position,
            length,
            song,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeAudtool, FakePlaylist};

    fn player(fake: &Arc<FakeAudtool>) -> AudtoolPlayer {
        AudtoolPlayer::new(fake.clone(), 50)
    }

    #[tokio::test]
    async fn positions_are_translated_to_one_based() {
        let fake = Arc::new(FakeAudtool::with_playlists(vec![FakePlaylist::new(
            "Queue",
            ["/m/a.mp3", "/m/b.mp3", "/m/c.mp3"],
        )]));
        let player = player(&fake);

        player.jump_to(0).await;
        player.delete_at(2).await;

        assert_eq!(
            fake.calls(),
            vec!["playlist-jump 1".to_string(), "playlist-delete 3".to_string()]
        );
        assert_eq!(player.queue_position().await, Reply::Ok(0));
    }

    #[tokio::test]
    async fn set_volume_clamps() {
        let fake = Arc::new(FakeAudtool::new());
        let player = player(&fake);

        assert_eq!(player.set_volume(250).await, Reply::Ok(100));
        assert_eq!(player.set_volume(-3).await, Reply::Ok(0));
        assert_eq!(fake.calls(), vec!["set-volume 100", "set-volume 0"]);
    }
}
