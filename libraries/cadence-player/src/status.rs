use cadence_core::PlaylistSettings;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

/// Details of the song the player has loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SongInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub length: Option<String>,
    pub length_seconds: Option<u64>,
    /// Elapsed time, `M:SS`
    pub position: Option<String>,
    pub position_seconds: Option<u64>,
    pub bitrate_kbps: Option<u32>,
    pub filename: Option<String>,
}

impl SongInfo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.filename.is_none()
    }
}

/// One entry of the player's active queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    /// 0-based
    pub position: usize,
    pub title: Option<String>,
    pub filename: Option<String>,
    pub length: Option<String>,
}

/// Snapshot of the player, with defaults filled in for anything it did not
/// report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatus {
    pub state: PlaybackState,
    pub volume: u8,
    /// 0-based queue position
    pub position: usize,
    pub length: usize,
    pub song: Option<SongInfo>,
    pub settings: PlaylistSettings,
}
