//! Playlist domain types
use crate::types::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-playlist playback settings mirrored onto the player on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSettings {
    pub shuffle: bool,
    pub repeat: bool,
    pub stop_after_current: bool,
    pub auto_advance: bool,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: false,
            stop_after_current: false,
            auto_advance: true,
        }
    }
}

impl PlaylistSettings {
    /// Read a single setting
    pub fn get(&self, setting: PlayerSetting) -> bool {
        match setting {
            PlayerSetting::Shuffle => self.shuffle,
            PlayerSetting::Repeat => self.repeat,
            PlayerSetting::StopAfter => self.stop_after_current,
            PlayerSetting::AutoAdvance => self.auto_advance,
        }
    }

    /// Overwrite a single setting
    pub fn set(&mut self, setting: PlayerSetting, value: bool) {
        match setting {
            PlayerSetting::Shuffle => self.shuffle = value,
            PlayerSetting::Repeat => self.repeat = value,
            PlayerSetting::StopAfter => self.stop_after_current = value,
            PlayerSetting::AutoAdvance => self.auto_advance = value,
        }
    }
}

/// The four boolean toggles shared by playlists and the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSetting {
    Shuffle,
    Repeat,
    StopAfter,
    AutoAdvance,
}

impl PlayerSetting {
    /// Every setting, in the order they are applied to the player
    pub const ALL: [PlayerSetting; 4] = [
        PlayerSetting::Repeat,
        PlayerSetting::Shuffle,
        PlayerSetting::StopAfter,
        PlayerSetting::AutoAdvance,
    ];
}

/// Partial settings update; only present keys are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    pub shuffle: Option<bool>,
    pub repeat: Option<bool>,
    pub stop_after_current: Option<bool>,
    pub auto_advance: Option<bool>,
}

impl SettingsUpdate {
    /// Apply the present keys onto `settings`
    pub fn apply_to(&self, settings: &mut PlaylistSettings) {
        if let Some(v) = self.shuffle {
            settings.shuffle = v;
        }
        if let Some(v) = self.repeat {
            settings.repeat = v;
        }
        if let Some(v) = self.stop_after_current {
            settings.stop_after_current = v;
        }
        if let Some(v) = self.auto_advance {
            settings.auto_advance = v;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shuffle.is_none()
            && self.repeat.is_none()
            && self.stop_after_current.is_none()
            && self.auto_advance.is_none()
    }
}

/// An ordered collection of track references.
///
/// `track_ids` is playback order and never contains the same id twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Playback settings
    pub settings: PlaylistSettings,

    /// Track ids in playback order
    pub track_ids: Vec<TrackId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Bumped on every mutation
    pub updated_at: DateTime<Utc>,

    /// Record version, bumped on every mutation
    pub version: i64,
}

impl Playlist {
    /// Create an empty playlist with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, PlaylistSettings::default())
    }

    /// Create an empty playlist with the given settings
    pub fn with_settings(name: impl Into<String>, settings: PlaylistSettings) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            settings,
            track_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.track_ids.contains(track_id)
    }

    /// Index of `track_id` in playback order
    pub fn position_of(&self, track_id: &TrackId) -> Option<usize> {
        self.track_ids.iter().position(|id| id == track_id)
    }

    /// Append a track; returns false if it was already present
    pub fn append_track(&mut self, track_id: TrackId) -> bool {
        if self.contains(&track_id) {
            return false;
        }
        self.track_ids.push(track_id);
        true
    }

    /// Remove a track; returns false if it was absent
    pub fn remove_track(&mut self, track_id: &TrackId) -> bool {
        match self.position_of(track_id) {
            Some(index) => {
                self.track_ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move a track to `new_index`, clamped into `[0, len - 1]`.
    ///
    /// Other tracks keep their relative order. Returns false if the track is
    /// absent or already sits at the clamped index.
    pub fn move_track(&mut self, track_id: &TrackId, new_index: i64) -> bool {
        let Some(current) = self.position_of(track_id) else {
            return false;
        };

        let last = self.track_ids.len() as i64 - 1;
        let target = new_index.clamp(0, last) as usize;
        if target == current {
            return false;
        }

        let id = self.track_ids.remove(current);
        self.track_ids.insert(target, id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playlist_with(n: usize) -> (Playlist, Vec<TrackId>) {
        let mut playlist = Playlist::new("Test");
        let ids: Vec<TrackId> = (0..n).map(|i| TrackId::new(format!("t{i}"))).collect();
        for id in &ids {
            playlist.append_track(id.clone());
        }
        (playlist, ids)
    }

    #[test]
    fn new_playlist_has_default_settings() {
        let playlist = Playlist::new("Mix");
        assert!(!playlist.settings.shuffle);
        assert!(!playlist.settings.repeat);
        assert!(!playlist.settings.stop_after_current);
        assert!(playlist.settings.auto_advance);
        assert!(playlist.is_empty());
    }

    #[test]
    fn append_is_idempotent() {
        let (mut playlist, ids) = playlist_with(2);
        assert!(!playlist.append_track(ids[0].clone()));
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn remove_absent_track_leaves_playlist_unchanged() {
        let (mut playlist, ids) = playlist_with(3);
        assert!(!playlist.remove_track(&TrackId::new("missing")));
        assert_eq!(playlist.track_ids, ids);
    }

    #[test]
    fn move_track_forward_and_back() {
        let (mut playlist, ids) = playlist_with(4);

        assert!(playlist.move_track(&ids[0], 2));
        assert_eq!(
            playlist.track_ids,
            vec![ids[1].clone(), ids[2].clone(), ids[0].clone(), ids[3].clone()]
        );

        assert!(playlist.move_track(&ids[3], 0));
        assert_eq!(
            playlist.track_ids,
            vec![ids[3].clone(), ids[1].clone(), ids[2].clone(), ids[0].clone()]
        );
    }

    #[test]
    fn move_track_clamps_out_of_range_index() {
        let (mut playlist, ids) = playlist_with(3);

        assert!(playlist.move_track(&ids[0], 99));
        assert_eq!(playlist.position_of(&ids[0]), Some(2));

        assert!(playlist.move_track(&ids[0], -5));
        assert_eq!(playlist.position_of(&ids[0]), Some(0));
    }

    #[test]
    fn move_track_to_same_index_reports_no_change() {
        let (mut playlist, ids) = playlist_with(3);
        assert!(!playlist.move_track(&ids[2], 7));
        assert!(!playlist.move_track(&TrackId::new("missing"), 0));
        assert_eq!(playlist.track_ids, ids);
    }

    #[test]
    fn settings_update_only_touches_present_keys() {
        let mut settings = PlaylistSettings::default();
        let update = SettingsUpdate {
            shuffle: Some(true),
            ..Default::default()
        };
        update.apply_to(&mut settings);

        assert!(settings.shuffle);
        assert!(settings.auto_advance);
        assert!(!settings.repeat);
    }

    #[test]
    fn settings_get_and_set_agree() {
        let mut settings = PlaylistSettings::default();
        for setting in PlayerSetting::ALL {
            settings.set(setting, true);
            assert!(settings.get(setting));
        }
    }

    proptest! {
        #[test]
        fn move_track_is_a_permutation(len in 1usize..20, from in 0usize..20, to in -30i64..30) {
            let (mut playlist, ids) = playlist_with(len);
            let from = from % len;
            let moved = ids[from].clone();

            playlist.move_track(&moved, to);

            let target = to.clamp(0, len as i64 - 1) as usize;
            prop_assert_eq!(playlist.len(), len);
            prop_assert_eq!(playlist.position_of(&moved), Some(target));

            let rest_before: Vec<_> = ids.iter().filter(|id| **id != moved).cloned().collect();
            let rest_after: Vec<_> = playlist.track_ids.iter().filter(|id| **id != moved).cloned().collect();
            prop_assert_eq!(&rest_after, &rest_before);

            let mut all = playlist.track_ids.clone();
            all.sort();
            let mut expected = ids.clone();
            expected.sort();
            prop_assert_eq!(all, expected);
        }

        #[test]
        fn repeated_appends_never_duplicate(picks in proptest::collection::vec(0usize..5, 0..40)) {
            let mut playlist = Playlist::new("p");
            for pick in picks {
                playlist.append_track(TrackId::new(format!("t{pick}")));
            }
            let mut ids = playlist.track_ids.clone();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), playlist.len());
        }
    }
}
