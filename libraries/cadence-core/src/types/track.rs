//! Track domain types
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A registered audio file.
///
/// Tracks are deduplicated by `filename`: at most one track exists per
/// distinct path. Fields never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Duration formatted as `M:SS`
    pub length: Option<String>,

    /// Duration in whole seconds
    pub length_seconds: Option<i64>,

    /// Absolute path of the audio file
    pub filename: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Record version
    pub version: i64,
}

impl Track {
    /// Title to show to users, falling back to the file name
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => file_name_title(&self.filename),
        }
    }
}

/// Metadata extracted from an audio file.
///
/// Every field is best effort; readers leave unknown values empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<u64>,
}

/// Data for registering a new track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTrack {
    pub filename: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub length: Option<String>,
    pub length_seconds: Option<i64>,
}

impl CreateTrack {
    /// Build a track from extracted metadata.
    ///
    /// `None` means extraction failed: the title falls back to the file name
    /// and the duration fields stay empty.
    pub fn from_metadata(filename: impl Into<String>, metadata: Option<TrackMetadata>) -> Self {
        let filename = filename.into();
        let fallback = file_name_title(&filename);

        match metadata {
            Some(meta) => Self {
                title: Some(meta.title.filter(|t| !t.trim().is_empty()).unwrap_or(fallback)),
                artist: meta.artist,
                album: meta.album,
                length: meta.duration_seconds.map(format_length),
                length_seconds: meta.duration_seconds.map(|s| s as i64),
                filename,
            },
            None => Self {
                title: Some(fallback),
                artist: None,
                album: None,
                length: None,
                length_seconds: None,
                filename,
            },
        }
    }
}

/// Format a duration in seconds as `M:SS`
pub fn format_length(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn file_name_title(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_length_pads_seconds() {
        assert_eq!(format_length(0), "0:00");
        assert_eq!(format_length(65), "1:05");
        assert_eq!(format_length(180), "3:00");
        assert_eq!(format_length(3601), "60:01");
    }

    #[test]
    fn from_metadata_uses_extracted_fields() {
        let meta = TrackMetadata {
            title: Some("Song A".to_string()),
            artist: Some("Artist".to_string()),
            album: None,
            duration_seconds: Some(180),
        };

        let track = CreateTrack::from_metadata("/music/a.mp3", Some(meta));

        assert_eq!(track.title.as_deref(), Some("Song A"));
        assert_eq!(track.artist.as_deref(), Some("Artist"));
        assert_eq!(track.length.as_deref(), Some("3:00"));
        assert_eq!(track.length_seconds, Some(180));
    }

    #[test]
    fn failed_extraction_falls_back_to_file_name() {
        let track = CreateTrack::from_metadata("/music/Some Band - Tune.flac", None);

        assert_eq!(track.title.as_deref(), Some("Some Band - Tune.flac"));
        assert_eq!(track.length, None);
        assert_eq!(track.length_seconds, None);
    }

    #[test]
    fn blank_title_tag_falls_back_to_file_name() {
        let meta = TrackMetadata {
            title: Some("   ".to_string()),
            ..Default::default()
        };

        let track = CreateTrack::from_metadata("/music/x.ogg", Some(meta));
        assert_eq!(track.title.as_deref(), Some("x.ogg"));
    }

    #[test]
    fn display_title_without_title() {
        let track = Track {
            id: TrackId::new("t"),
            title: None,
            artist: None,
            album: None,
            length: None,
            length_seconds: None,
            filename: "/a/b/c.mp3".to_string(),
            created_at: Utc::now(),
            version: 1,
        };
        assert_eq!(track.display_title(), "c.mp3");
    }
}
