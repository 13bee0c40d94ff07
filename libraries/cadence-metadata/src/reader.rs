//! Metadata reader implementation using lofty
use crate::error::MetadataError;
use cadence_core::{MetadataReader, TrackMetadata};
use lofty::{AudioFile, ItemKey, TaggedFileExt};
use std::path::Path;

/// Metadata reader using the lofty library
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadataReader;

impl LoftyMetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Self {
        Self
    }

    fn text(tag: &lofty::Tag, key: &ItemKey) -> Option<String> {
        tag.get_string(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }

    fn extract_from_tag(tag: &lofty::Tag) -> TrackMetadata {
        TrackMetadata {
            title: Self::text(tag, &ItemKey::TrackTitle),
            artist: Self::text(tag, &ItemKey::TrackArtist),
            album: Self::text(tag, &ItemKey::AlbumTitle),
            duration_seconds: None,
        }
    }
}

impl MetadataReader for LoftyMetadataReader {
    fn read(&self, path: &Path) -> cadence_core::Result<TrackMetadata> {
        if !path.is_file() {
            return Err(MetadataError::FileNotFound(path.display().to_string()).into());
        }

        let tagged_file = lofty::read_from_path(path).map_err(MetadataError::from)?;

        let duration = tagged_file.properties().duration();
        let duration_seconds = (!duration.is_zero()).then(|| duration.as_secs());

        // Primary tag first, then whichever tag the container carries
        let mut metadata = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first())
            .map(Self::extract_from_tag)
            .unwrap_or_default();
        metadata.duration_seconds = duration_seconds;

        tracing::trace!(path = %path.display(), ?metadata, "Read metadata");

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_nonexistent_file_returns_error() {
        let reader = LoftyMetadataReader::new();
        let result = reader.read(Path::new("/nonexistent/file.mp3"));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
