//! Core traits for Cadence
use crate::error::Result;
use crate::types::TrackMetadata;
use std::path::Path;

/// Metadata reader trait
///
/// Implementers extract tag data and duration from audio files.
pub trait MetadataReader: Send + Sync {
    /// Read metadata from an audio file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    fn read(&self, path: &Path) -> Result<TrackMetadata>;
}
