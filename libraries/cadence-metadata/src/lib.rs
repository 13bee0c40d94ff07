//! Cadence Metadata
//!
//! Tag extraction and audio file discovery.
//!
//! This crate provides:
//! - Best-effort tag and duration reading through lofty
//! - Directory scanning filtered by an extension allow-list
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_metadata::{AudioFileScanner, LoftyMetadataReader};
//! use cadence_core::MetadataReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = LoftyMetadataReader::new();
//! let metadata = reader.read(Path::new("/music/song.mp3"))?;
//!
//! let scanner = AudioFileScanner::default();
//! let files = scanner.discover(Path::new("/music"), true);
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;
mod scanner;

pub use error::{MetadataError, Result};
pub use reader::LoftyMetadataReader;
pub use scanner::{AudioFileScanner, DEFAULT_EXTENSIONS};
