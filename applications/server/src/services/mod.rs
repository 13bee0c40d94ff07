//! Server services
pub mod file_browser;

pub use file_browser::{file_url, DirectoryListing, FileBrowser};
