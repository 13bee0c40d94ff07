//! Cadence Player
//!
//! Control of an external Audacious instance through the `audtool`
//! command-line interface.
//!
//! Every command is a separate process invocation. Reads return
//! [`Reply::Unavailable`] when the process is missing, fails, times out or
//! prints something unparseable; callers pick the default. Writes are fire
//! and forget.
//!
//! Queue positions and playlist slots are 0-based here and translated to
//! audtool's 1-based numbering at the command boundary.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_player::{AudtoolPlayer, AudtoolRunner};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let runner = AudtoolRunner::new("audtool", Duration::from_secs(5));
//! let player = AudtoolPlayer::new(Arc::new(runner), 50);
//!
//! let status = player.status().await;
//! println!("{:?} at volume {}", status.state, status.volume);
//! # }
//! ```

mod adapter;
mod error;
mod reply;
mod runner;
mod status;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

pub use adapter::AudtoolPlayer;
pub use error::PlayerError;
pub use reply::Reply;
pub use runner::{AudtoolRunner, CommandRunner};
pub use status::{PlaybackState, PlayerStatus, QueueEntry, SongInfo};
