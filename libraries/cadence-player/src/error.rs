//! Errors raised while invoking the player control tool
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    /// The tool could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool did not finish in time
    #[error("{command} timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u128 },

    /// The tool exited with a non-zero status
    #[error("{command} exited with {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl PlayerError {
    /// Whether the tool ran and answered with a failing exit status.
    ///
    /// Status checks such as `playback-playing` answer "no" this way.
    pub fn is_exit_status(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
