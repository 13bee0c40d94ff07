//! Process runner for the audtool command-line tool
use crate::error::PlayerError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs one player control command and returns its trimmed stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str, args: &[String]) -> Result<String, PlayerError>;
}

/// Runs commands by spawning the audtool binary
#[derive(Debug, Clone)]
pub struct AudtoolRunner {
    program: PathBuf,
    timeout: Duration,
}

impl AudtoolRunner {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for AudtoolRunner {
    async fn run(&self, command: &str, args: &[String]) -> Result<String, PlayerError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| PlayerError::Timeout {
                command: command.to_string(),
                timeout_ms: self.timeout.as_millis(),
            })?
            .map_err(|source| PlayerError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(PlayerError::Failed {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
