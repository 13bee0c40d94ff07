//! Server configuration
use crate::error::{Result, ServerError};
use cadence_metadata::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix; nested keys use `__`, e.g. `CADENCE_SERVER__PORT`
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// audtool binary, looked up on `PATH` when not absolute
    #[serde(default = "default_player_command")]
    pub command: PathBuf,

    /// Per-invocation timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Volume reported while the player is unreachable
    #[serde(default = "default_volume")]
    pub default_volume: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Root of the file browser; `~` is expanded
    #[serde(default = "default_browser_root")]
    pub browser_root: String,

    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Watch auto-add watch paths for new files
    #[serde(default = "default_watch")]
    pub watch: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl PlayerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl LibrarySettings {
    pub fn browser_root(&self) -> PathBuf {
        cadence_library::paths::normalize(&self.browser_root)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (or `path`) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("library.allowed_extensions"),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.allowed_extensions.is_empty() {
            return Err(ServerError::Config(
                "library.allowed_extensions must not be empty".to_string(),
            ));
        }

        if self.player.timeout_ms == 0 {
            return Err(ServerError::Config(
                "player.timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.player.default_volume > 100 {
            return Err(ServerError::Config(
                "player.default_volume must be between 0 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        command: default_player_command(),
        timeout_ms: default_timeout_ms(),
        default_volume: default_volume(),
    }
}

fn default_player_command() -> PathBuf {
    PathBuf::from("audtool")
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_volume() -> u8 {
    50
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        browser_root: default_browser_root(),
        allowed_extensions: default_allowed_extensions(),
        watch: default_watch(),
        debounce_ms: default_debounce_ms(),
    }
}

fn default_browser_root() -> String {
    "~/Music".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

fn default_watch() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    cadence_library::watcher::DEFAULT_DEBOUNCE_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            player: default_player(),
            library: default_library(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.player.command, PathBuf::from("audtool"));
        assert_eq!(config.library.allowed_extensions.len(), 13);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_extensions() {
        let mut config = ServerConfig::default();
        config.library.allowed_extensions.clear();

        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = ServerConfig::default();
        config.player.timeout_ms = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cadence.toml");
        std::fs::write(
            &path,
            "[server]\nport = 6100\n\n[library]\nallowed_extensions = [\"flac\"]\n",
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server.port, 6100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.library.allowed_extensions, vec!["flac"]);
        assert_eq!(config.player.timeout_ms, 5000);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = ServerConfig::load(Some(Path::new("/no/such/cadence.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
