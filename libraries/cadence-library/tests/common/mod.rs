//! Shared fixtures: a real SQLite file database, the in-memory audtool
//! model and a metadata reader that never touches the files.

#![allow(dead_code)]

use cadence_core::{CadenceError, MetadataReader, TrackMetadata};
use cadence_library::PlaylistService;
use cadence_metadata::AudioFileScanner;
use cadence_player::fake::{FakeAudtool, FakePlaylist};
use cadence_player::{AudtoolPlayer, CommandRunner, PlayerError};
use cadence_storage::LocalStorageContext;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Answers "Song A" / 180 s for every file and counts reads
#[derive(Debug, Default)]
pub struct StubReader {
    reads: AtomicUsize,
    failing: AtomicBool,
}

impl StubReader {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl MetadataReader for StubReader {
    fn read(&self, path: &Path) -> cadence_core::Result<TrackMetadata> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CadenceError::metadata(format!(
                "unreadable: {}",
                path.display()
            )));
        }
        Ok(TrackMetadata {
            title: Some("Song A".to_string()),
            artist: Some("Artist".to_string()),
            album: Some("Album".to_string()),
            duration_seconds: Some(180),
        })
    }
}

/// Forwards to a [`FakeAudtool`], optionally stalling after some commands
/// or failing others outright
pub struct ScriptedRunner {
    inner: Arc<FakeAudtool>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
}

impl ScriptedRunner {
    pub fn new(inner: Arc<FakeAudtool>) -> Self {
        Self {
            inner,
            delays: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    /// Sleep for `delay` after `command` has been answered
    pub fn delay_after(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(command.to_string(), delay);
        self
    }

    /// Answer `command` with a non-zero exit
    pub fn failing(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str, args: &[String]) -> Result<String, PlayerError> {
        if self.failing.contains(command) {
            return Err(PlayerError::Failed {
                command: command.to_string(),
                code: Some(1),
                stderr: String::new(),
            });
        }

        let output = self.inner.run(command, args).await;
        if let Some(delay) = self.delays.get(command) {
            tokio::time::sleep(*delay).await;
        }
        output
    }
}

pub struct Harness {
    pub service: Arc<PlaylistService>,
    pub fake: Arc<FakeAudtool>,
    pub reader: Arc<StubReader>,
    pub storage: LocalStorageContext,
    _db_dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_player(FakeAudtool::new()).await
    }

    pub async fn with_player_playlists(playlists: Vec<FakePlaylist>) -> Self {
        Self::with_player(FakeAudtool::with_playlists(playlists)).await
    }

    pub async fn with_player(fake: FakeAudtool) -> Self {
        let fake = Arc::new(fake);
        Self::with_runner(fake.clone(), fake).await
    }

    /// Drive the service through `runner`; `fake` is the state it ends up in
    pub async fn with_runner(fake: Arc<FakeAudtool>, runner: Arc<dyn CommandRunner>) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let pool = cadence_storage::create_pool(&url)
            .await
            .expect("Failed to create pool");
        cadence_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let storage = LocalStorageContext::new(pool);
        let reader = Arc::new(StubReader::default());
        let service = Arc::new(PlaylistService::new(
            Arc::new(storage.clone()),
            reader.clone(),
            AudtoolPlayer::new(runner, 50),
            AudioFileScanner::default(),
        ));

        Self {
            service,
            fake,
            reader,
            storage,
            _db_dir: db_dir,
        }
    }
}

/// Create empty files (and their parent directories) below `root`
pub fn touch_files(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create directory");
            }
            fs::write(&path, b"").expect("Failed to write file");
            path
        })
        .collect()
}
