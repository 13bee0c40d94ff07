//! Cadence Server - playlist manager for the Audacious player
use anyhow::Context;
use cadence_core::WatchPathId;
use cadence_library::{watcher, PlaylistService, WatchPathMonitor};
use cadence_metadata::{AudioFileScanner, LoftyMetadataReader};
use cadence_player::{AudtoolPlayer, AudtoolRunner};
use cadence_server::{config::ServerConfig, create_router, services::FileBrowser, state::AppState};
use cadence_storage::LocalStorageContext;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Playlist manager driving Audacious through audtool", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Import every playlist the player currently holds
    Migrate,
    /// List internal playlists
    Playlists,
    /// Scan a watch path and add its files to the playlist
    Scan {
        /// Watch path id
        watch_path_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_server=info,cadence_library=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Migrate => migrate(&config).await?,
        Commands::Playlists => list_playlists(&config).await?,
        Commands::Scan { watch_path_id } => scan(&config, &watch_path_id).await?,
    }

    Ok(())
}

/// Open the database and wire the playlist service to the player
async fn open_service(config: &ServerConfig) -> anyhow::Result<PlaylistService> {
    ensure_database_dir(&config.storage.database_url)?;

    let pool = cadence_storage::create_pool(&config.storage.database_url).await?;
    cadence_storage::run_migrations(&pool).await?;
    let storage = Arc::new(LocalStorageContext::new(pool));
    tracing::info!("Database connected");

    let runner = Arc::new(AudtoolRunner::new(
        config.player.command.clone(),
        config.player.timeout(),
    ));
    let player = AudtoolPlayer::new(runner, config.player.default_volume);
    let scanner = AudioFileScanner::new(&config.library.allowed_extensions);

    Ok(PlaylistService::new(
        storage,
        Arc::new(LoftyMetadataReader::new()),
        player,
        scanner,
    ))
}

/// SQLite creates the file but not its directory
fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .map(|rest| rest.split('?').next().unwrap_or(rest))
        .filter(|path| !path.is_empty() && *path != ":memory:");

    if let Some(parent) = path.and_then(|p| std::path::Path::new(p).parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }
    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let mut service = open_service(&config).await?;

    let mut events = None;
    if config.library.watch {
        let (monitor, event_rx) = WatchPathMonitor::new(config.library.debounce());
        service = service.with_monitor(Arc::new(monitor));
        events = Some(event_rx);
    }
    let service = Arc::new(service);

    if let Some(event_rx) = events {
        tokio::spawn(watcher::run_event_loop(Arc::clone(&service), event_rx));
        let watched = service.start_watching().await?;
        tracing::info!("Watching {} watch paths", watched);
    }

    let browser = FileBrowser::new(config.library.browser_root(), service.scanner().clone());
    tracing::info!("File browser root: {}", browser.root().display());

    let app = create_router(AppState::new(service, Arc::new(browser)));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: &ServerConfig) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let playlists = service.migrate_from_player().await?;

    if playlists.is_empty() {
        println!("No playlists imported (is Audacious running?)");
        return Ok(());
    }

    println!("Imported {} playlists:", playlists.len());
    for playlist in playlists {
        println!("  {} - {} ({} tracks)", playlist.id, playlist.name, playlist.len());
    }
    Ok(())
}

async fn list_playlists(config: &ServerConfig) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let playlists = service.list_playlists().await?;

    println!("Playlists:");
    for playlist in playlists {
        println!("  {} - {} ({} tracks)", playlist.id, playlist.name, playlist.len());
    }
    Ok(())
}

async fn scan(config: &ServerConfig, watch_path_id: &str) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let report = service
        .scan_watch_path(&WatchPathId::new(watch_path_id))
        .await?
        .with_context(|| format!("watch path {watch_path_id} not found"))?;

    println!(
        "Found {} files, added {} tracks",
        report.files_found, report.tracks_added
    );
    Ok(())
}
