//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cadence_library::PlaylistService;
use cadence_metadata::{AudioFileScanner, LoftyMetadataReader};
use cadence_player::{fake::FakeAudtool, AudtoolPlayer};
use cadence_server::{create_router, services::FileBrowser, state::AppState};
use cadence_storage::LocalStorageContext;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Router over a real SQLite file, the in-memory player and a temporary
/// browser root
pub struct TestApp {
    pub router: Router,
    pub fake: Arc<FakeAudtool>,
    pub service: Arc<PlaylistService>,
    pub music: TempDir,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_player(FakeAudtool::new()).await
    }

    pub async fn with_player(fake: FakeAudtool) -> Self {
        let db_dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let pool = cadence_storage::create_pool(&url).await.unwrap();
        cadence_storage::run_migrations(&pool).await.unwrap();

        let fake = Arc::new(fake);
        let service = Arc::new(PlaylistService::new(
            Arc::new(LocalStorageContext::new(pool)),
            Arc::new(LoftyMetadataReader::new()),
            AudtoolPlayer::new(fake.clone(), 50),
            AudioFileScanner::default(),
        ));

        let music = TempDir::new().unwrap();
        let browser = FileBrowser::new(music.path().to_path_buf(), AudioFileScanner::default());
        let router = create_router(AppState::new(Arc::clone(&service), Arc::new(browser)));

        Self {
            router,
            fake,
            service,
            music,
            _db_dir: db_dir,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a playlist through the API and return its id
    pub async fn create_playlist(&self, name: &str) -> String {
        let (status, body) = self
            .post("/api/playlists", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["playlist"]["id"].as_str().unwrap().to_string()
    }
}
