//! Shared helpers for integration tests: an in-memory app and its owner.
#![allow(dead_code)]

use axum_test::TestServer;
use folio::{
    auth::jwt::AuthService,
    db::{seed, PortfolioStore},
    utils::toml_config::{FolioConfig, UploadConfig},
    AppState, FolioConfigManager,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const OWNER: &str = "owner";
pub const OWNER_PASSWORD: &str = "owner-password-123";
pub const JWT_SECRET: &str = "test_jwt_secret_key_for_testing_only";

/// A test app with its own upload directory, kept alive with the app.
pub struct TestApp {
    pub state: AppState,
    pub uploads: TempDir,
}

/// In-memory store, optionally seeded with the sample portfolio, plus the owner.
pub async fn create_test_app(seeded: bool) -> TestApp {
    let uploads = TempDir::new().expect("Failed to create upload dir");
    let state = create_test_state(uploads.path(), seeded).await;
    TestApp { state, uploads }
}

pub async fn create_test_state(upload_dir: &Path, seeded: bool) -> AppState {
    let store = PortfolioStore::new_memory()
        .await
        .expect("Failed to create in-memory store");
    let auth_service = AuthService::new(JWT_SECRET.to_string(), 3600);

    if seeded {
        seed::seed_portfolio(&store)
            .await
            .expect("Failed to seed portfolio");
    }
    seed::ensure_owner(&store, &auth_service, OWNER, OWNER_PASSWORD)
        .await
        .expect("Failed to create owner");

    let config = FolioConfig {
        uploads: UploadConfig {
            dir: upload_dir.to_path_buf(),
            ..Default::default()
        },
        ..Default::default()
    };

    AppState {
        config_manager: Arc::new(FolioConfigManager::from_config(config)),
        store: Arc::new(store),
        auth_service: Arc::new(auth_service),
    }
}

pub fn test_server(app: &TestApp) -> TestServer {
    TestServer::new(folio::api::routes::app(app.state.clone()))
        .expect("Failed to create test server")
}

/// Logs in through the API and returns the bearer token.
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/api/admin/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["access_token"]
        .as_str()
        .expect("login should return an access token")
        .to_string()
}

pub async fn owner_token(server: &TestServer) -> String {
    login(server, OWNER, OWNER_PASSWORD).await
}

/// Serves the app on an ephemeral port; returns its origin.
pub async fn spawn_app(app: &TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    let router = folio::api::routes::app(app.state.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}
