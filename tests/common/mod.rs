//! Shared helpers for API integration tests.

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use stash::db::Database;
use stash::file::BlobStorage;
use stash::web::handlers::AppState;
use stash::web::middleware::TokenState;
use stash::web::router::create_router;
use stash::Config;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Create a test configuration.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    config.storage.max_upload_size_mb = 1;
    config
}

/// Create a test server with an in-memory database and temp blob storage.
///
/// The TempDir must be kept alive for the duration of the test.
pub async fn create_test_server() -> (TestServer, Database, BlobStorage, TempDir) {
    create_test_server_with(create_test_config()).await
}

/// Create a test server from an explicit configuration.
pub async fn create_test_server_with(
    config: Config,
) -> (TestServer, Database, BlobStorage, TempDir) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = BlobStorage::new(temp_dir.path()).expect("Failed to create blob storage");

    let app_state = Arc::new(AppState::new(&config, db.clone(), storage.clone()));
    let token_state = Arc::new(TokenState::new(&config.auth.jwt_secret));

    let router = create_router(app_state, token_state, &config.server.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db, storage, temp_dir)
}

/// Register a user and return the response body.
pub async fn register_user(server: &TestServer, name: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

/// Register a user and return just the token.
pub async fn register_and_get_token(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
) -> String {
    let body = register_user(server, name, email, password).await;
    body["token"]
        .as_str()
        .expect("registration should return a token")
        .to_string()
}

/// Log in and return the response body.
pub async fn login_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}
