//! HTTP server for stash.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::db::Database;
use crate::file::BlobStorage;
use crate::{Result, StashError};

use super::handlers::AppState;
use super::middleware::TokenState;
use super::router::create_router;

/// HTTP server wrapping the API router.
pub struct ApiServer {
    /// Bind address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Token verification state.
    token_state: Arc<TokenState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl ApiServer {
    /// Create a new server from configuration.
    pub fn new(config: &Config, db: Database, storage: BlobStorage) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| StashError::Config(format!("invalid bind address: {e}")))?;

        let app_state = Arc::new(AppState::new(config, db, storage));
        let token_state = Arc::new(TokenState::new(&config.auth.jwt_secret));

        Ok(Self {
            addr,
            app_state,
            token_state,
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Get the configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server until it fails or is shut down.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state, self.token_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Binding to port 0 picks a free port, which is what tests want.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = create_router(self.app_state, self.token_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.auth.jwt_secret = "test-secret-key".to_string();
        config
    }

    #[tokio::test]
    async fn test_server_new() {
        let config = test_config();
        let db = Database::open_in_memory().await.unwrap();
        let temp_dir = TempDir::new().unwrap();
        let storage = BlobStorage::new(temp_dir.path()).unwrap();

        let server = ApiServer::new(&config, db, storage).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_server_invalid_address() {
        let mut config = test_config();
        config.server.host = "not an address".to_string();

        let db = Database::open_in_memory().await.unwrap();
        let temp_dir = TempDir::new().unwrap();
        let storage = BlobStorage::new(temp_dir.path()).unwrap();

        let result = ApiServer::new(&config, db, storage);
        assert!(matches!(result, Err(StashError::Config(_))));
    }
}
