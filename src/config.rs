//! Configuration module for stash.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, StashError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/stash.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the blob storage directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "data/blobs".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (must be set; see `Config::validate`).
    #[serde(default)]
    pub jwt_secret: String,
    /// Token expiry in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
}

fn default_token_expiry() -> u64 {
    86400 // 24 hours
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_secs: default_token_expiry(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/stash.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(StashError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| StashError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `STASH_JWT_SECRET`: JWT signing secret
    /// - `STASH_DATABASE_PATH`: SQLite database path
    /// - `STASH_STORAGE_PATH`: blob storage directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("STASH_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(path) = std::env::var("STASH_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(path) = std::env::var("STASH_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// The server refuses to start without a signing secret; tokens minted
    /// with an empty secret would verify trivially.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(StashError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via the STASH_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Maximum upload size in bytes.
    pub fn max_upload_size(&self) -> u64 {
        self.storage.max_upload_size_mb * 1024 * 1024
    }
}
