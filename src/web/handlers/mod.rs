//! API handlers for stash.

pub mod auth;
pub mod file;

pub use auth::*;
pub use file::*;

use jsonwebtoken::{encode, EncodingKey, Header};

use crate::config::Config;
use crate::db::{Database, User};
use crate::file::BlobStorage;
use crate::web::error::ApiError;
use crate::web::middleware::Claims;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (sqlx pool, cheap to clone).
    pub db: Database,
    /// Blob storage for uploaded files.
    pub storage: BlobStorage,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Token expiry in seconds.
    pub token_expiry_secs: u64,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state from configuration.
    pub fn new(config: &Config, db: Database, storage: BlobStorage) -> Self {
        Self {
            db,
            storage,
            encoding_key: EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
            token_expiry_secs: config.auth.token_expiry_secs,
            max_upload_size: config.max_upload_size(),
        }
    }

    /// Sign a token for a user.
    ///
    /// Claims carry identity only; the password hash never enters the
    /// token.
    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }
}

/// GET / - Health check.
pub async fn index() -> &'static str {
    "stash is running"
}
