//! Token authentication middleware.
//!
//! Clients pass the JWT issued at login in the `x-auth-token` header.
//! Handlers opt in to authentication by taking the [`AuthUser`]
//! extractor.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::HeaderName, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::web::error::ApiError;

/// Request header carrying the auth token.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i64,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Shared state for token verification.
#[derive(Clone)]
pub struct TokenState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl TokenState {
    /// Create a new token state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }
}

/// Extractor for authenticated users.
///
/// The handler receives the verified claims if the token is valid;
/// otherwise the request is rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = parts
                .headers
                .get(&AUTH_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ApiError::unauthorized("Missing auth token"))?;

            // Token state is injected into extensions by the middleware
            let token_state = parts
                .extensions
                .get::<Arc<TokenState>>()
                .ok_or_else(|| ApiError::internal("Token state not configured"))?;

            let token_data =
                decode::<Claims>(&token, &token_state.decoding_key, &token_state.validation)
                    .map_err(|e| {
                        tracing::debug!("token validation failed: {}", e);
                        ApiError::unauthorized("Invalid or expired token")
                    })?;

            Ok(AuthUser(token_data.claims))
        })
    }
}

/// Middleware function to inject token state into request extensions.
pub async fn token_auth(
    token_state: Arc<TokenState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(token_state);
    next.run(request).await
}
