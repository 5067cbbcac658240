//! Middleware for the stash API.

pub mod auth;
pub mod cors;

pub use auth::{token_auth, AuthUser, Claims, TokenState, AUTH_TOKEN_HEADER};
pub use cors::create_cors_layer;
