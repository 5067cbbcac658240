//! HTTP API for stash.
//!
//! Registration and login issue JWTs; uploads, metadata reads,
//! downloads and deletes live under `/upload` and `/files`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::{ApiError, ErrorCode};
pub use handlers::AppState;
pub use middleware::{AuthUser, Claims, TokenState, AUTH_TOKEN_HEADER};
pub use router::create_router;
pub use server::ApiServer;
