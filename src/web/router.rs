//! Router configuration for the stash API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, download_file, get_file, index, login, register, upload_file, AppState,
};
use super::middleware::{create_cors_layer, token_auth, TokenState};

/// Headroom over the configured upload cap for multipart boundaries and
/// part headers, so a file of exactly the configured size still fits in
/// the request body.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    token_state: Arc<TokenState>,
    cors_origins: &[String],
) -> Router {
    // Account routes, open to anyone
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    // File routes; upload and delete require a token, reads do not
    let file_routes = Router::new()
        .route("/upload", post(upload_file))
        .route("/files/:id", get(get_file).delete(delete_file))
        .route("/files/:id/download", get(download_file));

    let token_state_for_middleware = token_state.clone();

    // Raise axum's request-body cap above the configured upload limit;
    // the per-file size check stays with UploadService.
    let body_limit = app_state.max_upload_size as usize + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(index))
        .merge(auth_routes)
        .merge(file_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = token_state_for_middleware.clone();
                    token_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}
