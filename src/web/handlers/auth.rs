//! Registration and login handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::db::{NewUser, UserRepository};
use crate::web::dto::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use crate::web::error::ApiError;
use crate::StashError;

use super::AppState;

/// POST /register - Create an account and issue a token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    crate::validate_password(&req.password)
        .map_err(|e| ApiError::bad_request(format!("Password error: {}", e)))?;

    let repo = UserRepository::new(state.db.pool());

    // Fast-path duplicate check; the unique index still backstops races
    if repo
        .email_exists(&req.email)
        .await
        .map_err(ApiError::from)?
    {
        return Err(ApiError::bad_request("Email is already registered"));
    }

    // Argon2 is deliberately slow, keep it off the async worker
    let password = req.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || crate::hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("hashing task failed: {}", e);
            ApiError::internal("Failed to hash password")
        })?
        .map_err(|_| ApiError::internal("Failed to hash password"))?;

    let mut new_user = NewUser::new(&req.name, &req.email, password_hash);
    if let Some(ref created_at) = req.created_at {
        new_user = new_user.with_created_at(created_at);
    }

    let user = repo.create(&new_user).await.map_err(|e| match e {
        StashError::Duplicate(_) => ApiError::bad_request("Email is already registered"),
        other => {
            tracing::error!("user creation failed: {}", other);
            ApiError::internal("Failed to create user")
        }
    })?;

    let token = state.issue_token(&user)?;
    tracing::info!(user_id = user.id, "user registered");

    let response = AuthResponse {
        msg: "registered".to_string(),
        user: UserInfo::from_user(&user, Vec::new()),
        token,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /login - Verify credentials and issue a fresh token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let repo = UserRepository::new(state.db.pool());

    let user = repo
        .get_by_email(&req.email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::bad_request("No account with that email"))?;

    let password = req.password.clone();
    let stored_hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || {
        crate::verify_password(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("verification task failed: {}", e);
        ApiError::internal("Failed to verify password")
    })?;

    if verified.is_err() {
        return Err(ApiError::bad_request("Incorrect password"));
    }

    let files = repo.file_names(user.id).await.map_err(ApiError::from)?;
    let token = state.issue_token(&user)?;
    tracing::info!(user_id = user.id, "user logged in");

    let response = AuthResponse {
        msg: "logged in".to_string(),
        user: UserInfo::from_user(&user, files),
        token,
    };

    Ok(Json(response))
}
