//! File handlers.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{UploadRequest, UploadService};
use crate::web::dto::{FileInfo, FileResponse, MessageResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;
use crate::StashError;

/// Generate a safe Content-Disposition header value for downloads.
///
/// Control characters are stripped so a filename can never smuggle in
/// extra headers; non-ASCII names get the RFC 5987 filename* form.
fn content_disposition_header(filename: &str) -> String {
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

fn upload_service(state: &AppState) -> UploadService<'_> {
    UploadService::new(&state.db, &state.storage, state.max_upload_size)
}

/// POST /upload - Upload a file (multipart, field "file").
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() != Some("file") {
            continue;
        }

        filename = field.file_name().map(|s| s.to_string());
        content_type = field.content_type().map(|s| s.to_string());
        content = Some(
            field
                .bytes()
                .await
                .map_err(|e| {
                    tracing::debug!("failed to read file content: {}", e);
                    ApiError::bad_request("Failed to read file")
                })?
                .to_vec(),
        );
    }

    let content = content.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let filename = filename.ok_or_else(|| ApiError::bad_request("No filename provided"))?;
    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string()
    });

    let request = UploadRequest::new(filename, content_type, content);
    let record = upload_service(&state)
        .upload(claims.sub, &request)
        .await
        .map_err(|e| match e {
            StashError::Validation(msg) => ApiError::bad_request(msg),
            other => {
                tracing::error!("upload failed: {}", other);
                ApiError::internal("Failed to store file")
            }
        })?;

    let response = UploadResponse {
        msg: "uploaded".to_string(),
        new_file: FileInfo::from(&record),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /files/:id - File metadata.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
) -> Result<Json<FileResponse>, ApiError> {
    let record = upload_service(&state)
        .get(file_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(FileResponse {
        file: FileInfo::from(&record),
    }))
}

/// GET /files/:id/download - File content.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i64>,
) -> Result<Response<Body>, ApiError> {
    let result = upload_service(&state)
        .download(file_id)
        .await
        .map_err(ApiError::from)?;

    let content_type = if result.record.content_type.is_empty() {
        mime_guess::from_path(&result.record.filename)
            .first_or_octet_stream()
            .to_string()
    } else {
        result.record.content_type.clone()
    };

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&result.record.filename),
        )
        .header(header::CONTENT_LENGTH, result.content.len())
        .body(Body::from(result.content))
        .map_err(|e| {
            tracing::error!("failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// DELETE /files/:id - Delete a file, its blob and its owner-list entry.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = upload_service(&state);
    let record = service.get(file_id).await.map_err(ApiError::from)?;

    if record.owner_id != claims.sub {
        return Err(ApiError::unauthorized("Not the owner of this file"));
    }

    service.delete(file_id).await.map_err(ApiError::from)?;

    Ok(Json(MessageResponse {
        msg: "deleted".to_string(),
    }))
}
