//! Response DTOs for the stash API.

use serde::Serialize;

use crate::db::User;
use crate::file::FileRecord;

/// User information in responses.
///
/// The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Stored names of the user's files, in upload order.
    pub files: Vec<String>,
}

impl UserInfo {
    /// Build from a database user plus their owned-file list.
    pub fn from_user(user: &User, files: Vec<String>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.clone(),
            files,
        }
    }
}

/// Response for registration and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Status message.
    pub msg: String,
    /// The account.
    pub user: UserInfo,
    /// Signed JWT for subsequent requests.
    pub token: String,
}

/// File information in responses.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    /// File ID.
    pub id: i64,
    /// Stored name on disk.
    pub stored_name: String,
    /// Original filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Owning user ID.
    pub owner_id: i64,
    /// Upload timestamp.
    pub created_at: String,
}

impl From<&FileRecord> for FileInfo {
    fn from(record: &FileRecord) -> Self {
        Self {
            id: record.id,
            stored_name: record.stored_name.clone(),
            filename: record.filename.clone(),
            content_type: record.content_type.clone(),
            size: record.size,
            owner_id: record.owner_id,
            created_at: record.created_at.clone(),
        }
    }
}

/// Response for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Status message.
    pub msg: String,
    /// Metadata of the newly stored file.
    pub new_file: FileInfo,
}

/// Response for file metadata retrieval.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    /// File metadata.
    pub file: FileInfo,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Status message.
    pub msg: String,
}
