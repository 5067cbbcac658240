//! File metadata types and repository.

use sqlx::{SqliteExecutor, SqlitePool};

use crate::{Result, StashError};

/// Metadata row for an uploaded file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Stored name on disk (UUID.ext format).
    pub stored_name: String,
    /// Original filename (display name).
    pub filename: String,
    /// MIME type reported at upload.
    pub content_type: String,
    /// Size in bytes.
    pub size: i64,
    /// User ID of the uploader.
    pub owner_id: i64,
    /// When the file was uploaded.
    pub created_at: String,
}

/// Data for creating a new file metadata entry.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub stored_name: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub owner_id: i64,
}

impl NewFileRecord {
    pub fn new(
        stored_name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        size: i64,
        owner_id: i64,
    ) -> Self {
        Self {
            stored_name: stored_name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            size,
            owner_id,
        }
    }
}

const FILE_COLUMNS: &str = "id, stored_name, filename, content_type, size, owner_id, created_at";

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a metadata entry on the given executor, so the write can
    /// join a caller-managed transaction. Returns the new row ID.
    pub async fn create_with(
        &self,
        executor: impl SqliteExecutor<'_>,
        file: &NewFileRecord,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO files (stored_name, filename, content_type, size, owner_id, created_at)
             VALUES (?, ?, ?, ?, ?, datetime('now'))",
        )
        .bind(&file.stored_name)
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(file.owner_id)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a metadata entry and return the stored row.
    pub async fn create(&self, file: &NewFileRecord) -> Result<FileRecord> {
        let id = self.create_with(self.pool, file).await?;
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StashError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let query = format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?");
        let file = sqlx::query_as::<_, FileRecord>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(file)
    }

    /// Delete a metadata entry on the given executor. Returns `true`
    /// if a row was removed.
    pub async fn delete_with(&self, executor: impl SqliteExecutor<'_>, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a metadata entry. Returns `true` if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.delete_with(self.pool, id).await
    }

    /// Count files belonging to one owner.
    pub async fn count_by_owner(&self, owner_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
