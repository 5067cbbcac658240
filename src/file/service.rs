//! High-level file operations for stash.
//!
//! Ties blob storage and metadata together: uploads write the blob
//! first and then record metadata plus the owner's file-list entry in
//! one transaction, deleting the blob again if the transaction fails.

use tracing::{info, warn};

use crate::db::{Database, UserRepository};
use crate::{Result, StashError};

use super::metadata::{FileRecord, FileRepository, NewFileRecord};
use super::storage::BlobStorage;
use super::MAX_FILENAME_LENGTH;

/// Request data for a file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub filename: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

/// Result of a file download.
#[derive(Debug)]
pub struct DownloadResult {
    pub record: FileRecord,
    pub content: Vec<u8>,
}

/// Service for uploads, retrieval and deletion.
pub struct UploadService<'a> {
    db: &'a Database,
    storage: &'a BlobStorage,
    max_upload_size: u64,
}

impl<'a> UploadService<'a> {
    /// Create a new UploadService.
    pub fn new(db: &'a Database, storage: &'a BlobStorage, max_upload_size: u64) -> Self {
        Self {
            db,
            storage,
            max_upload_size,
        }
    }

    /// Upload a file on behalf of `owner_id`.
    ///
    /// Writes the blob, then inserts the metadata row and appends the
    /// stored name to the owner's file list inside one transaction. If
    /// the transaction fails the blob is removed again so no orphan is
    /// left on disk.
    pub async fn upload(&self, owner_id: i64, request: &UploadRequest) -> Result<FileRecord> {
        if request.content.is_empty() {
            return Err(StashError::Validation("file content is empty".to_string()));
        }

        if request.filename.is_empty() {
            return Err(StashError::Validation("filename is empty".to_string()));
        }

        if request.filename.chars().count() > MAX_FILENAME_LENGTH {
            return Err(StashError::Validation(format!(
                "filename must be at most {MAX_FILENAME_LENGTH} characters"
            )));
        }

        if request.content.len() as u64 > self.max_upload_size {
            let max_mb = self.max_upload_size / 1024 / 1024;
            return Err(StashError::Validation(format!(
                "file is too large (max {max_mb}MB)"
            )));
        }

        let stored_name = self.storage.save(&request.content, &request.filename)?;

        match self.record_upload(owner_id, request, &stored_name).await {
            Ok(record) => {
                info!(
                    file_id = record.id,
                    owner_id,
                    size = record.size,
                    "file uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                // Roll the blob back so storage matches the database
                if let Err(cleanup) = self.storage.delete(&stored_name) {
                    warn!(%stored_name, error = %cleanup, "failed to remove blob after aborted upload");
                }
                Err(e)
            }
        }
    }

    async fn record_upload(
        &self,
        owner_id: i64,
        request: &UploadRequest,
        stored_name: &str,
    ) -> Result<FileRecord> {
        let files = FileRepository::new(self.db.pool());
        let users = UserRepository::new(self.db.pool());
        let new_file = NewFileRecord::new(
            stored_name,
            &request.filename,
            &request.content_type,
            request.content.len() as i64,
            owner_id,
        );

        let mut tx = self.db.pool().begin().await?;

        let id = files.create_with(&mut *tx, &new_file).await?;
        users.append_file_name(&mut *tx, owner_id, stored_name).await?;

        tx.commit().await?;

        files
            .get_by_id(id)
            .await?
            .ok_or_else(|| StashError::NotFound("file".to_string()))
    }

    /// Get file metadata without loading the blob.
    pub async fn get(&self, file_id: i64) -> Result<FileRecord> {
        FileRepository::new(self.db.pool())
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| StashError::NotFound(format!("file {file_id}")))
    }

    /// Get metadata and content for a file.
    pub async fn download(&self, file_id: i64) -> Result<DownloadResult> {
        let record = self.get(file_id).await?;
        let content = self.storage.load(&record.stored_name)?;

        Ok(DownloadResult { record, content })
    }

    /// Delete a file: blob, metadata row and the owner's list entry.
    pub async fn delete(&self, file_id: i64) -> Result<FileRecord> {
        let record = self.get(file_id).await?;

        let files = FileRepository::new(self.db.pool());
        let users = UserRepository::new(self.db.pool());

        let mut tx = self.db.pool().begin().await?;

        files.delete_with(&mut *tx, record.id).await?;
        users
            .remove_file_name(&mut *tx, record.owner_id, &record.stored_name)
            .await?;

        tx.commit().await?;

        // The blob may already be gone; the metadata delete is what counts
        if !self.storage.delete(&record.stored_name)? {
            warn!(file_id, stored_name = %record.stored_name, "blob missing at delete");
        }

        info!(file_id, owner_id = record.owner_id, "file deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use tempfile::TempDir;

    async fn setup() -> (Database, TempDir, BlobStorage, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let temp_dir = TempDir::new().unwrap();
        let storage = BlobStorage::new(temp_dir.path()).unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("Alice", "alice@example.com", "pw"))
            .await
            .unwrap();
        (db, temp_dir, storage, user.id)
    }

    #[tokio::test]
    async fn test_upload_and_get() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let request = UploadRequest::new("notes.txt", "text/plain", b"hello".to_vec());
        let record = service.upload(owner_id, &request).await.unwrap();

        assert_eq!(record.filename, "notes.txt");
        assert_eq!(record.content_type, "text/plain");
        assert_eq!(record.size, 5);
        assert_eq!(record.owner_id, owner_id);
        assert!(storage.exists(&record.stored_name));

        let fetched = service.get(record.id).await.unwrap();
        assert_eq!(fetched.stored_name, record.stored_name);
    }

    #[tokio::test]
    async fn test_upload_appends_to_owner_list() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let first = service
            .upload(owner_id, &UploadRequest::new("a.txt", "text/plain", b"a".to_vec()))
            .await
            .unwrap();
        let second = service
            .upload(owner_id, &UploadRequest::new("b.txt", "text/plain", b"b".to_vec()))
            .await
            .unwrap();

        let names = UserRepository::new(db.pool())
            .file_names(owner_id)
            .await
            .unwrap();
        assert_eq!(names, vec![first.stored_name, second.stored_name]);
    }

    #[tokio::test]
    async fn test_upload_empty_content_rejected() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let result = service
            .upload(owner_id, &UploadRequest::new("x.txt", "text/plain", vec![]))
            .await;

        assert!(matches!(result, Err(StashError::Validation(_))));
        let names = UserRepository::new(db.pool())
            .file_names(owner_id)
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_upload_too_large_rejected() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 16);

        let result = service
            .upload(
                owner_id,
                &UploadRequest::new("big.bin", "application/octet-stream", vec![0u8; 17]),
            )
            .await;

        assert!(matches!(result, Err(StashError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_failed_metadata_removes_blob() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        // Unknown owner violates the foreign key, so the metadata insert fails
        let result = service
            .upload(owner_id + 100, &UploadRequest::new("x.txt", "text/plain", b"x".to_vec()))
            .await;
        assert!(result.is_err());

        // No orphan blob remains
        let mut blobs = 0;
        for entry in std::fs::read_dir(storage.base_path()).unwrap().flatten() {
            if entry.path().is_dir() {
                blobs += std::fs::read_dir(entry.path()).unwrap().count();
            }
        }
        assert_eq!(blobs, 0);
    }

    #[tokio::test]
    async fn test_download() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let content = b"binary \x00 content".to_vec();
        let record = service
            .upload(
                owner_id,
                &UploadRequest::new("data.bin", "application/octet-stream", content.clone()),
            )
            .await
            .unwrap();

        let result = service.download(record.id).await.unwrap();
        assert_eq!(result.content, content);
        assert_eq!(result.record.id, record.id);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (db, _tmp, storage, _owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let result = service.get(999).await;
        assert!(matches!(result, Err(StashError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_everything() {
        let (db, _tmp, storage, owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let record = service
            .upload(owner_id, &UploadRequest::new("gone.txt", "text/plain", b"bye".to_vec()))
            .await
            .unwrap();

        service.delete(record.id).await.unwrap();

        assert!(!storage.exists(&record.stored_name));
        assert!(matches!(
            service.get(record.id).await,
            Err(StashError::NotFound(_))
        ));
        let names = UserRepository::new(db.pool())
            .file_names(owner_id)
            .await
            .unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let (db, _tmp, storage, _owner_id) = setup().await;
        let service = UploadService::new(&db, &storage, 10 * 1024 * 1024);

        let result = service.delete(999).await;
        assert!(matches!(result, Err(StashError::NotFound(_))));
    }
}
