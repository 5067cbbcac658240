//! File handling module for stash.
//!
//! Covers the full life of an uploaded file:
//! - Blob storage with UUID naming and directory sharding
//! - Metadata persistence in SQLite
//! - Upload/download/delete orchestration

mod metadata;
mod service;
mod storage;

pub use metadata::{FileRecord, FileRepository, NewFileRecord};
pub use service::{DownloadResult, UploadRequest, UploadService};
pub use storage::BlobStorage;

/// Maximum length for an uploaded filename (in characters).
pub const MAX_FILENAME_LENGTH: usize = 255;
