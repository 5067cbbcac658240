//! Blob storage for stash.
//!
//! Uploaded content lives on disk under a base directory, keyed by a
//! UUID-based stored name and sharded into subdirectories by the first
//! two characters of that name to keep any single directory small.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Result, StashError};

/// On-disk blob store.
///
/// Layout:
/// ```text
/// {base_path}/
/// ├── ab/
/// │   └── ab12cd34-5678-90ab-cdef-123456789012.txt
/// └── cd/
///     └── cd90ab12-3456-7890-abcd-ef1234567890.bin
/// ```
#[derive(Debug, Clone)]
pub struct BlobStorage {
    base_path: PathBuf,
}

impl BlobStorage {
    /// Open (and create if necessary) a blob store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write `content` under a fresh UUID-based name, keeping the
    /// extension of `original_name`. Returns the stored name.
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let stored_name = format!(
            "{}.{}",
            Uuid::new_v4(),
            Self::extract_extension(original_name)
        );

        let path = self.blob_path(&stored_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        Ok(stored_name)
    }

    /// Read a blob back by its stored name.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.blob_path(stored_name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StashError::NotFound(format!("blob: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a blob. Returns `true` if it existed.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        match fs::remove_file(self.blob_path(stored_name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, stored_name: &str) -> bool {
        self.blob_path(stored_name).exists()
    }

    /// Size in bytes of a stored blob.
    pub fn blob_size(&self, stored_name: &str) -> Result<u64> {
        match fs::metadata(self.blob_path(stored_name)) {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StashError::NotFound(format!("blob: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Full path for a stored name: {base_path}/{shard}/{stored_name}.
    pub fn blob_path(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(Self::shard(stored_name)).join(stored_name)
    }

    /// Shard directory: first two characters of the stored name.
    fn shard(stored_name: &str) -> &str {
        if stored_name.len() >= 2 {
            &stored_name[..2]
        } else {
            stored_name
        }
    }

    /// Extension of the original filename, "bin" when there is none.
    fn extract_extension(filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, BlobStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = BlobStorage::new(temp_dir.path()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blobs");
        assert!(!path.exists());

        let storage = BlobStorage::new(&path).unwrap();

        assert!(path.exists());
        assert_eq!(storage.base_path(), path);
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, storage) = setup_storage();
        let content = b"Hello, World!";

        let stored_name = storage.save(content, "greeting.txt").unwrap();

        assert!(stored_name.ends_with(".txt"));
        assert_eq!(storage.load(&stored_name).unwrap(), content);
    }

    #[test]
    fn test_save_names_are_unique() {
        let (_temp_dir, storage) = setup_storage();

        let a = storage.save(b"one", "same.txt").unwrap();
        let b = storage.save(b"two", "same.txt").unwrap();

        assert_ne!(a, b);
        assert_eq!(storage.load(&a).unwrap(), b"one");
        assert_eq!(storage.load(&b).unwrap(), b"two");
    }

    #[test]
    fn test_save_extension_handling() {
        let (_temp_dir, storage) = setup_storage();

        assert!(storage.save(b"d", "report.pdf").unwrap().ends_with(".pdf"));
        assert!(storage.save(b"d", "photo.PNG").unwrap().ends_with(".PNG"));
        assert!(storage.save(b"d", "no_extension").unwrap().ends_with(".bin"));
        assert!(storage.save(b"d", ".hidden").unwrap().ends_with(".bin"));
    }

    #[test]
    fn test_save_creates_shard_directory() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"data", "test.txt").unwrap();

        let shard_dir = storage.base_path().join(&stored_name[..2]);
        assert!(shard_dir.is_dir());
    }

    #[test]
    fn test_load_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.load("nonexistent.txt");
        assert!(matches!(result, Err(StashError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"to delete", "gone.txt").unwrap();
        assert!(storage.exists(&stored_name));

        assert!(storage.delete(&stored_name).unwrap());
        assert!(!storage.exists(&stored_name));

        // Second delete reports the blob as already gone
        assert!(!storage.delete(&stored_name).unwrap());
    }

    #[test]
    fn test_blob_size() {
        let (_temp_dir, storage) = setup_storage();
        let content = b"12345";

        let stored_name = storage.save(content, "n.txt").unwrap();
        assert_eq!(storage.blob_size(&stored_name).unwrap(), 5);

        let missing = storage.blob_size("nonexistent.txt");
        assert!(matches!(missing, Err(StashError::NotFound(_))));
    }

    #[test]
    fn test_blob_path_sharding() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = "ab12cd34-5678-90ab-cdef-123456789012.txt";
        let path = storage.blob_path(stored_name);
        assert_eq!(path, storage.base_path().join("ab").join(stored_name));
    }

    #[test]
    fn test_binary_round_trip() {
        let (_temp_dir, storage) = setup_storage();
        let content: Vec<u8> = (0..=255).collect();

        let stored_name = storage.save(&content, "binary.bin").unwrap();
        assert_eq!(storage.load(&stored_name).unwrap(), content);
    }
}
