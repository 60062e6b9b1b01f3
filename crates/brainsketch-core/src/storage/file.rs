//! File-based storage implementation for native platforms.

use super::{BoxFuture, CanvasRecord, Storage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage whose operations block the calling thread.
///
/// Async hosts should move these calls onto a blocking thread pool. The [`Storage`]
/// impl of [`FileStorage`] runs them inline on the polling thread.
pub trait BlockingStorage: Send + Sync {
    fn save_blocking(&self, user_id: &str, lines: serde_json::Value)
    -> StorageResult<CanvasRecord>;

    fn load_blocking(&self, user_id: &str) -> StorageResult<CanvasRecord>;

    fn delete_blocking(&self, user_id: &str) -> StorageResult<()>;

    fn list_blocking(&self) -> StorageResult<Vec<String>>;

    fn exists_blocking(&self, user_id: &str) -> StorageResult<bool>;
}

/// File-based storage for native platforms.
///
/// Stores one JSON record per user in a specified directory. File names are the
/// percent-encoded user id, so distinct ids never share a file.
pub struct FileStorage {
    /// Base directory for record storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Get the file path for a user ID.
    fn record_path(&self, user_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_id(user_id)))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn read_record(path: &Path, user_id: &str) -> StorageResult<CanvasRecord> {
        if !path.exists() {
            return Err(StorageError::NotFound(user_id.to_string()));
        }

        let json = fs::read_to_string(path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

/// Percent-encode everything but ASCII alphanumerics, `-`, `_`, `.` and `~`.
///
/// `%` itself is encoded, which keeps the mapping one-to-one. A leading `.` is
/// encoded too so no record becomes a hidden file or collides with `..`.
fn encode_id(user_id: &str) -> String {
    let encoded = urlencoding::encode(user_id);
    if let Some(rest) = encoded.strip_prefix('.') {
        return format!("%2E{}", rest);
    }
    encoded.into_owned()
}

fn decode_id(stem: &str) -> Option<String> {
    match urlencoding::decode(stem) {
        Ok(id) => Some(id.into_owned()),
        Err(e) => {
            log::warn!("Skipping record file with undecodable name {}: {}", stem, e);
            None
        }
    }
}

impl BlockingStorage for FileStorage {
    fn save_blocking(
        &self,
        user_id: &str,
        lines: serde_json::Value,
    ) -> StorageResult<CanvasRecord> {
        let path = self.record_path(user_id);
        let record = match Self::read_record(&path, user_id) {
            Ok(mut existing) => {
                existing.update(lines);
                existing
            }
            Err(StorageError::NotFound(_)) => CanvasRecord::new(user_id, lines),
            Err(e) => {
                log::warn!("Overwriting unreadable record {}: {}", path.display(), e);
                CanvasRecord::new(user_id, lines)
            }
        };

        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;
        Ok(record)
    }

    fn load_blocking(&self, user_id: &str) -> StorageResult<CanvasRecord> {
        Self::read_record(&self.record_path(user_id), user_id)
    }

    fn delete_blocking(&self, user_id: &str) -> StorageResult<()> {
        let path = self.record_path(user_id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    /// Lists the user ids decoded from the stored file names.
    fn list_blocking(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let ids = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| decode_id(path.file_stem()?.to_str()?))
            .collect();
        Ok(ids)
    }

    fn exists_blocking(&self, user_id: &str) -> StorageResult<bool> {
        Ok(self.record_path(user_id).exists())
    }
}

impl Storage for FileStorage {
    fn save(
        &self,
        user_id: &str,
        lines: serde_json::Value,
    ) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.save_blocking(&user_id, lines) })
    }

    fn load(&self, user_id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.load_blocking(&user_id) })
    }

    fn delete(&self, user_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.delete_blocking(&user_id) })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move { self.list_blocking() })
    }

    fn exists(&self, user_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.exists_blocking(&user_id) })
    }
}
