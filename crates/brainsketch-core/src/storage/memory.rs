//! In-memory storage implementation.

use super::{BoxFuture, CanvasRecord, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, CanvasRecord>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
        StorageError::Other(format!("Lock error: {}", e))
    }

    fn upsert(&self, user_id: &str, lines: serde_json::Value) -> StorageResult<CanvasRecord> {
        let mut records = self.records.write().map_err(Self::lock_error)?;
        let record = records
            .entry(user_id.to_string())
            .and_modify(|r| r.update(lines.clone()))
            .or_insert_with(|| CanvasRecord::new(user_id, lines));
        Ok(record.clone())
    }

    fn get(&self, user_id: &str) -> StorageResult<CanvasRecord> {
        let records = self.records.read().map_err(Self::lock_error)?;
        records
            .get(user_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(user_id.to_string()))
    }

    fn remove(&self, user_id: &str) -> StorageResult<()> {
        let mut records = self.records.write().map_err(Self::lock_error)?;
        records.remove(user_id);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let records = self.records.read().map_err(Self::lock_error)?;
        Ok(records.keys().cloned().collect())
    }

    fn contains(&self, user_id: &str) -> StorageResult<bool> {
        let records = self.records.read().map_err(Self::lock_error)?;
        Ok(records.contains_key(user_id))
    }
}

// Lock guards are not Send, so every call resolves before the future is built.
impl Storage for MemoryStorage {
    fn save(
        &self,
        user_id: &str,
        lines: serde_json::Value,
    ) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let result = self.upsert(user_id, lines);
        Box::pin(async move { result })
    }

    fn load(&self, user_id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let result = self.get(user_id);
        Box::pin(async move { result })
    }

    fn delete(&self, user_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let result = self.remove(user_id);
        Box::pin(async move { result })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let result = self.keys();
        Box::pin(async move { result })
    }

    fn exists(&self, user_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let result = self.contains(user_id);
        Box::pin(async move { result })
    }
}
