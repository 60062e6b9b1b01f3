//! Lazily connected handle to the document store.

use crate::config::{ServerConfig, StoreBackend};
use brainsketch_core::storage::{
    BlockingStorage, BoxFuture, CanvasRecord, FileStorage, MemoryStorage, Storage, StorageError,
    StorageResult,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared connection to the store, opened on first use.
///
/// A failed connect leaves the handle empty so the next request tries again.
pub struct StoreHandle {
    backend: StoreBackend,
    connect_timeout: Duration,
    query_timeout: Duration,
    slot: Mutex<Option<Arc<dyn Storage>>>,
}

impl StoreHandle {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            backend: config.store.clone(),
            connect_timeout: config.connect_timeout,
            query_timeout: config.query_timeout,
            slot: Mutex::new(None),
        }
    }

    /// Handle that is already connected to `storage`.
    #[cfg(test)]
    pub fn with_storage(storage: Arc<dyn Storage>, query_timeout: Duration) -> Self {
        Self {
            backend: StoreBackend::Memory,
            connect_timeout: Duration::ZERO,
            query_timeout,
            slot: Mutex::new(Some(storage)),
        }
    }

    /// Get the open store, connecting if needed.
    pub async fn get(&self) -> StorageResult<Arc<dyn Storage>> {
        let mut slot = self.slot.lock().await;
        if let Some(storage) = slot.as_ref() {
            return Ok(Arc::clone(storage));
        }

        let backend = self.backend.clone();
        let connect = tokio::task::spawn_blocking(move || connect(&backend));
        let storage = match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join)) => return Err(StorageError::Other(join.to_string())),
            Err(_) => return Err(StorageError::Timeout(millis(self.connect_timeout))),
        };

        info!(backend = ?self.backend, "store connected");
        *slot = Some(Arc::clone(&storage));
        Ok(storage)
    }

    /// Run one storage call, bounded by the query timeout.
    pub async fn query<T>(
        &self,
        operation: impl Future<Output = StorageResult<T>>,
    ) -> StorageResult<T> {
        tokio::time::timeout(self.query_timeout, operation)
            .await
            .map_err(|_| StorageError::Timeout(millis(self.query_timeout)))?
    }

    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Drop the connection. Called once the server has stopped accepting requests.
    pub async fn close(&self) {
        if self.slot.lock().await.take().is_some() {
            info!("store closed");
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn connect(backend: &StoreBackend) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StoreBackend::Directory(path) => {
            if path.exists() && !path.is_dir() {
                warn!(path = %path.display(), "store path is not a directory");
                return Err(StorageError::Io(format!(
                    "{} is not a directory",
                    path.display()
                )));
            }
            Ok(Arc::new(Offloaded::new(FileStorage::new(path.clone())?)))
        }
    }
}

/// Runs a blocking backend on tokio's blocking pool.
///
/// Keeps disk I/O off the runtime workers so [`StoreHandle::query`] can time it out.
pub struct Offloaded<S> {
    inner: Arc<S>,
}

impl<S: BlockingStorage + 'static> Offloaded<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    fn run<T, F>(&self, op: F) -> BoxFuture<'_, StorageResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> StorageResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || op(&inner))
                .await
                .map_err(|e| StorageError::Other(e.to_string()))?
        })
    }
}

impl<S: BlockingStorage + 'static> Storage for Offloaded<S> {
    fn save(&self, user_id: &str, lines: Value) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let user_id = user_id.to_string();
        self.run(move |store| store.save_blocking(&user_id, lines))
    }

    fn load(&self, user_id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let user_id = user_id.to_string();
        self.run(move |store| store.load_blocking(&user_id))
    }

    fn delete(&self, user_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let user_id = user_id.to_string();
        self.run(move |store| store.delete_blocking(&user_id))
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        self.run(|store| store.list_blocking())
    }

    fn exists(&self, user_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let user_id = user_id.to_string();
        self.run(move |store| store.exists_blocking(&user_id))
    }
}
