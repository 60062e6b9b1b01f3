//! Storage abstraction for persistence.
//!
//! One record per user: the opaque `lines` blob plus timestamps.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(feature = "remote")]
mod remote;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{BlockingStorage, FileStorage};

#[cfg(feature = "remote")]
pub use remote::RemoteStorage;

use crate::canvas::CanvasDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("Timed out after {0} ms")]
    Timeout(u64),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boxed future for async operations (WASM is single-threaded, no `Send`).
#[cfg(target_arch = "wasm32")]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The persisted drawing of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRecord {
    pub user_id: String,
    /// Opaque shape list.
    #[serde(default)]
    pub lines: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CanvasRecord {
    /// A fresh record with no lines.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self::new(user_id, serde_json::Value::Array(Vec::new()))
    }

    pub fn new(user_id: impl Into<String>, lines: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            lines,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the lines, keeping the creation time.
    pub fn update(&mut self, lines: serde_json::Value) {
        self.lines = lines;
        self.updated_at = Utc::now();
    }

    /// Decode the lines into a document, skipping unreadable entries.
    pub fn document(&self) -> CanvasDocument {
        CanvasDocument::from_lines(&self.lines)
    }
}

/// Trait for per-user canvas storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Insert or replace the lines of `user_id`. Returns the stored record.
    fn save(&self, user_id: &str, lines: serde_json::Value)
    -> BoxFuture<'_, StorageResult<CanvasRecord>>;

    /// Load the record of `user_id`.
    fn load(&self, user_id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>>;

    /// Delete the record of `user_id`.
    fn delete(&self, user_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all user IDs with a record.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a record exists.
    fn exists(&self, user_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for per-user canvas storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Insert or replace the lines of `user_id`. Returns the stored record.
    fn save(&self, user_id: &str, lines: serde_json::Value)
    -> BoxFuture<'_, StorageResult<CanvasRecord>>;

    /// Load the record of `user_id`.
    fn load(&self, user_id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>>;

    /// Delete the record of `user_id`.
    fn delete(&self, user_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all user IDs with a record.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a record exists.
    fn exists(&self, user_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Load the drawing of `user_id`, or an empty one if anything goes wrong.
pub async fn load_or_empty<S: Storage + ?Sized>(storage: &S, user_id: &str) -> CanvasDocument {
    match storage.load(user_id).await {
        Ok(record) => record.document(),
        Err(StorageError::NotFound(_)) => CanvasDocument::new(),
        Err(e) => {
            log::warn!("Failed to load canvas for {}: {}", user_id, e);
            CanvasDocument::new()
        }
    }
}

/// Save `document` for `user_id`. Failures are logged and reported as `false`.
pub async fn save_best_effort<S: Storage + ?Sized>(
    storage: &S,
    user_id: &str,
    document: &CanvasDocument,
) -> bool {
    let lines = match document.to_lines() {
        Ok(lines) => lines,
        Err(e) => {
            log::warn!("Failed to encode canvas for {}: {}", user_id, e);
            return false;
        }
    };
    match storage.save(user_id, lines).await {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Failed to save canvas for {}: {}", user_id, e);
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    /// Simple blocking executor for tests.
    pub fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }
}
