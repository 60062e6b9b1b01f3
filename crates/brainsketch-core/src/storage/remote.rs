//! HTTP client for the canvas service.

use super::{BoxFuture, CanvasRecord, Storage, StorageError, StorageResult};
use crate::api::{ApiResponse, CANVAS_PATH, SaveRequest};
use std::time::Duration;

const REQUEST_TIMEOUT_MS: u64 = 10_000;
#[cfg(not(target_arch = "wasm32"))]
const CONNECT_TIMEOUT_MS: u64 = 5_000;

/// [`Storage`] backed by the `GET`/`POST /canvas` endpoints.
///
/// The service only exposes load and upsert, so `delete` and `list` report an error
/// and `exists` is answered with a load.
#[derive(Debug, Clone)]
pub struct RemoteStorage {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteStorage {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:3030`).
    pub fn new(base_url: &str) -> StorageResult<Self> {
        Self::with_timeout(base_url, Duration::from_millis(REQUEST_TIMEOUT_MS))
    }

    /// Request timeout only applies on native targets; browsers enforce their own.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> StorageResult<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(timeout)
            .connect_timeout(Duration::from_millis(CONNECT_TIMEOUT_MS));
        let http = builder
            .build()
            .map_err(|e| StorageError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn canvas_url(&self) -> String {
        format!("{}{}", self.base_url, CANVAS_PATH)
    }

    fn request_error(&self, e: reqwest::Error) -> StorageError {
        if e.is_timeout() {
            StorageError::Timeout(self.timeout.as_millis() as u64)
        } else {
            StorageError::Remote(e.to_string())
        }
    }

    async fn read_envelope(&self, response: reqwest::Response) -> StorageResult<CanvasRecord> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.request_error(e))?;

        // Failure envelopes carry a fallback payload that is not a full record.
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| StorageError::Serialization(format!("HTTP {}: {}", status, e)))?;
        if !envelope.success {
            let error = envelope.error.unwrap_or_else(|| format!("HTTP {}", status));
            return Err(StorageError::Remote(error));
        }
        let data = envelope
            .data
            .ok_or_else(|| StorageError::Serialization("Response has no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn fetch(&self, user_id: &str) -> StorageResult<CanvasRecord> {
        let response = self
            .http
            .get(self.canvas_url())
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        self.read_envelope(response).await
    }

    async fn upload(&self, user_id: &str, lines: serde_json::Value) -> StorageResult<CanvasRecord> {
        let body = SaveRequest {
            user_id: Some(user_id.to_string()),
            lines,
        };
        let response = self
            .http
            .post(self.canvas_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        self.read_envelope(response).await
    }
}

impl Storage for RemoteStorage {
    fn save(
        &self,
        user_id: &str,
        lines: serde_json::Value,
    ) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.upload(&user_id, lines).await })
    }

    fn load(&self, user_id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.fetch(&user_id).await })
    }

    fn delete(&self, _user_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async { Err(StorageError::Other("delete is not supported over HTTP".into())) })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async { Err(StorageError::Other("list is not supported over HTTP".into())) })
    }

    fn exists(&self, user_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            match self.fetch(&user_id).await {
                Ok(record) => Ok(record.lines.as_array().is_some_and(|l| !l.is_empty())),
                Err(StorageError::NotFound(_)) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::canvas::CanvasDocument;
    use crate::storage::{load_or_empty, save_best_effort};

    // Nothing listens on port 1, so every request fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    #[test]
    fn test_trims_trailing_slash() {
        let storage = RemoteStorage::new("http://localhost:3030/").unwrap();
        assert_eq!(storage.base_url(), "http://localhost:3030");
        assert_eq!(storage.canvas_url(), "http://localhost:3030/canvas");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let storage = RemoteStorage::with_timeout(UNREACHABLE, Duration::from_secs(2)).unwrap();
        let result = storage.load("alice").await;
        assert!(matches!(
            result,
            Err(StorageError::Remote(_) | StorageError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_degrades() {
        let storage = RemoteStorage::with_timeout(UNREACHABLE, Duration::from_secs(2)).unwrap();
        assert!(load_or_empty(&storage, "alice").await.is_empty());
        assert!(!save_best_effort(&storage, "alice", &CanvasDocument::new()).await);
    }

    #[tokio::test]
    async fn test_unsupported_operations() {
        let storage = RemoteStorage::new(UNREACHABLE).unwrap();
        assert!(storage.delete("alice").await.is_err());
        assert!(storage.list().await.is_err());
    }
}
