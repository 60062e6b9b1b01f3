//! Wire types shared by the HTTP service and its client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User id used when a request does not name one.
pub const DEFAULT_USER_ID: &str = "default-user";

/// Path of the canvas resource.
pub const CANVAS_PATH: &str = "/canvas";

/// Response envelope: `{ success, data?, error? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Failure that still carries a fallback payload.
    pub fn failure_with(error: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}

/// Query string of `GET /canvas`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl LoadQuery {
    pub fn user_id(&self) -> &str {
        effective_user_id(self.user_id.as_deref())
    }
}

/// Body of `POST /canvas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    /// Opaque shape list; no schema is enforced. Missing or `null` becomes `[]`.
    #[serde(default = "empty_lines", deserialize_with = "lines_or_empty")]
    pub lines: Value,
}

fn empty_lines() -> Value {
    Value::Array(Vec::new())
}

fn lines_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_lines))
}

impl SaveRequest {
    pub fn user_id(&self) -> &str {
        effective_user_id(self.user_id.as_deref())
    }
}

/// Empty or missing ids fall back to [`DEFAULT_USER_ID`].
fn effective_user_id(user_id: Option<&str>) -> &str {
    match user_id {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_USER_ID,
    }
}
