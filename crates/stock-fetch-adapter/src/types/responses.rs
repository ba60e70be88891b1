/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::RemoteTaskState;
use super::models::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub task_id: TaskId,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default)]
    pub task_id: Option<TaskId>,
    pub state: RemoteTaskState,
    #[serde(default)]
    pub progress: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatus {
    pub configured: bool,
    #[serde(default)]
    pub masked: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTokenResponse {
    pub ok: bool,
    #[serde(default)]
    pub masked: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Error body returned with non-2xx responses
///
/// `detail` is a string for handled errors and a list of objects for request
/// validation failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(text) if !text.is_empty() => Some(text),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
