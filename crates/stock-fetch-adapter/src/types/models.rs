/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Domain model structs shared by HTTP and WebSocket layers
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier issued by the service for an accepted task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated workbook listed by `GET /api/files`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Path relative to the service working directory, used for download/delete
    pub path: String,
    /// Size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Size rendered as kibibytes with one decimal, e.g. `20.0 KB`
    pub fn size_kib(&self) -> String {
        format!("{:.1} KB", self.size as f64 / 1024.0)
    }
}
