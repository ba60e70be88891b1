/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Task state as reported by `GET /api/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteTaskState {
    Idle,
    Running,
    Completed,
    Error,
}

impl RemoteTaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteTaskState::Idle => "idle",
            RemoteTaskState::Running => "running",
            RemoteTaskState::Completed => "completed",
            RemoteTaskState::Error => "error",
        }
    }
}
