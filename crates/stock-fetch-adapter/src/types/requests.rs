/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Body of `POST /api/query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Comma separated, suffixed stock codes (e.g. `600519.SH,000001.SZ`)
    pub codes: String,
    /// Inclusive start date, `YYYYMMDD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive end date, `YYYYMMDD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Look-back window used when no start date is given
    pub years: u32,
}

/// Body of `POST /api/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}
