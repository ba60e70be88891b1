/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public fetch-service adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;
pub mod ws;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    DEFAULT_BASE_URL,
    FetchClient,
    FetchError,
    Result,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    ChannelEvent,
    ProgressMessage,
    ProgressSocket,
};
