/*
[INPUT]:  Public API exports for stock-fetch-monitor crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod params;
pub mod sink;
pub mod task;
pub mod terminal;

// Re-export main types for convenience
pub use config::MonitorConfig;
pub use params::{QueryParams, StockCode, ValidationError};
pub use sink::{NullSink, ProgressSink};
pub use task::{
    ChannelManager, Locale, ProgressSnapshot, PushTransport, TaskApi, TaskCoordinator, TaskError,
    TaskState, WsTransport,
};
pub use terminal::TerminalSink;
