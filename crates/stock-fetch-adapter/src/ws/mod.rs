/*
[INPUT]:  Progress channel URL for a submitted task
[OUTPUT]: Progress messages and transport events for that task
[POS]:    WebSocket layer - task progress push channel
[UPDATE]: When the progress protocol or connection logic changes
*/

pub mod client;
pub mod message;

pub use client::ProgressSocket;
pub use message::{ChannelEvent, ProgressMessage};
