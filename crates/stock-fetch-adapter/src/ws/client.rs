/*
[INPUT]:  Progress channel URL for one task
[OUTPUT]: Decoded progress messages and transport events via an mpsc channel
[POS]:    WebSocket layer - per-task progress stream handling
[UPDATE]: When changing connection, close, or parsing behavior
*/

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use url::Url;

use super::message::{ChannelEvent, ProgressMessage};

const EVENT_BUFFER: usize = 100;
const OTHER_LOG_LIMIT: usize = 3;
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static OTHER_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);
static PARSE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Receive-only WebSocket connection to a task's progress channel
///
/// `connect` returns immediately; the handshake runs on a spawned task and a
/// failure is reported as `ChannelEvent::Error` followed by
/// `ChannelEvent::Closed`, the way a browser socket reports it.
#[derive(Debug)]
pub struct ProgressSocket {
    url: Url,
    outbound_tx: Option<mpsc::Sender<WsMessage>>,
    event_rx: Option<mpsc::Receiver<ChannelEvent>>,
    pump: JoinHandle<()>,
}

impl ProgressSocket {
    /// Start connecting to `url`. Must be called inside a Tokio runtime.
    pub fn connect(url: Url) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (outbound_tx, outbound_rx) = mpsc::channel(1);

        info!(url = %url, "opening progress channel");
        let pump = tokio::spawn(run_pump(url.clone(), outbound_rx, event_tx));

        Self {
            url,
            outbound_tx: Some(outbound_tx),
            event_rx: Some(event_rx),
            pump,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Take the event receiver; only the first call returns `Some`
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<ChannelEvent>> {
        self.event_rx.take()
    }

    /// Close the connection. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.outbound_tx.take().is_some() {
            debug!(url = %self.url, "closing progress channel");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.outbound_tx.is_none() || self.pump.is_finished()
    }
}

impl Drop for ProgressSocket {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_pump(
    url: Url,
    mut outbound_rx: mpsc::Receiver<WsMessage>,
    event_tx: mpsc::Sender<ChannelEvent>,
) {
    let ws_stream = tokio::select! {
        connected = connect_async(url.as_str()) => match connected {
            Ok((ws_stream, _response)) => ws_stream,
            Err(err) => {
                warn!(url = %url, error = %err, "progress channel handshake failed");
                let _ = event_tx.send(ChannelEvent::Error(err.to_string())).await;
                let _ = event_tx.send(ChannelEvent::Closed).await;
                return;
            }
        },
        _ = outbound_rx.recv() => {
            debug!(url = %url, "progress channel closed before handshake completed");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(message) => {
                        if write.send(message).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        return;
                    }
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Close(_))) | None => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(message)) => {
                        if let Some(parsed) = parse_message(message)
                            && event_tx.send(ChannelEvent::Message(parsed)).await.is_err()
                        {
                            // Owner dropped the receiver.
                            return;
                        }
                    }
                    Some(Err(err)) => {
                        warn!(url = %url, error = %err, "progress channel read failed");
                        let _ = event_tx.send(ChannelEvent::Error(err.to_string())).await;
                        break;
                    }
                }
            }
        }
    }

    let _ = event_tx.send(ChannelEvent::Closed).await;
}

fn parse_message(message: WsMessage) -> Option<ProgressMessage> {
    let text: String = match message {
        WsMessage::Text(text) => text.to_string(),
        WsMessage::Binary(bytes) => String::from_utf8(bytes.to_vec()).ok()?,
        _ => return None,
    };

    match ProgressMessage::decode(&text) {
        Some(ProgressMessage::Other) => {
            log_other_message_once(&text);
            Some(ProgressMessage::Other)
        }
        Some(parsed) => Some(parsed),
        None => {
            log_parse_fail_once(&text);
            None
        }
    }
}

fn log_other_message_once(raw: &str) {
    let count = OTHER_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < OTHER_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = OTHER_LOG_LIMIT,
            bytes = raw.len(),
            "progress message type unrecognized"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = OTHER_LOG_LIMIT,
            message = %preview,
            "progress message type unrecognized"
        );
    }
}

fn log_parse_fail_once(raw: &str) {
    let count = PARSE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < PARSE_FAIL_LOG_LIMIT {
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        info!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            bytes = raw.len(),
            message = %preview,
            "progress message dropped: malformed payload"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
