/*
[INPUT]:  Coordinator test scenarios
[OUTPUT]: In-memory transport, recording sink, stub API, scripted progress server
[POS]:    Test infrastructure - shared across monitor integration tests
[UPDATE]: When coordinator seams change
*/

#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stock_fetch_adapter::{
    ChannelEvent, FetchError, ProgressMessage, ProgressSocket, QueryRequest, TaskId,
};
use stock_fetch_monitor::task::{ChannelHandle, ChannelLink};
use stock_fetch_monitor::{ProgressSink, ProgressSnapshot, PushTransport, TaskApi, TaskState};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// One channel opened through `MemoryTransport`
pub struct Opened {
    pub task_id: TaskId,
    pub sender: mpsc::Sender<ChannelEvent>,
    pub closes: Arc<AtomicUsize>,
}

/// Transport whose channels are fed by the test
#[derive(Clone, Default)]
pub struct MemoryTransport {
    opened: Arc<Mutex<Vec<Opened>>>,
}

impl MemoryTransport {
    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn sender(&self, index: usize) -> mpsc::Sender<ChannelEvent> {
        self.opened.lock().unwrap()[index].sender.clone()
    }

    pub fn close_count(&self, index: usize) -> usize {
        self.opened.lock().unwrap()[index].closes.load(Ordering::SeqCst)
    }

    pub fn task_id(&self, index: usize) -> TaskId {
        self.opened.lock().unwrap()[index].task_id.clone()
    }
}

struct MemoryHandle {
    closes: Arc<AtomicUsize>,
}

impl ChannelHandle for MemoryHandle {
    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

impl PushTransport for MemoryTransport {
    fn open(&self, task_id: &TaskId) -> Result<ChannelLink, FetchError> {
        let (sender, events) = mpsc::channel(32);
        let closes = Arc::new(AtomicUsize::new(0));
        self.opened.lock().unwrap().push(Opened {
            task_id: task_id.clone(),
            sender,
            closes: closes.clone(),
        });
        Ok(ChannelLink {
            handle: Box::new(MemoryHandle { closes }),
            events,
        })
    }
}

/// Transport that connects every task to one fixed socket URL
pub struct SocketTransport {
    pub url: Url,
}

impl PushTransport for SocketTransport {
    fn open(&self, _task_id: &TaskId) -> Result<ChannelLink, FetchError> {
        let mut socket = ProgressSocket::connect(self.url.clone());
        let events = socket
            .take_receiver()
            .ok_or_else(|| FetchError::WebSocket("receiver taken".to_string()))?;
        Ok(ChannelLink {
            handle: Box::new(socket),
            events,
        })
    }
}

/// Accepts every request and numbers the tasks `task-1`, `task-2`, ...
#[derive(Default)]
pub struct StubApi {
    calls: AtomicUsize,
}

impl StubApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskApi for StubApi {
    async fn start_task(&self, _request: &QueryRequest) -> Result<TaskId, FetchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TaskId::new(format!("task-{n}")))
    }
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub states: Vec<TaskState>,
    pub lines: Vec<String>,
    pub cleared: usize,
    pub progress: Vec<Option<ProgressSnapshot>>,
    pub enabled: Vec<bool>,
    pub files_changed: usize,
}

/// Sink that records every push; clones share the record
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub record: Arc<Mutex<Recorded>>,
}

impl RecordingSink {
    pub fn snapshot<R>(&self, f: impl FnOnce(&Recorded) -> R) -> R {
        f(&self.record.lock().unwrap())
    }
}

impl ProgressSink for RecordingSink {
    fn state_changed(&mut self, state: TaskState) {
        self.record.lock().unwrap().states.push(state);
    }

    fn log_line(&mut self, line: &str) {
        self.record.lock().unwrap().lines.push(line.to_string());
    }

    fn log_cleared(&mut self) {
        let mut record = self.record.lock().unwrap();
        record.cleared += 1;
        record.lines.clear();
    }

    fn progress_changed(&mut self, progress: Option<ProgressSnapshot>) {
        self.record.lock().unwrap().progress.push(progress);
    }

    fn submission_enabled(&mut self, enabled: bool) {
        self.record.lock().unwrap().enabled.push(enabled);
    }

    fn files_changed(&mut self) {
        self.record.lock().unwrap().files_changed += 1;
    }
}

pub fn log(text: &str) -> ChannelEvent {
    ChannelEvent::Message(ProgressMessage::Log {
        text: text.to_string(),
    })
}

pub fn status(progress: i64, total: i64) -> ChannelEvent {
    ChannelEvent::Message(ProgressMessage::Status { progress, total })
}

pub fn complete() -> ChannelEvent {
    ChannelEvent::Message(ProgressMessage::Complete {})
}

pub fn error(text: Option<&str>) -> ChannelEvent {
    ChannelEvent::Message(ProgressMessage::Error {
        text: text.map(str::to_string),
    })
}

/// Serve one socket that sends `frames` and then stays open
pub async fn spawn_progress_server(frames: Vec<String>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = accept_async(stream).await else {
            return;
        };
        for frame in frames {
            if ws.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        while let Some(Ok(_)) = ws.next().await {}
    });

    Url::parse(&format!("ws://{addr}/ws/progress/task-1")).expect("url")
}

/// Port nothing listens on
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}
