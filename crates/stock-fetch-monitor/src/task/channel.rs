/*
[INPUT]:  Task ids of accepted tasks, PushTransport implementation
[OUTPUT]: At most one live progress channel and its ordered events
[POS]:    Task layer - push channel ownership (open / recv / teardown)
[UPDATE]: When channel lifecycle or transport seams change
*/

use stock_fetch_adapter::{ChannelEvent, FetchClient, FetchError, ProgressSocket, TaskId};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Close side of an opened channel
pub trait ChannelHandle: Send {
    /// Close the underlying connection; must tolerate repeated calls
    fn close(&mut self);
}

/// A freshly opened channel: its close handle plus its event stream
pub struct ChannelLink {
    pub handle: Box<dyn ChannelHandle>,
    pub events: mpsc::Receiver<ChannelEvent>,
}

/// Opens progress channels addressed by task id
pub trait PushTransport: Send {
    /// Start opening a channel. Returns without waiting for the handshake;
    /// connection failures arrive later as `ChannelEvent::Error`.
    fn open(&self, task_id: &TaskId) -> Result<ChannelLink, FetchError>;
}

/// Production transport: WebSocket at `/ws/progress/{task_id}`
#[derive(Debug, Clone)]
pub struct WsTransport {
    client: FetchClient,
}

impl WsTransport {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

impl ChannelHandle for ProgressSocket {
    fn close(&mut self) {
        ProgressSocket::close(self);
    }
}

impl PushTransport for WsTransport {
    fn open(&self, task_id: &TaskId) -> Result<ChannelLink, FetchError> {
        let url = self.client.progress_url(task_id)?;
        let mut socket = ProgressSocket::connect(url);
        let events = socket
            .take_receiver()
            .ok_or_else(|| FetchError::WebSocket("progress receiver already taken".to_string()))?;
        Ok(ChannelLink {
            handle: Box::new(socket),
            events,
        })
    }
}

struct LiveChannel {
    task_id: TaskId,
    generation: u64,
    handle: Box<dyn ChannelHandle>,
    /// Subscription to the channel's events; `None` once detached
    events: Option<mpsc::Receiver<ChannelEvent>>,
}

impl LiveChannel {
    fn detach(&mut self) {
        if let Some(mut events) = self.events.take() {
            events.close();
        }
    }
}

/// Single-slot owner of the progress channel
///
/// Holds zero or one live channel. `open` always tears the previous channel
/// down first, and a torn-down channel's receiver is dropped, so nothing it
/// still delivers can reach the caller.
pub struct ChannelManager<T> {
    transport: T,
    slot: Option<LiveChannel>,
    generation: u64,
}

impl<T: PushTransport> ChannelManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            slot: None,
            generation: 0,
        }
    }

    /// Tear down any current channel, then open one for `task_id`
    pub fn open(&mut self, task_id: &TaskId) -> Result<(), FetchError> {
        self.teardown();

        let link = self.transport.open(task_id)?;
        self.generation += 1;
        info!(task_id = %task_id, generation = self.generation, "progress channel opened");
        self.slot = Some(LiveChannel {
            task_id: task_id.clone(),
            generation: self.generation,
            handle: link.handle,
            events: Some(link.events),
        });
        Ok(())
    }

    /// Detach and close the current channel. No-op without one.
    pub fn teardown(&mut self) {
        let Some(live) = self.slot.as_mut() else {
            return;
        };
        live.detach();
        live.handle.close();
        debug!(
            task_id = %live.task_id,
            generation = live.generation,
            "progress channel torn down"
        );
        self.slot = None;
    }

    /// Wait for the next event of the live channel
    ///
    /// Returns `None` right away when no channel is live. A stream that ends
    /// without a close notification yields `ChannelEvent::Closed`.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        let events = self.slot.as_mut()?.events.as_mut()?;
        Some(events.recv().await.unwrap_or(ChannelEvent::Closed))
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    /// Task id of the live channel
    pub fn task_id(&self) -> Option<&TaskId> {
        self.slot.as_ref().map(|live| &live.task_id)
    }

    /// Number of channels opened so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T> Drop for ChannelManager<T> {
    fn drop(&mut self) {
        if let Some(live) = self.slot.as_mut() {
            live.detach();
            live.handle.close();
        }
    }
}
