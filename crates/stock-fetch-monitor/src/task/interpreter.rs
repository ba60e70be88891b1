/*
[INPUT]:  ChannelEvents from the live progress channel
[OUTPUT]: State transitions, log lines, progress updates, teardown
[POS]:    Task layer - progress protocol interpretation
[UPDATE]: When message kinds or their effects change
*/

use stock_fetch_adapter::{ChannelEvent, ProgressMessage};
use tracing::{debug, warn};

use super::{ProgressSnapshot, PushTransport, TaskAction, TaskApi, TaskCoordinator, TaskState};
use crate::sink::ProgressSink;

/// Prefix of log lines carrying a task's error text
pub const ERROR_LINE_PREFIX: &str = "ERROR: ";
/// Prefix of the diagnostic line for a transport failure
pub const CONNECTION_ERROR_PREFIX: &str = "connection error: ";
pub const CLOSED_EARLY_LINE: &str = "connection closed before the task finished";

impl<A, T, S> TaskCoordinator<A, T, S>
where
    A: TaskApi,
    T: PushTransport,
    S: ProgressSink,
{
    /// Apply one channel event
    ///
    /// Events are only honoured while a channel is live; anything arriving
    /// after teardown is dropped.
    pub fn dispatch(&mut self, event: ChannelEvent) {
        if !self.channel.is_open() {
            debug!(?event, "event without live channel dropped");
            return;
        }
        match event {
            ChannelEvent::Message(message) => self.apply_message(message),
            ChannelEvent::Error(detail) => self.on_transport_error(detail),
            ChannelEvent::Closed => self.on_transport_closed(),
        }
    }

    fn apply_message(&mut self, message: ProgressMessage) {
        match message {
            ProgressMessage::Log { text } => self.append_log(text),
            ProgressMessage::Status { progress, total } => {
                match ProgressSnapshot::new(progress, total) {
                    Some(snapshot) => self.set_progress(Some(snapshot)),
                    None => debug!(progress, total, "status without usable total discarded"),
                }
            }
            ProgressMessage::Complete {} => {
                self.apply(TaskAction::Complete);
                self.set_progress(Some(ProgressSnapshot::completed(self.progress)));
                self.finish();
                self.sink.files_changed();
            }
            ProgressMessage::Error { text } => {
                self.apply(TaskAction::Fail);
                self.finish();
                if let Some(text) = text.filter(|text| !text.is_empty()) {
                    self.append_log(format!("{ERROR_LINE_PREFIX}{text}"));
                }
            }
            ProgressMessage::Other => debug!("unrecognized progress message ignored"),
        }
    }

    fn on_transport_error(&mut self, detail: String) {
        warn!(%detail, "progress channel failed");
        self.append_log(format!("{CONNECTION_ERROR_PREFIX}{detail}"));
        self.apply(TaskAction::Fail);
        self.finish();
    }

    fn on_transport_closed(&mut self) {
        self.channel.teardown();
        if self.state() == TaskState::Running {
            warn!("progress channel closed without a terminal message");
            self.append_log(CLOSED_EARLY_LINE.to_string());
            self.apply(TaskAction::Fail);
        }
        self.set_submission_enabled(true);
    }

    fn finish(&mut self) {
        self.channel.teardown();
        self.set_submission_enabled(true);
    }
}
