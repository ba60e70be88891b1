/*
[INPUT]:  QueryParams from the user, TaskApi, PushTransport, ProgressSink
[OUTPUT]: One tracked task at a time: submission, live channel, state, log, progress
[POS]:    Task layer - single-task lifecycle coordinator
[UPDATE]: When submission rules or coordinator-owned state change
*/

pub mod channel;
pub mod interpreter;
pub mod progress;
pub mod state_machine;

pub use channel::{ChannelHandle, ChannelLink, ChannelManager, PushTransport, WsTransport};
pub use progress::ProgressSnapshot;
pub use state_machine::{Locale, StateError, TaskAction, TaskState, TaskStateMachine};

use async_trait::async_trait;
use stock_fetch_adapter::{FetchClient, FetchError, QueryRequest, TaskId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::params::{QueryParams, ValidationError};
use crate::sink::ProgressSink;

/// Start-task request seam
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn start_task(&self, request: &QueryRequest) -> Result<TaskId, FetchError>;
}

#[async_trait]
impl TaskApi for FetchClient {
    async fn start_task(&self, request: &QueryRequest) -> Result<TaskId, FetchError> {
        Ok(self.start_query(request).await?.task_id)
    }
}

/// Why a submission did not start a task
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a task is already in progress")]
    AlreadyRunning,

    /// The start request failed; displays the server's detail unmodified
    #[error(transparent)]
    Remote(FetchError),

    #[error("progress channel could not be opened: {0}")]
    Transport(FetchError),
}

/// Coordinates the single active task
///
/// Owns the state machine, the progress channel, the log and the progress
/// snapshot. Display layers only receive pushes through the sink.
pub struct TaskCoordinator<A, T, S> {
    api: A,
    channel: ChannelManager<T>,
    machine: TaskStateMachine,
    progress: Option<ProgressSnapshot>,
    log: Vec<String>,
    submission_enabled: bool,
    sink: S,
}

impl<A, T, S> TaskCoordinator<A, T, S>
where
    A: TaskApi,
    T: PushTransport,
    S: ProgressSink,
{
    pub fn new(api: A, transport: T, sink: S) -> Self {
        Self {
            api,
            channel: ChannelManager::new(transport),
            machine: TaskStateMachine::new(),
            progress: None,
            log: Vec::new(),
            submission_enabled: true,
            sink,
        }
    }

    /// Validate, request a new task and open its progress channel
    ///
    /// Submission stays disabled until the task reaches a terminal state or
    /// fails to start.
    pub async fn submit(&mut self, params: &QueryParams) -> Result<TaskId, TaskError> {
        if !self.submission_enabled {
            return Err(TaskError::AlreadyRunning);
        }
        let request = params.to_request()?;

        if self.machine.state().is_terminal() {
            self.apply(TaskAction::Reset);
        }
        self.set_submission_enabled(false);
        self.log.clear();
        self.sink.log_cleared();
        self.set_progress(None);

        let task_id = match self.api.start_task(&request).await {
            Ok(task_id) => task_id,
            Err(err) => {
                warn!(error = %err, codes = %request.codes, "task submission failed");
                self.set_submission_enabled(true);
                return Err(TaskError::Remote(err));
            }
        };

        if let Err(err) = self.channel.open(&task_id) {
            warn!(task_id = %task_id, error = %err, "progress channel could not be opened");
            self.set_submission_enabled(true);
            return Err(TaskError::Transport(err));
        }
        self.apply(TaskAction::Start);
        info!(task_id = %task_id, codes = %request.codes, "task running");
        Ok(task_id)
    }

    /// Wait for one event of the live channel and apply it
    ///
    /// Returns `false` when no channel is live.
    pub async fn step(&mut self) -> bool {
        let Some(event) = self.channel.recv().await else {
            return false;
        };
        self.dispatch(event);
        true
    }

    /// Apply events until the channel is gone; returns the final state
    pub async fn run(&mut self) -> TaskState {
        while self.step().await {}
        self.state()
    }

    /// Stop monitoring the current task (e.g. on Ctrl-C)
    pub fn abandon(&mut self) {
        if !self.channel.is_open() {
            return;
        }
        self.channel.teardown();
        if self.state() == TaskState::Running {
            self.append_log("monitoring stopped before the task finished".to_string());
            self.apply(TaskAction::Fail);
        }
        self.set_submission_enabled(true);
    }

    pub fn state(&self) -> TaskState {
        self.machine.state()
    }

    pub fn progress(&self) -> Option<ProgressSnapshot> {
        self.progress
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn submission_enabled(&self) -> bool {
        self.submission_enabled
    }

    pub fn is_channel_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Task id of the live channel
    pub fn active_task(&self) -> Option<&TaskId> {
        self.channel.task_id()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Transition and push the new state; invalid transitions are ignored
    pub(crate) fn apply(&mut self, action: TaskAction) -> bool {
        match self.machine.transition(action) {
            Ok(state) => {
                debug!(?action, ?state, "task state changed");
                self.sink.state_changed(state);
                true
            }
            Err(err) => {
                warn!(error = %err, "task state transition ignored");
                false
            }
        }
    }

    pub(crate) fn append_log(&mut self, line: String) {
        self.sink.log_line(&line);
        self.log.push(line);
    }

    pub(crate) fn set_progress(&mut self, progress: Option<ProgressSnapshot>) {
        self.progress = progress;
        self.sink.progress_changed(progress);
    }

    pub(crate) fn set_submission_enabled(&mut self, enabled: bool) {
        if self.submission_enabled == enabled {
            return;
        }
        self.submission_enabled = enabled;
        self.sink.submission_enabled(enabled);
    }
}
