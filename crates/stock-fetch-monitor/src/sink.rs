/*
[INPUT]:  State, log and progress pushes from the task coordinator
[OUTPUT]: Rendering hooks implemented by display layers
[POS]:    Presentation seam - write-only display adapter
[UPDATE]: When the coordinator starts pushing new kinds of display data
*/

use crate::task::{ProgressSnapshot, TaskState};

/// Display adapter fed by the coordinator
///
/// Calls arrive synchronously with the transitions that cause them. Sinks
/// never feed anything back into the coordinator.
pub trait ProgressSink: Send {
    fn state_changed(&mut self, state: TaskState);

    /// Append one line verbatim
    fn log_line(&mut self, line: &str);

    /// A new submission started; previous log output is stale
    fn log_cleared(&mut self) {}

    /// `None` resets the indicator for a new task
    fn progress_changed(&mut self, progress: Option<ProgressSnapshot>);

    fn submission_enabled(&mut self, enabled: bool);

    /// Output files changed and any file listing should be reloaded
    fn files_changed(&mut self) {}
}

/// Sink that renders nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn state_changed(&mut self, _state: TaskState) {}

    fn log_line(&mut self, _line: &str) {}

    fn progress_changed(&mut self, _progress: Option<ProgressSnapshot>) {}

    fn submission_enabled(&mut self, _enabled: bool) {}
}
