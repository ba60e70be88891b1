/*
[INPUT]:  TaskAction values raised by submission and channel events
[OUTPUT]: Validated lifecycle transitions for the single active task
[POS]:    Task domain logic - state machine for lifecycle management
[UPDATE]: When task states or allowed transitions change
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of the one task this client tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Error)
    }

    /// Display label in the given locale
    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, TaskState::Idle) => "Idle",
            (Locale::En, TaskState::Running) => "Running",
            (Locale::En, TaskState::Completed) => "Completed",
            (Locale::En, TaskState::Error) => "Error",
            (Locale::Zh, TaskState::Idle) => "空闲",
            (Locale::Zh, TaskState::Running) => "运行中",
            (Locale::Zh, TaskState::Completed) => "已完成",
            (Locale::Zh, TaskState::Error) => "出错",
        }
    }
}

/// Language used for state labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Actions that can trigger task state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Channel opened for a freshly accepted task
    Start,
    /// `complete` message received
    Complete,
    /// `error` message, transport error, or abandoned channel
    Fail,
    /// New submission after a terminal state
    Reset,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Invalid transition: {from:?} -> {action:?}")]
    InvalidTransition { from: TaskState, action: TaskAction },
}

/// State machine managing task lifecycle transitions
#[derive(Debug, Default)]
pub struct TaskStateMachine {
    current_state: TaskState,
}

impl TaskStateMachine {
    /// Create a machine in the `Idle` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the action is valid from the current state
    pub fn can_transition(&self, action: TaskAction) -> bool {
        self.next_state(action).is_some()
    }

    /// Perform a state transition and return the new state
    pub fn transition(&mut self, action: TaskAction) -> Result<TaskState, StateError> {
        let next = self.next_state(action).ok_or(StateError::InvalidTransition {
            from: self.current_state,
            action,
        })?;
        self.current_state = next;
        Ok(next)
    }

    /// Get the current state
    pub fn state(&self) -> TaskState {
        self.current_state
    }

    fn next_state(&self, action: TaskAction) -> Option<TaskState> {
        match (self.current_state, action) {
            (TaskState::Idle, TaskAction::Start) => Some(TaskState::Running),
            (TaskState::Running, TaskAction::Complete) => Some(TaskState::Completed),
            (TaskState::Running, TaskAction::Fail) => Some(TaskState::Error),
            (TaskState::Completed | TaskState::Error, TaskAction::Reset) => Some(TaskState::Idle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let machine = TaskStateMachine::new();
        assert_eq!(machine.state(), TaskState::Idle);
    }

    #[test]
    fn test_valid_transitions() {
        let mut machine = TaskStateMachine::new();
        assert_eq!(machine.transition(TaskAction::Start), Ok(TaskState::Running));
        assert_eq!(machine.transition(TaskAction::Complete), Ok(TaskState::Completed));
        assert_eq!(machine.transition(TaskAction::Reset), Ok(TaskState::Idle));
        assert_eq!(machine.transition(TaskAction::Start), Ok(TaskState::Running));
        assert_eq!(machine.transition(TaskAction::Fail), Ok(TaskState::Error));
        assert_eq!(machine.transition(TaskAction::Reset), Ok(TaskState::Idle));
    }

    #[test]
    fn test_terminal_states_need_reset_before_start() {
        for terminal in [TaskAction::Complete, TaskAction::Fail] {
            let mut machine = TaskStateMachine::new();
            machine.transition(TaskAction::Start).unwrap();
            machine.transition(terminal).unwrap();

            let result = machine.transition(TaskAction::Start);
            assert_eq!(
                result,
                Err(StateError::InvalidTransition {
                    from: machine.state(),
                    action: TaskAction::Start,
                })
            );
            assert!(machine.state().is_terminal());
        }
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut machine = TaskStateMachine::new();
        assert!(!machine.can_transition(TaskAction::Complete));
        assert!(machine.transition(TaskAction::Fail).is_err());
        assert!(machine.transition(TaskAction::Reset).is_err());
        assert_eq!(machine.state(), TaskState::Idle);

        machine.transition(TaskAction::Start).unwrap();
        machine.transition(TaskAction::Complete).unwrap();
        assert!(machine.transition(TaskAction::Fail).is_err());
        assert_eq!(machine.state(), TaskState::Completed);
    }

    #[test]
    fn test_labels() {
        assert_eq!(TaskState::Running.label(Locale::En), "Running");
        assert_eq!(TaskState::Running.label(Locale::Zh), "运行中");
        assert_eq!(TaskState::Completed.label(Locale::Zh), "已完成");
        assert_eq!(TaskState::Error.label(Locale::Zh), "出错");
    }
}
