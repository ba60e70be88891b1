/*
[INPUT]:  Sink pushes from the task coordinator
[OUTPUT]: Styled progress output on a terminal writer
[POS]:    Presentation layer - line-oriented terminal rendering
[UPDATE]: When output format or styling changes
*/

use console::style;
use std::io::{self, Write};
use tracing::{debug, warn};

use crate::sink::ProgressSink;
use crate::task::interpreter::{CONNECTION_ERROR_PREFIX, ERROR_LINE_PREFIX};
use crate::task::{Locale, ProgressSnapshot, TaskState};

/// Renders task progress as plain lines
pub struct TerminalSink<W> {
    out: W,
    locale: Locale,
    files_stale: bool,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout(locale: Locale) -> Self {
        Self::new(io::stdout(), locale)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, locale: Locale) -> Self {
        Self {
            out,
            locale,
            files_stale: false,
        }
    }

    /// Whether a completed task produced files that were not listed yet
    pub fn files_stale(&self) -> bool {
        self.files_stale
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            warn!(error = %err, "failed to write terminal output");
        }
    }
}

impl<W: Write + Send> ProgressSink for TerminalSink<W> {
    fn state_changed(&mut self, state: TaskState) {
        let label = state.label(self.locale);
        let styled = match state {
            TaskState::Idle => style(label).dim(),
            TaskState::Running => style(label).yellow().bold(),
            TaskState::Completed => style(label).green().bold(),
            TaskState::Error => style(label).red().bold(),
        };
        self.emit(&format!("[{styled}]"));
    }

    fn log_line(&mut self, line: &str) {
        if line.starts_with(ERROR_LINE_PREFIX) || line.starts_with(CONNECTION_ERROR_PREFIX) {
            self.emit(&style(line).red().to_string());
        } else {
            self.emit(line);
        }
    }

    fn progress_changed(&mut self, progress: Option<ProgressSnapshot>) {
        if let Some(progress) = progress {
            self.emit(&style(progress).cyan().to_string());
        }
    }

    fn submission_enabled(&mut self, enabled: bool) {
        debug!(enabled, "submission availability changed");
    }

    fn files_changed(&mut self) {
        self.files_stale = true;
    }
}
