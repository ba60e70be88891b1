/*
[INPUT]:  Raw (progress, total) pairs from status messages
[OUTPUT]: Validated ProgressSnapshot with percentage and display text
[POS]:    Task domain logic - progress bookkeeping
[UPDATE]: When progress formatting or validation changes
*/

use std::fmt;

/// Processed items out of the task's total; `total` is always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    done: u64,
    total: u64,
}

impl ProgressSnapshot {
    /// Returns `None` for `total <= 0` or a negative `done`.
    pub fn new(done: i64, total: i64) -> Option<Self> {
        let total = u64::try_from(total).ok().filter(|total| *total > 0)?;
        let done = u64::try_from(done).ok()?;
        Some(Self { done, total })
    }

    /// Fully-done snapshot for a finished task
    ///
    /// Keeps the last known total so `2/4` becomes `4/4`; without a prior
    /// snapshot it is `1/1`.
    pub fn completed(previous: Option<Self>) -> Self {
        let total = previous.map_or(1, |snapshot| snapshot.total);
        Self { done: total, total }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Percentage rounded half up; `done` above `total` is not clamped
    pub fn percent(&self) -> u64 {
        let (done, total) = (u128::from(self.done), u128::from(self.total));
        ((done * 200 + total) / (total * 2)) as u64
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percent())
    }
}
