//! Report aggregates.

use serde::Serialize;

use super::{Task, TaskStatus};

/// Count of tasks per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,

    /// Every task, including ones whose status is not recognized
    pub total: usize,
}

impl SummaryReport {
    /// Count tasks in a single pass
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut report = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Pending => report.pending += 1,
                TaskStatus::InProgress => report.in_progress += 1,
                TaskStatus::Done => report.done += 1,
                TaskStatus::Unrecognized(_) => {}
            }
            report.total += 1;
        }
        report
    }

    /// Percentage of tasks marked done
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64) * 100.0
        }
    }
}

/// Tasks grouped by priority, each group in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityReport {
    pub high: Vec<Task>,
    pub medium: Vec<Task>,
    pub low: Vec<Task>,
}

impl PriorityReport {
    /// Groups in their fixed display order
    pub fn groups(&self) -> [(&'static str, &[Task]); 3] {
        [
            ("high", self.high.as_slice()),
            ("medium", self.medium.as_slice()),
            ("low", self.low.as_slice()),
        ]
    }
}
