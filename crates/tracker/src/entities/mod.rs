//! Core data structures for task tracking.

mod config;
mod query;
mod report;
mod task;

pub use config::{validate_delimiter, TrackerConfig};
pub use query::{SortDirection, SortKey, TaskFilter};
pub use report::{PriorityReport, SummaryReport};
pub use task::{
    sanitize_title, validate_due_date, Task, TaskPriority, TaskStatus, TaskUpdate,
    ValidatedUpdate,
};
