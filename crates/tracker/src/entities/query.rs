//! Query parameters for listing and sorting tasks.

use super::{Task, TaskPriority, TaskStatus};
use crate::errors::TasksError;

/// Single-field equality filter for `list`
///
/// The comparison value is matched case-insensitively against the persisted
/// spelling, so values outside the known enumeration simply match nothing
/// (or match lines that were edited out of band).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    Status(String),
    Priority(String),
}

impl TaskFilter {
    pub fn status(value: impl Into<String>) -> Self {
        Self::Status(value.into())
    }

    pub fn priority(value: impl Into<String>) -> Self {
        Self::Priority(value.into())
    }

    /// Check a task against the filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Status(value) => task.status.as_str().eq_ignore_ascii_case(value.trim()),
            Self::Priority(value) => task.priority.as_str().eq_ignore_ascii_case(value.trim()),
        }
    }
}

impl From<TaskStatus> for TaskFilter {
    fn from(status: TaskStatus) -> Self {
        Self::Status(status.to_string())
    }
}

impl From<TaskPriority> for TaskFilter {
    fn from(priority: TaskPriority) -> Self {
        Self::Priority(priority.to_string())
    }
}

/// Sort keys supported by `sort_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DueDate,
    Priority,
    Status,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DueDate => write!(f, "due_date"),
            Self::Priority => write!(f, "priority"),
            Self::Status => write!(f, "status"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "due_date" | "due-date" | "due" | "duedate" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            _ => Err(TasksError::InvalidArgument {
                reason: format!("unknown sort key '{s}' (expected due_date, priority or status)"),
            }),
        }
    }
}

/// Sort direction; only honoured for `SortKey::DueDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(TasksError::InvalidArgument {
                reason: format!("unknown sort direction '{s}' (expected asc or desc)"),
            }),
        }
    }
}
