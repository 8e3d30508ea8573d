//! Task entity and related types.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::errors::{TasksError, TasksResult};

static DUE_DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("due date pattern is valid"));

/// Task status values
///
/// `Unrecognized` only ever comes out of a persisted line that was edited out
/// of band. Parsing user input never yields it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Unrecognized(String),
}

impl TaskStatus {
    /// Decode a persisted status field, keeping unknown values verbatim
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "in-progress" => Self::InProgress,
            "done" => Self::Done,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Persisted spelling
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "inprogress" | "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(TasksError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Task priority levels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
    Unrecognized(String),
}

impl TaskPriority {
    /// Decode a persisted priority field, keeping unknown values verbatim
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Persisted spelling
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Sort rank: high first, unknown values last
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Unrecognized(_) => 4,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(TasksError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// Core task structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, never reused
    pub id: u64,

    /// Brief, descriptive title (never contains the field delimiter)
    pub title: String,

    /// Current task status
    pub status: TaskStatus,

    /// Task priority level
    pub priority: TaskPriority,

    /// Due date as `YYYY-MM-DD`
    pub due_date: String,
}

impl Task {
    /// Create a new pending task
    pub fn new(
        id: u64,
        title: impl Into<String>,
        priority: TaskPriority,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            status: TaskStatus::Pending,
            priority,
            due_date: due_date.into(),
        }
    }

    /// Not done and due strictly before `today` (both `YYYY-MM-DD`)
    pub fn is_overdue(&self, today: &str) -> bool {
        self.status != TaskStatus::Done && self.due_date.as_str() < today
    }

    /// Apply an already validated partial update
    pub fn apply(&mut self, update: ValidatedUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
    }
}

/// Partial record for the update operation, as typed by the user
///
/// Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Validate every supplied field
    pub fn validate(&self, delimiter: char) -> TasksResult<ValidatedUpdate> {
        Ok(ValidatedUpdate {
            title: self
                .title
                .as_deref()
                .map(|t| sanitize_title(t, delimiter))
                .transpose()?,
            status: self.status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
            priority: self.priority.as_deref().map(str::parse::<TaskPriority>).transpose()?,
            due_date: self.due_date.as_deref().map(validate_due_date).transpose()?,
        })
    }
}

/// A `TaskUpdate` whose fields have all passed validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedUpdate {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
}

/// Strip the delimiter and line breaks from a title and require something left
pub fn sanitize_title(raw: &str, delimiter: char) -> TasksResult<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != delimiter && *c != '\n' && *c != '\r')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(TasksError::InvalidTitle {
            reason: "title must not be empty".to_string(),
        });
    }

    Ok(cleaned.to_string())
}

/// Check a `YYYY-MM-DD` date for shape and calendar validity
pub fn validate_due_date(raw: &str) -> TasksResult<String> {
    let date = raw.trim();

    if !DUE_DATE_SHAPE.is_match(date) {
        return Err(TasksError::InvalidDueDate {
            date: raw.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| TasksError::InvalidDueDate {
        date: raw.to_string(),
        reason: "not a calendar date".to_string(),
    })?;

    Ok(date.to_string())
}
