//! Error types for the tracker crate.

use thiserror::Error;

/// Error types for task tracking
#[derive(Error, Debug, Clone)]
pub enum TasksError {
    // Task errors
    #[error("Task '{id}' not found")]
    TaskNotFound { id: u64 },

    // Validation errors
    #[error("Invalid title: {reason}")]
    InvalidTitle { reason: String },

    #[error("Invalid status: '{status}' (expected pending, in-progress or done)")]
    InvalidStatus { status: String },

    #[error("Invalid priority: '{priority}' (expected high, medium or low)")]
    InvalidPriority { priority: String },

    #[error("Invalid due date '{date}': {reason}")]
    InvalidDueDate { date: String, reason: String },

    #[error("Invalid search pattern: {reason}")]
    InvalidPattern { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Storage errors
    #[error("No task id left after {max}")]
    IdSpaceExhausted { max: u64 },

    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },
}

impl TasksError {
    /// Whether this error rejects caller input (the store was not touched)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTitle { .. }
                | Self::InvalidStatus { .. }
                | Self::InvalidPriority { .. }
                | Self::InvalidDueDate { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Whether this error reports a missing task
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound { .. })
    }
}

impl From<std::io::Error> for TasksError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TasksError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for tracker operations
pub type TasksResult<T> = Result<T, TasksError>;
