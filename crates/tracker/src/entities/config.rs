//! Configuration entities.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{TasksError, TasksResult};

/// Tracker configuration, stored as `.tracker/config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Delimited data file holding the tasks
    #[serde(default = "default_data_file", rename = "dataFile")]
    pub data_file: PathBuf,

    /// Destination of `export`
    #[serde(default = "default_export_file", rename = "exportFile")]
    pub export_file: PathBuf,

    /// Field delimiter for the data file
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("tasks.txt")
}

fn default_export_file() -> PathBuf {
    PathBuf::from("tasks.csv")
}

const fn default_delimiter() -> char {
    '|'
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            export_file: default_export_file(),
            delimiter: default_delimiter(),
        }
    }
}

impl TrackerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject delimiters that could appear inside a status, priority or date
    pub fn validate(&self) -> TasksResult<()> {
        validate_delimiter(self.delimiter)
    }

    /// Resolve relative paths against the project directory
    pub fn resolve(mut self, project_path: &Path) -> Self {
        if self.data_file.is_relative() {
            self.data_file = project_path.join(&self.data_file);
        }
        if self.export_file.is_relative() {
            self.export_file = project_path.join(&self.export_file);
        }
        self
    }
}

/// Check that a delimiter cannot collide with field contents
pub fn validate_delimiter(delimiter: char) -> TasksResult<()> {
    if delimiter.is_alphanumeric()
        || delimiter.is_whitespace()
        || delimiter == '-'
        || delimiter == '"'
    {
        return Err(TasksError::InvalidConfigValue {
            key: "delimiter".to_string(),
            reason: format!("'{delimiter}' can appear inside field values"),
        });
    }
    Ok(())
}
