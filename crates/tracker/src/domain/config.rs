//! Configuration domain facade.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::entities::TrackerConfig;
use crate::errors::{TasksError, TasksResult};

/// Directory holding the tracker configuration, relative to the project root
pub const CONFIG_DIR: &str = ".tracker";

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_file: Option<PathBuf>,
    pub export_file: Option<PathBuf>,
    pub delimiter: Option<char>,
}

/// Configuration domain facade
pub struct ConfigDomain {
    project_path: PathBuf,
    config_path: PathBuf,
}

impl ConfigDomain {
    /// Create a new config domain
    pub fn new(project_path: impl AsRef<Path>) -> Self {
        let project_path = project_path.as_ref().to_path_buf();
        Self {
            config_path: project_path.join(CONFIG_DIR).join("config.json"),
            project_path,
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration
    pub async fn load(&self) -> TasksResult<TrackerConfig> {
        match fs::read_to_string(&self.config_path).await {
            Ok(content) => {
                let config: TrackerConfig =
                    serde_json::from_str(&content).map_err(|e| TasksError::ConfigError {
                        reason: format!("{}: {e}", self.config_path.display()),
                    })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TrackerConfig::default()),
            Err(e) => Err(TasksError::FileReadError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Save configuration
    pub async fn save(&self, config: &TrackerConfig) -> TasksResult<()> {
        config.validate()?;

        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            TasksError::FileWriteError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Effective configuration: overrides, then config file, then defaults,
    /// with relative paths resolved against the project directory
    pub async fn resolve(&self, overrides: ConfigOverrides) -> TasksResult<TrackerConfig> {
        let mut config = self.load().await?;

        if let Some(data_file) = overrides.data_file {
            config.data_file = data_file;
        }
        if let Some(export_file) = overrides.export_file {
            config.export_file = export_file;
        }
        if let Some(delimiter) = overrides.delimiter {
            config.delimiter = delimiter;
        }

        config.validate()?;
        let config = config.resolve(&self.project_path);
        debug!(
            data_file = %config.data_file.display(),
            export_file = %config.export_file.display(),
            delimiter = %config.delimiter,
            "Resolved configuration"
        );
        Ok(config)
    }
}
