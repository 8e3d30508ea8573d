//! CSV export of the task list.

use std::path::Path;

use tokio::fs;
use tracing::info;

use super::TaskStore;
use crate::entities::Task;
use crate::errors::{TasksError, TasksResult};

const CSV_HEADER: &str = "ID,Title,Status,Priority,DueDate";

/// Render tasks as CSV, every field quoted, rows in the given order
pub fn render_csv(tasks: &[Task]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + tasks.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for task in tasks {
        let fields = [
            task.id.to_string(),
            task.title.clone(),
            task.status.to_string(),
            task.priority.to_string(),
            task.due_date.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

impl TaskStore {
    /// CSV projection of every task in file order
    pub async fn render_csv(&self) -> TasksResult<String> {
        let tasks = self.list(None).await?;
        Ok(render_csv(&tasks))
    }

    /// Write the CSV projection to `path`, returning the number of rows
    pub async fn export_csv(&self, path: impl AsRef<Path>) -> TasksResult<usize> {
        let path = path.as_ref();
        let tasks = self.list(None).await?;
        let content = render_csv(&tasks);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, content)
            .await
            .map_err(|e| TasksError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        info!(path = %path.display(), rows = tasks.len(), "Exported tasks to CSV");
        Ok(tasks.len())
    }
}
