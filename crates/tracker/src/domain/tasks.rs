//! Task store facade.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info};

use crate::entities::{
    sanitize_title, validate_due_date, PriorityReport, SortDirection, SortKey, SummaryReport,
    Task, TaskFilter, TaskPriority, TaskUpdate,
};
use crate::errors::{TasksError, TasksResult};
use crate::storage::{MalformedLine, Storage, StoredLine};

/// Task store providing every record and query operation
///
/// Construct once per data file and pass it by reference to callers.
pub struct TaskStore {
    storage: Arc<dyn Storage>,

    /// Highest id this instance has seen, so a deleted id is never handed out again
    high_water: AtomicU64,
}

impl TaskStore {
    /// Create a new task store
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            high_water: AtomicU64::new(0),
        }
    }

    /// Initialize the backing store
    pub async fn init(&self) -> TasksResult<()> {
        self.storage.initialize().await?;
        debug!(storage = self.storage.storage_type(), "Storage ready");
        Ok(())
    }

    /// Check if the backing store exists
    pub async fn is_initialized(&self) -> TasksResult<bool> {
        self.storage.is_initialized().await
    }

    /// Field delimiter of the backing store
    pub fn delimiter(&self) -> char {
        self.storage.delimiter()
    }

    /// Create a pending task with the next free id
    pub async fn create(&self, title: &str, priority: &str, due_date: &str) -> TasksResult<Task> {
        let title = sanitize_title(title, self.delimiter())?;
        let priority: TaskPriority = priority.parse()?;
        let due_date = validate_due_date(due_date)?;

        let id = self.allocate_id().await?;
        let task = Task::new(id, title, priority, due_date);
        self.storage.add_task(task.clone()).await?;

        info!(id = task.id, title = %task.title, "Created task");
        Ok(task)
    }

    /// Get a specific task by ID
    pub async fn get(&self, id: u64) -> TasksResult<Task> {
        self.storage
            .load_task(id)
            .await?
            .ok_or(TasksError::TaskNotFound { id })
    }

    /// Change any subset of title, status, priority and due date
    pub async fn update(&self, id: u64, fields: &TaskUpdate) -> TasksResult<Task> {
        let validated = fields.validate(self.delimiter())?;

        let mut task = self.get(id).await?;
        task.apply(validated);
        self.storage.update_task(id, &task).await?;

        info!(id, "Updated task");
        Ok(task)
    }

    /// Remove a task; its id is not reissued
    pub async fn delete(&self, id: u64) -> TasksResult<()> {
        let max_id = self.storage.max_task_id().await?;
        self.high_water.fetch_max(max_id, Ordering::SeqCst);

        self.storage.delete_task(id).await?;

        info!(id, "Deleted task");
        Ok(())
    }

    /// List tasks in file order, optionally filtered on one field
    pub async fn list(&self, filter: Option<&TaskFilter>) -> TasksResult<Vec<Task>> {
        let tasks = self.storage.load_tasks().await?;

        if let Some(filter) = filter {
            Ok(tasks.into_iter().filter(|t| filter.matches(t)).collect())
        } else {
            Ok(tasks)
        }
    }

    /// Case-insensitive regex search over titles
    ///
    /// A pattern that does not compile matches nothing.
    pub async fn search(&self, pattern: &str) -> TasksResult<Vec<Task>> {
        if pattern.is_empty() {
            return Err(TasksError::InvalidPattern {
                reason: "search pattern must not be empty".to_string(),
            });
        }

        let regex = match Regex::new(&format!("(?i){pattern}")) {
            Ok(regex) => regex,
            Err(e) => {
                debug!(pattern, error = %e, "Search pattern does not compile, no matches");
                return Ok(Vec::new());
            }
        };

        let tasks = self.storage.load_tasks().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| regex.is_match(&t.title))
            .collect())
    }

    /// All tasks sorted by `key`
    ///
    /// Sorting is stable. `direction` only applies to due dates; priority
    /// and status always sort ascending.
    pub async fn sort_by(&self, key: SortKey, direction: SortDirection) -> TasksResult<Vec<Task>> {
        let mut tasks = self.storage.load_tasks().await?;
        sort_tasks(&mut tasks, key, direction);
        Ok(tasks)
    }

    /// Count tasks per status
    pub async fn summary_report(&self) -> TasksResult<SummaryReport> {
        let tasks = self.storage.load_tasks().await?;
        Ok(SummaryReport::from_tasks(&tasks))
    }

    /// Tasks not done and due before `today`, in file order
    pub async fn overdue_report(&self, today: &str) -> TasksResult<Vec<Task>> {
        let today = validate_due_date(today)?;
        let tasks = self.storage.load_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.is_overdue(&today)).collect())
    }

    /// Tasks grouped into high, medium and low
    pub async fn priority_report(&self) -> TasksResult<PriorityReport> {
        let tasks = self.storage.load_tasks().await?;

        let mut report = PriorityReport::default();
        for task in tasks {
            match task.priority {
                TaskPriority::High => report.high.push(task),
                TaskPriority::Medium => report.medium.push(task),
                TaskPriority::Low => report.low.push(task),
                TaskPriority::Unrecognized(_) => {}
            }
        }
        Ok(report)
    }

    /// Persisted lines that could not be read as tasks
    pub async fn malformed_lines(&self) -> TasksResult<Vec<MalformedLine>> {
        let lines = self.storage.load_lines().await?;
        Ok(lines
            .into_iter()
            .filter_map(|line| match line {
                StoredLine::Malformed(malformed) => Some(malformed),
                StoredLine::Task(_) => None,
            })
            .collect())
    }

    /// 1 + the highest id seen in the file or earlier by this instance
    async fn allocate_id(&self) -> TasksResult<u64> {
        let max_id = self.storage.max_task_id().await?;
        let seen = self.high_water.fetch_max(max_id, Ordering::SeqCst).max(max_id);
        let id = seen
            .checked_add(1)
            .ok_or(TasksError::IdSpaceExhausted { max: seen })?;
        self.high_water.fetch_max(id, Ordering::SeqCst);
        Ok(id)
    }
}

/// Stable in-place sort
pub fn sort_tasks(tasks: &mut [Task], key: SortKey, direction: SortDirection) {
    match (key, direction) {
        (SortKey::DueDate, SortDirection::Asc) => {
            tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        }
        (SortKey::DueDate, SortDirection::Desc) => {
            tasks.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        }
        (SortKey::Priority, _) => tasks.sort_by_key(|t| t.priority.rank()),
        (SortKey::Status, _) => tasks.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
    }
}
