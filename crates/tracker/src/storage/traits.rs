//! Storage trait definitions.

use async_trait::async_trait;

use super::record::StoredLine;
use crate::entities::Task;
use crate::errors::TasksResult;

/// Storage interface for task persistence
///
/// Every mutation reads the whole store, changes it in memory and writes the
/// whole store back. Lines that do not decode are carried through untouched.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize storage (create the data file and its directory)
    async fn initialize(&self) -> TasksResult<()>;

    /// Get storage type identifier
    fn storage_type(&self) -> &'static str;

    /// Field delimiter used by this store
    fn delimiter(&self) -> char;

    /// Check if storage is initialized
    async fn is_initialized(&self) -> TasksResult<bool>;

    // === Raw line operations ===

    /// Load every line, decoded or not, in file order
    async fn load_lines(&self) -> TasksResult<Vec<StoredLine>>;

    /// Replace the store contents with `lines`
    async fn save_lines(&self, lines: &[StoredLine]) -> TasksResult<()>;

    // === Task operations ===

    /// Load all well-formed tasks in file order
    async fn load_tasks(&self) -> TasksResult<Vec<Task>>;

    /// Load a single task by ID
    async fn load_task(&self, id: u64) -> TasksResult<Option<Task>>;

    /// Append a new task
    async fn add_task(&self, task: Task) -> TasksResult<()>;

    /// Replace a task in place
    async fn update_task(&self, id: u64, task: &Task) -> TasksResult<()>;

    /// Delete a task
    async fn delete_task(&self, id: u64) -> TasksResult<()>;

    /// Highest readable id in the store, 0 when there is none
    async fn max_task_id(&self) -> TasksResult<u64>;
}
