//! File-based storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::record::{LineCodec, StoredLine};
use super::traits::Storage;
use crate::entities::Task;
use crate::errors::{TasksError, TasksResult};

/// Delimited flat-file storage
pub struct FileStorage {
    /// Path to the data file
    data_file: PathBuf,

    /// Line encoder/decoder
    codec: LineCodec,
}

impl FileStorage {
    /// Create a new file storage instance over `data_file`
    pub fn new(data_file: impl AsRef<Path>, delimiter: char) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
            codec: LineCodec::new(delimiter),
        }
    }

    /// Read the data file; a missing file is an empty store
    async fn read_data_file(&self) -> TasksResult<Vec<u8>> {
        match fs::read(&self.data_file).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(TasksError::FileReadError {
                path: self.data_file.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Write the data file
    async fn write_data_file(&self, content: &[u8]) -> TasksResult<()> {
        // Ensure directory exists
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(&self.data_file, content)
            .await
            .map_err(|e| TasksError::FileWriteError {
                path: self.data_file.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> TasksResult<()> {
        if !self.data_file.exists() {
            self.write_data_file(&[]).await?;
        }
        Ok(())
    }

    fn storage_type(&self) -> &'static str {
        "file"
    }

    fn delimiter(&self) -> char {
        self.codec.delimiter()
    }

    async fn is_initialized(&self) -> TasksResult<bool> {
        Ok(self.data_file.exists())
    }

    async fn load_lines(&self) -> TasksResult<Vec<StoredLine>> {
        let content = self.read_data_file().await?;
        let lines = self.codec.decode_document(&content);

        for line in &lines {
            if let StoredLine::Malformed(malformed) = line {
                debug!(
                    line = malformed.line,
                    reason = %malformed.reason,
                    "Skipping malformed record"
                );
            }
        }

        debug!(
            path = %self.data_file.display(),
            lines = lines.len(),
            "Loaded data file"
        );
        Ok(lines)
    }

    async fn save_lines(&self, lines: &[StoredLine]) -> TasksResult<()> {
        let content = self.codec.encode_document(lines);
        self.write_data_file(&content).await?;
        debug!(
            path = %self.data_file.display(),
            lines = lines.len(),
            "Saved data file"
        );
        Ok(())
    }

    async fn load_tasks(&self) -> TasksResult<Vec<Task>> {
        let lines = self.load_lines().await?;
        Ok(lines
            .into_iter()
            .filter_map(|line| match line {
                StoredLine::Task(task) => Some(task),
                StoredLine::Malformed(_) => None,
            })
            .collect())
    }

    async fn load_task(&self, id: u64) -> TasksResult<Option<Task>> {
        let tasks = self.load_tasks().await?;
        Ok(tasks.into_iter().find(|t| t.id == id))
    }

    async fn add_task(&self, task: Task) -> TasksResult<()> {
        let mut lines = self.load_lines().await?;
        lines.push(StoredLine::Task(task));
        self.save_lines(&lines).await
    }

    async fn update_task(&self, id: u64, task: &Task) -> TasksResult<()> {
        let mut lines = self.load_lines().await?;

        let slot = lines.iter_mut().find(|line| match line {
            StoredLine::Task(t) => t.id == id,
            StoredLine::Malformed(_) => false,
        });

        if let Some(slot) = slot {
            *slot = StoredLine::Task(task.clone());
            self.save_lines(&lines).await
        } else {
            Err(TasksError::TaskNotFound { id })
        }
    }

    async fn delete_task(&self, id: u64) -> TasksResult<()> {
        let mut lines = self.load_lines().await?;
        let len_before = lines.len();
        lines.retain(|line| !matches!(line, StoredLine::Task(t) if t.id == id));

        if lines.len() == len_before {
            return Err(TasksError::TaskNotFound { id });
        }

        self.save_lines(&lines).await
    }

    async fn max_task_id(&self) -> TasksResult<u64> {
        let lines = self.load_lines().await?;

        // Lines whose id field is unreadable do not take part
        Ok(lines.iter().filter_map(StoredLine::id).max().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{TaskPriority, TaskStatus};
    use tempfile::TempDir;

    async fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("tasks.txt"), '|');
        storage.initialize().await.unwrap();
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn test_initialize() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested/tasks.txt"), '|');

        assert!(!storage.is_initialized().await.unwrap());

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await.unwrap());
        assert!(temp_dir.path().join("nested/tasks.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("absent.txt"), '|');

        assert!(storage.load_tasks().await.unwrap().is_empty());
        assert_eq!(storage.max_task_id().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_save_tasks() {
        let (temp_dir, storage) = setup_storage().await;

        let task = Task::new(1, "Test Task", TaskPriority::High, "2025-01-01");
        storage.add_task(task.clone()).await.unwrap();

        let tasks = storage.load_tasks().await.unwrap();
        assert_eq!(tasks, vec![task]);

        let content = std::fs::read_to_string(temp_dir.path().join("tasks.txt")).unwrap();
        assert_eq!(content, "1|Test Task|pending|high|2025-01-01\n");
    }

    #[tokio::test]
    async fn test_update_task_in_place() {
        let (_temp_dir, storage) = setup_storage().await;

        storage
            .add_task(Task::new(1, "A", TaskPriority::Low, "2025-01-01"))
            .await
            .unwrap();
        storage
            .add_task(Task::new(2, "B", TaskPriority::Low, "2025-01-02"))
            .await
            .unwrap();

        let mut changed = storage.load_task(1).await.unwrap().unwrap();
        changed.status = TaskStatus::Done;
        storage.update_task(1, &changed).await.unwrap();

        let tasks = storage.load_tasks().await.unwrap();
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[1].id, 2);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (_temp_dir, storage) = setup_storage().await;

        storage
            .add_task(Task::new(1, "Test", TaskPriority::Medium, "2025-01-01"))
            .await
            .unwrap();

        storage.delete_task(1).await.unwrap();
        assert!(storage.load_tasks().await.unwrap().is_empty());

        let err = storage.delete_task(1).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_max_task_id_ignores_unreadable_ids() {
        let (temp_dir, storage) = setup_storage().await;
        std::fs::write(
            temp_dir.path().join("tasks.txt"),
            "2|A|pending|low|2025-01-01\nx99|B|pending|low|2025-01-01\n5|short\n",
        )
        .unwrap();

        assert_eq!(storage.max_task_id().await.unwrap(), 5);
        assert_eq!(storage.load_tasks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_block_the_store() {
        let (temp_dir, storage) = setup_storage().await;
        let path = temp_dir.path().join("tasks.txt");
        std::fs::write(
            &path,
            b"1|A|pending|low|2025-01-01\n2|B\xff\xfe|pending|low|2025-01-01\n",
        )
        .unwrap();

        assert_eq!(storage.load_tasks().await.unwrap().len(), 1);
        assert_eq!(storage.max_task_id().await.unwrap(), 2);

        storage
            .add_task(Task::new(3, "C", TaskPriority::Low, "2025-01-03"))
            .await
            .unwrap();

        let content = std::fs::read(&path).unwrap();
        assert_eq!(
            content,
            b"1|A|pending|low|2025-01-01\n2|B\xff\xfe|pending|low|2025-01-01\n3|C|pending|low|2025-01-03\n"
                .to_vec()
        );
    }

    #[tokio::test]
    async fn test_rewrite_preserves_malformed_lines() {
        let (temp_dir, storage) = setup_storage().await;
        let path = temp_dir.path().join("tasks.txt");
        std::fs::write(
            &path,
            "1|A|pending|low|2025-01-01\n??? corrupted ???\n2|B|pending|low|2025-01-02\n",
        )
        .unwrap();

        storage.delete_task(1).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "??? corrupted ???\n2|B|pending|low|2025-01-02\n");
    }
}
