//! Integration tests for the task store.
//!
//! These tests drive the public API against a real data file in a
//! temporary directory.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tracker::entities::{SortDirection, SortKey, TaskFilter, TaskPriority, TaskStatus, TaskUpdate};
use tracker::storage::{FileStorage, Storage};
use tracker::{TaskStore, TasksError};

struct Fixture {
    _temp: TempDir,
    path: PathBuf,
    store: TaskStore,
}

async fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    let storage = Arc::new(FileStorage::new(&path, '|'));
    storage.initialize().await.unwrap();
    Fixture {
        _temp: temp,
        path,
        store: TaskStore::new(storage),
    }
}

/// Fixture over a data file with the given contents
async fn fixture_with(content: impl AsRef<[u8]>) -> Fixture {
    let fx = fixture().await;
    std::fs::write(&fx.path, content).unwrap();
    fx
}

fn ids(tasks: &[tracker::Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
}

mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_returns_pending_task() {
        let fx = fixture().await;

        let created = fx
            .store
            .create("Prepare slides", "medium", "2025-09-01")
            .await
            .unwrap();
        let fetched = fx.store.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.status, TaskStatus::Pending);
        assert_eq!(fetched.priority, TaskPriority::Medium);
        assert_eq!(fetched.due_date, "2025-09-01");
    }

    #[tokio::test]
    async fn test_ids_skip_deleted_gaps() {
        let fx = fixture().await;
        for title in ["one", "two", "three"] {
            fx.store.create(title, "low", "2025-01-01").await.unwrap();
        }

        fx.store.delete(2).await.unwrap();
        let next = fx.store.create("four", "low", "2025-01-01").await.unwrap();

        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_next_id_follows_max_in_existing_file() {
        let fx = fixture_with("3|A|pending|low|2025-01-01\n10|B|done|high|2025-01-02\n").await;

        let task = fx.store.create("C", "high", "2025-01-03").await.unwrap();
        assert_eq!(task.id, 11);
    }

    #[tokio::test]
    async fn test_unreadable_ids_do_not_affect_allocation() {
        let fx = fixture_with(
            "2|A|pending|low|2025-01-01\nNaN|B|pending|low|2025-01-01\n-7|C|done|low|2025-01-01\n",
        )
        .await;

        let task = fx.store.create("D", "low", "2025-01-01").await.unwrap();
        assert_eq!(task.id, 3);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order_and_fields() {
        let fx = fixture().await;
        let inputs = [
            ("Alpha", "high", "2025-03-01"),
            ("Beta", "low", "2024-12-31"),
            ("Gamma", "medium", "2025-01-15"),
            ("Delta", "high", "2026-07-04"),
        ];

        let mut created = Vec::new();
        for (title, priority, due) in inputs {
            created.push(fx.store.create(title, priority, due).await.unwrap());
        }

        assert_eq!(fx.store.list(None).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let fx = fixture().await;
        let original = fx
            .store
            .create("Refactor parser", "high", "2025-04-30")
            .await
            .unwrap();

        let updated = fx
            .store
            .update(original.id, &TaskUpdate::new().status("in-progress"))
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.priority, original.priority);
        assert_eq!(updated.due_date, original.due_date);
        assert_eq!(fx.store.get(original.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_keeps_file_position() {
        let fx = fixture().await;
        for title in ["a", "b", "c"] {
            fx.store.create(title, "low", "2025-01-01").await.unwrap();
        }

        fx.store
            .update(2, &TaskUpdate::new().title("b2").due_date("2025-02-02"))
            .await
            .unwrap();

        let titles: Vec<String> = fx
            .store
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "b2", "c"]);
    }

    #[tokio::test]
    async fn test_delete_then_get_and_delete_again() {
        let fx = fixture().await;
        let task = fx.store.create("Temp", "low", "2025-01-01").await.unwrap();

        fx.store.delete(task.id).await.unwrap();

        let err = fx.store.get(task.id).await.unwrap_err();
        assert!(matches!(err, TasksError::TaskNotFound { id } if id == task.id));

        let err = fx.store.delete(task.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let fx = fixture().await;

        let cases = [
            ("", "high", "2025-01-01"),
            ("x", "urgent", "2025-01-01"),
            ("x", "high", "2025-02-30"),
            ("x", "high", "01-02-2025"),
        ];
        for (title, priority, due) in cases {
            let err = fx.store.create(title, priority, due).await.unwrap_err();
            assert!(
                err.is_validation(),
                "expected validation error for ({title:?}, {priority:?}, {due:?}), got {err}"
            );
        }

        assert!(fx.store.list(None).await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&fx.path).unwrap(), "");
    }
}

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_filters_case_insensitively() {
        let fx = fixture().await;
        fx.store.create("A", "high", "2025-01-01").await.unwrap();
        fx.store.create("B", "low", "2025-01-01").await.unwrap();
        fx.store.create("C", "high", "2025-01-01").await.unwrap();
        fx.store
            .update(3, &TaskUpdate::new().status("done"))
            .await
            .unwrap();

        let high = fx
            .store
            .list(Some(&TaskFilter::priority("HIGH")))
            .await
            .unwrap();
        assert_eq!(ids(&high), vec![1, 3]);

        let done = fx
            .store
            .list(Some(&TaskFilter::status("Done")))
            .await
            .unwrap();
        assert_eq!(ids(&done), vec![3]);

        let pending = fx
            .store
            .list(Some(&TaskFilter::from(TaskStatus::Pending)))
            .await
            .unwrap();
        assert_eq!(ids(&pending), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_regex() {
        let fx = fixture().await;
        fx.store
            .create("Login Error", "high", "2025-01-01")
            .await
            .unwrap();
        fx.store.create("Fix bug", "medium", "2025-01-01").await.unwrap();
        fx.store
            .create("Deploy release", "low", "2025-01-01")
            .await
            .unwrap();

        let found = fx.store.search("bug|error").await.unwrap();
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_search_with_invalid_regex_finds_nothing() {
        let fx = fixture().await;
        fx.store.create("[draft]", "low", "2025-01-01").await.unwrap();

        assert!(fx.store.search("[draft").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sort_by_priority_is_stable() {
        let fx = fixture().await;
        fx.store.create("low", "low", "2025-01-01").await.unwrap();
        fx.store.create("high-1", "high", "2025-01-01").await.unwrap();
        fx.store.create("medium", "medium", "2025-01-01").await.unwrap();
        fx.store.create("high-2", "high", "2025-01-01").await.unwrap();

        let sorted = fx
            .store
            .sort_by(SortKey::Priority, SortDirection::Asc)
            .await
            .unwrap();

        assert_eq!(ids(&sorted), vec![2, 4, 3, 1]);
    }

    #[tokio::test]
    async fn test_sort_by_due_date_default_ascending() {
        let fx = fixture().await;
        fx.store.create("b", "low", "2025-10-01").await.unwrap();
        fx.store.create("a", "low", "2025-02-01").await.unwrap();

        let sorted = fx
            .store
            .sort_by(SortKey::DueDate, SortDirection::default())
            .await
            .unwrap();
        assert_eq!(ids(&sorted), vec![2, 1]);
    }
}

mod report_tests {
    use super::*;

    #[tokio::test]
    async fn test_overdue_report() {
        let fx = fixture().await;
        fx.store.create("shipped", "low", "2025-06-10").await.unwrap();
        fx.store.create("late", "low", "2025-06-01").await.unwrap();
        fx.store.create("upcoming", "low", "2025-06-20").await.unwrap();
        fx.store
            .update(1, &TaskUpdate::new().status("done"))
            .await
            .unwrap();

        let overdue = fx.store.overdue_report("2025-06-15").await.unwrap();
        assert_eq!(ids(&overdue), vec![2]);
    }

    #[tokio::test]
    async fn test_summary_of_empty_store() {
        let fx = fixture().await;

        let report = fx.store.summary_report().await.unwrap();
        assert_eq!(report.pending, 0);
        assert_eq!(report.in_progress, 0);
        assert_eq!(report.done, 0);
        assert_eq!(report.total, 0);
    }

    #[tokio::test]
    async fn test_summary_counts_out_of_band_status_in_total_only() {
        let fx = fixture_with(
            "1|A|pending|low|2025-01-01\n2|B|in-progress|low|2025-01-01\n3|C|archived|low|2025-01-01\n",
        )
        .await;

        let report = fx.store.summary_report().await.unwrap();
        assert_eq!(
            (report.pending, report.in_progress, report.done, report.total),
            (1, 1, 0, 3)
        );
    }

    #[tokio::test]
    async fn test_priority_report() {
        let fx = fixture().await;
        fx.store.create("m", "medium", "2025-01-01").await.unwrap();
        fx.store.create("h", "high", "2025-01-01").await.unwrap();
        fx.store.create("l", "low", "2025-01-01").await.unwrap();
        fx.store.create("h2", "high", "2025-01-01").await.unwrap();

        let report = fx.store.priority_report().await.unwrap();
        assert_eq!(ids(&report.high), vec![2, 4]);
        assert_eq!(ids(&report.medium), vec![1]);
        assert_eq!(ids(&report.low), vec![3]);

        let names: Vec<&str> = report.groups().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["high", "medium", "low"]);
    }
}

mod persistence_tests {
    use super::*;

    const MIXED: &str = "1|First|pending|high|2025-01-01\n\
                         this line is not a record\n\
                         2|Second|pending|low|2025-02-01\n\
                         3|too|few\n\
                         4|Fourth|done|medium|2025-03-01\n";

    #[tokio::test]
    async fn test_read_operations_skip_malformed_lines() {
        let fx = fixture_with(MIXED).await;

        assert_eq!(ids(&fx.store.list(None).await.unwrap()), vec![1, 2, 4]);

        let malformed = fx.store.malformed_lines().await.unwrap();
        let line_numbers: Vec<usize> = malformed.iter().map(|m| m.line).collect();
        assert_eq!(line_numbers, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_update_preserves_unrelated_malformed_lines() {
        let fx = fixture_with(MIXED).await;

        fx.store
            .update(2, &TaskUpdate::new().status("done"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&fx.path).unwrap();
        assert_eq!(
            content,
            "1|First|pending|high|2025-01-01\n\
             this line is not a record\n\
             2|Second|done|low|2025-02-01\n\
             3|too|few\n\
             4|Fourth|done|medium|2025-03-01\n"
        );
    }

    #[tokio::test]
    async fn test_delete_and_create_preserve_malformed_lines() {
        let fx = fixture_with(MIXED).await;

        fx.store.delete(1).await.unwrap();
        let created = fx.store.create("Fifth", "low", "2025-05-01").await.unwrap();
        assert_eq!(created.id, 5);

        let content = std::fs::read_to_string(&fx.path).unwrap();
        assert_eq!(
            content,
            "this line is not a record\n\
             2|Second|pending|low|2025-02-01\n\
             3|too|few\n\
             4|Fourth|done|medium|2025-03-01\n\
             5|Fifth|pending|low|2025-05-01\n"
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_skipped_and_kept() {
        let fx = fixture_with(
            b"1|A|pending|low|2025-01-01\n\
              2|B\xff\xfe|pending|low|2025-01-01\n\
              3|C|pending|high|2025-01-03\n",
        )
        .await;

        assert_eq!(ids(&fx.store.list(None).await.unwrap()), vec![1, 3]);
        let malformed = fx.store.malformed_lines().await.unwrap();
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].line, 2);

        fx.store
            .update(3, &TaskUpdate::new().status("done"))
            .await
            .unwrap();
        let created = fx.store.create("D", "low", "2025-01-04").await.unwrap();
        assert_eq!(created.id, 4);

        let content = std::fs::read(&fx.path).unwrap();
        assert_eq!(
            content,
            b"1|A|pending|low|2025-01-01\n\
              2|B\xff\xfe|pending|low|2025-01-01\n\
              3|C|done|high|2025-01-03\n\
              4|D|pending|low|2025-01-04\n"
                .to_vec()
        );
    }

    #[tokio::test]
    async fn test_titles_never_contain_delimiter() {
        let fx = fixture().await;
        fx.store
            .create("pipes | in | title", "low", "2025-01-01")
            .await
            .unwrap();
        fx.store
            .update(1, &TaskUpdate::new().title("still|no|pipes"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&fx.path).unwrap();
        assert_eq!(content, "1|stillnopipes|pending|low|2025-01-01\n");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let fx = fixture().await;
        fx.store.create("Write \"notes\"", "high", "2025-01-01").await.unwrap();
        fx.store.create("Review", "low", "2025-02-01").await.unwrap();

        let out = fx.path.with_file_name("export/tasks.csv");
        let rows = fx.store.export_csv(&out).await.unwrap();
        assert_eq!(rows, 2);

        let csv = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            csv,
            "ID,Title,Status,Priority,DueDate\n\
             \"1\",\"Write \"\"notes\"\"\",\"pending\",\"high\",\"2025-01-01\"\n\
             \"2\",\"Review\",\"pending\",\"low\",\"2025-02-01\"\n"
        );
        assert_eq!(fx.store.render_csv().await.unwrap(), csv);
    }
}
