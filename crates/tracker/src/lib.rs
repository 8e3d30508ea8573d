#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

//! # Tracker
//!
//! A single-user task tracker backed by a flat, delimited text file.
//!
//! This crate provides:
//! - Task records with id, title, status, priority and due date
//! - File storage that rewrites the whole file per change and keeps
//!   unreadable lines intact
//! - Filtering, regex search, sorting and status/overdue/priority reports
//! - CSV export
//! - A menu-driven terminal interface and one-shot CLI commands
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tracker::{FileStorage, TaskStore};
//!
//! let storage = Arc::new(FileStorage::new("tasks.txt", '|'));
//! let store = TaskStore::new(storage);
//!
//! let task = store.create("Write report", "high", "2025-06-30").await?;
//! let overdue = store.overdue_report("2025-07-01").await?;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Storage layer
pub mod storage;

// Domain facades
pub mod domain;

// Terminal UI helpers
pub mod ui;

// Re-export key types for convenience
pub use domain::{ConfigDomain, ConfigOverrides, TaskStore};
pub use entities::{
    PriorityReport, SortDirection, SortKey, SummaryReport, Task, TaskFilter, TaskPriority,
    TaskStatus, TaskUpdate, TrackerConfig,
};
pub use errors::{TasksError, TasksResult};
pub use storage::{FileStorage, Storage};
