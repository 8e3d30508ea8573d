//! Domain facades for task tracking.
//!
//! These facades provide high-level operations that combine
//! storage operations with validation and query logic.

mod config;
mod export;
mod tasks;

pub use config::{ConfigDomain, ConfigOverrides, CONFIG_DIR};
pub use export::render_csv;
pub use tasks::{sort_tasks, TaskStore};
