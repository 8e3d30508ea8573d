//! Terminal UI helpers for task display.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

pub mod prompt;

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::entities::{PriorityReport, SummaryReport, Task, TaskPriority, TaskStatus};
use crate::storage::MalformedLine;

/// Get colored status string
pub fn status_colored(status: &TaskStatus) -> String {
    match status {
        TaskStatus::Pending => "pending".yellow().to_string(),
        TaskStatus::InProgress => "in-progress".cyan().to_string(),
        TaskStatus::Done => "done".green().to_string(),
        TaskStatus::Unrecognized(raw) => raw.dimmed().to_string(),
    }
}

/// Get colored priority string
pub fn priority_colored(priority: &TaskPriority) -> String {
    match priority {
        TaskPriority::High => "high".red().bold().to_string(),
        TaskPriority::Medium => "medium".yellow().to_string(),
        TaskPriority::Low => "low".green().to_string(),
        TaskPriority::Unrecognized(raw) => raw.dimmed().to_string(),
    }
}

fn status_color(status: &TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Done => Color::Green,
        TaskStatus::Unrecognized(_) => Color::DarkGrey,
    }
}

fn priority_color(priority: &TaskPriority) -> Color {
    match priority {
        TaskPriority::High => Color::Red,
        TaskPriority::Medium => Color::Yellow,
        TaskPriority::Low => Color::Green,
        TaskPriority::Unrecognized(_) => Color::DarkGrey,
    }
}

/// Create a table for displaying tasks
///
/// When `today` is given, due dates of overdue tasks are highlighted.
pub fn task_table(tasks: &[Task], today: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    // Header
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Due").fg(Color::Cyan),
    ]);

    for task in tasks {
        let overdue = today.is_some_and(|today| task.is_overdue(today));
        let due = if overdue {
            Cell::new(&task.due_date).fg(Color::Red)
        } else {
            Cell::new(&task.due_date)
        };

        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.title),
            Cell::new(task.status.to_string()).fg(status_color(&task.status)),
            Cell::new(task.priority.to_string()).fg(priority_color(&task.priority)),
            due,
        ]);
    }

    table
}

/// Create a table for the status summary
pub fn summary_table(report: &SummaryReport) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Tasks").fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("pending").fg(Color::Yellow),
        Cell::new(report.pending),
    ]);
    table.add_row(vec![
        Cell::new("in-progress").fg(Color::Cyan),
        Cell::new(report.in_progress),
    ]);
    table.add_row(vec![
        Cell::new("done").fg(Color::Green),
        Cell::new(report.done),
    ]);
    table.add_row(vec![Cell::new("total"), Cell::new(report.total)]);

    table
}

/// Create a table listing unreadable lines of the data file
pub fn malformed_table(lines: &[MalformedLine]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Line").fg(Color::Cyan),
        Cell::new("Problem").fg(Color::Cyan),
        Cell::new("Content").fg(Color::Cyan),
    ]);

    for line in lines {
        table.add_row(vec![
            Cell::new(line.line),
            Cell::new(&line.reason).fg(Color::Red),
            Cell::new(&line.raw).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Print a task list, or a note when it is empty
pub fn display_tasks(tasks: &[Task], today: Option<&str>) {
    if tasks.is_empty() {
        print_info("No tasks found");
    } else {
        println!("{}", task_table(tasks, today));
        print_info(&format!("{} task(s)", tasks.len()));
    }
}

/// Display the status summary
pub fn display_summary(report: &SummaryReport) {
    println!("{}", "Summary".bold().underline());
    println!("{}", summary_table(report));
    if report.total > 0 {
        print_info(&format!("{:.0}% done", report.completion_percent()));
    }
}

/// Display tasks grouped by priority
pub fn display_priority_report(report: &PriorityReport, today: Option<&str>) {
    for (name, tasks) in report.groups() {
        println!(
            "{} ({})",
            priority_colored(&TaskPriority::from_stored(name)),
            tasks.len()
        );
        if !tasks.is_empty() {
            println!("{}", task_table(tasks, today));
        }
        println!();
    }
}

/// Display task details in a formatted way
pub fn display_task_details(task: &Task, today: Option<&str>) {
    println!("{}", "═".repeat(60).dimmed());
    println!(
        "{} {} {}",
        "Task".cyan().bold(),
        task.id.to_string().cyan().bold(),
        format!("[{}]", task.status).yellow()
    );
    println!("{}", "═".repeat(60).dimmed());
    println!();

    println!("{}: {}", "Title".bold(), task.title);
    println!("{}: {}", "Status".bold(), status_colored(&task.status));
    println!(
        "{}: {}",
        "Priority".bold(),
        priority_colored(&task.priority)
    );

    let overdue = today.is_some_and(|today| task.is_overdue(today));
    if overdue {
        println!(
            "{}: {} {}",
            "Due".bold(),
            task.due_date.red(),
            "(overdue)".red()
        );
    } else {
        println!("{}: {}", "Due".bold(), task.due_date);
    }

    println!();
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_table_has_a_row_per_task() {
        let tasks = vec![
            Task::new(1, "A", TaskPriority::High, "2025-01-01"),
            Task::new(2, "B", TaskPriority::Low, "2025-02-01"),
        ];
        let rendered = task_table(&tasks, Some("2025-01-15")).to_string();
        assert!(rendered.contains("Due"));
        assert!(rendered.contains("2025-02-01"));
        assert_eq!(task_table(&tasks, None).row_count(), 2);
    }

    #[test]
    fn test_summary_table_lists_total() {
        let report = SummaryReport {
            pending: 2,
            in_progress: 1,
            done: 0,
            total: 3,
        };
        let rendered = summary_table(&report).to_string();
        assert!(rendered.contains("total"));
        assert!(rendered.contains('3'));
    }
}
