//! Interactive prompts for the menu loop.
//!
//! Every field prompt validates with the same functions the store uses, so
//! invalid input re-prompts the field instead of reaching the store.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::entities::{
    sanitize_title, validate_due_date, SortDirection, SortKey, TaskFilter, TaskPriority,
    TaskStatus, TaskUpdate,
};

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    List,
    Filter,
    View,
    Update,
    Delete,
    Search,
    Sort,
    Reports,
    Export,
    Quit,
}

impl MenuAction {
    pub const ALL: [Self; 11] = [
        Self::Add,
        Self::List,
        Self::Filter,
        Self::View,
        Self::Update,
        Self::Delete,
        Self::Search,
        Self::Sort,
        Self::Reports,
        Self::Export,
        Self::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add task",
            Self::List => "List tasks",
            Self::Filter => "Filter tasks",
            Self::View => "View task",
            Self::Update => "Update task",
            Self::Delete => "Delete task",
            Self::Search => "Search titles",
            Self::Sort => "Sort tasks",
            Self::Reports => "Reports",
            Self::Export => "Export to CSV",
            Self::Quit => "Quit",
        }
    }
}

/// Reports offered from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Overdue,
    Priority,
}

/// Field values for a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskInput {
    pub title: String,
    pub priority: String,
    pub due_date: String,
}

const PRIORITIES: [&str; 3] = ["high", "medium", "low"];
const STATUSES: [&str; 3] = ["pending", "in-progress", "done"];

/// Terminal prompts with a shared theme
pub struct Prompter {
    theme: ColorfulTheme,
    delimiter: char,
}

impl Prompter {
    pub fn new(delimiter: char) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            delimiter,
        }
    }

    /// Main menu selection
    pub fn menu(&self) -> dialoguer::Result<MenuAction> {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        let idx = Select::with_theme(&self.theme)
            .with_prompt("What would you like to do?")
            .default(0)
            .items(&labels)
            .interact()?;
        Ok(MenuAction::ALL[idx])
    }

    /// Title, priority and due date for a new task
    pub fn new_task(&self) -> dialoguer::Result<NewTaskInput> {
        let title = self.title()?;
        let idx = Select::with_theme(&self.theme)
            .with_prompt("Priority")
            .default(1)
            .items(&PRIORITIES)
            .interact()?;
        let due_date = self.due_date("Due date (YYYY-MM-DD)")?;

        Ok(NewTaskInput {
            title,
            priority: PRIORITIES[idx].to_string(),
            due_date,
        })
    }

    /// Partial update; empty answers keep the current value
    pub fn task_update(&self) -> dialoguer::Result<TaskUpdate> {
        let delimiter = self.delimiter;
        let mut update = TaskUpdate::new();

        let title: String = Input::with_theme(&self.theme)
            .with_prompt("New title (empty to keep)")
            .allow_empty(true)
            .validate_with(move |input: &String| -> Result<(), String> {
                if input.is_empty() {
                    return Ok(());
                }
                sanitize_title(input, delimiter)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        if !title.is_empty() {
            update = update.title(title);
        }

        let status: String = Input::with_theme(&self.theme)
            .with_prompt("New status: pending, in-progress, done (empty to keep)")
            .allow_empty(true)
            .validate_with(move |input: &String| -> Result<(), String> {
                if input.is_empty() {
                    return Ok(());
                }
                input
                    .parse::<TaskStatus>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        if !status.is_empty() {
            update = update.status(status);
        }

        let priority: String = Input::with_theme(&self.theme)
            .with_prompt("New priority: high, medium, low (empty to keep)")
            .allow_empty(true)
            .validate_with(move |input: &String| -> Result<(), String> {
                if input.is_empty() {
                    return Ok(());
                }
                input
                    .parse::<TaskPriority>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        if !priority.is_empty() {
            update = update.priority(priority);
        }

        let due_date: String = Input::with_theme(&self.theme)
            .with_prompt("New due date YYYY-MM-DD (empty to keep)")
            .allow_empty(true)
            .validate_with(move |input: &String| -> Result<(), String> {
                if input.is_empty() {
                    return Ok(());
                }
                validate_due_date(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        if !due_date.is_empty() {
            update = update.due_date(due_date);
        }

        Ok(update)
    }

    /// Task id
    pub fn task_id(&self) -> dialoguer::Result<u64> {
        Input::<u64>::with_theme(&self.theme)
            .with_prompt("Task ID")
            .interact_text()
    }

    /// Non-empty search pattern
    pub fn pattern(&self) -> dialoguer::Result<String> {
        Input::with_theme(&self.theme)
            .with_prompt("Search pattern (regex, case-insensitive)")
            .validate_with(move |input: &String| -> Result<(), String> {
                if input.is_empty() {
                    Err("pattern must not be empty".to_string())
                } else {
                    Ok(())
                }
            })
            .interact_text()
    }

    /// Field and value to filter on
    pub fn filter(&self) -> dialoguer::Result<TaskFilter> {
        let field = Select::with_theme(&self.theme)
            .with_prompt("Filter by")
            .default(0)
            .items(&["status", "priority"])
            .interact()?;

        if field == 0 {
            let idx = Select::with_theme(&self.theme)
                .with_prompt("Status")
                .default(0)
                .items(&STATUSES)
                .interact()?;
            Ok(TaskFilter::status(STATUSES[idx]))
        } else {
            let idx = Select::with_theme(&self.theme)
                .with_prompt("Priority")
                .default(0)
                .items(&PRIORITIES)
                .interact()?;
            Ok(TaskFilter::priority(PRIORITIES[idx]))
        }
    }

    /// Sort key, and direction when the key supports one
    pub fn sort(&self) -> dialoguer::Result<(SortKey, SortDirection)> {
        let keys = [SortKey::DueDate, SortKey::Priority, SortKey::Status];
        let labels = ["due date", "priority", "status"];
        let idx = Select::with_theme(&self.theme)
            .with_prompt("Sort by")
            .default(0)
            .items(&labels)
            .interact()?;
        let key = keys[idx];

        let direction = if key == SortKey::DueDate {
            let dir = Select::with_theme(&self.theme)
                .with_prompt("Direction")
                .default(0)
                .items(&["ascending", "descending"])
                .interact()?;
            if dir == 0 {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            }
        } else {
            SortDirection::Asc
        };

        Ok((key, direction))
    }

    /// Which report to show
    pub fn report(&self) -> dialoguer::Result<ReportKind> {
        let idx = Select::with_theme(&self.theme)
            .with_prompt("Report")
            .default(0)
            .items(&["Summary by status", "Overdue tasks", "Tasks by priority"])
            .interact()?;
        Ok(match idx {
            1 => ReportKind::Overdue,
            2 => ReportKind::Priority,
            _ => ReportKind::Summary,
        })
    }

    /// Yes/no confirmation
    pub fn confirm(&self, prompt: &str) -> dialoguer::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
    }

    fn title(&self) -> dialoguer::Result<String> {
        let delimiter = self.delimiter;
        Input::with_theme(&self.theme)
            .with_prompt("Title")
            .validate_with(move |input: &String| -> Result<(), String> {
                sanitize_title(input, delimiter)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
    }

    fn due_date(&self, prompt: &str) -> dialoguer::Result<String> {
        Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(move |input: &String| -> Result<(), String> {
                validate_due_date(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_are_unique() {
        let mut labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MenuAction::ALL.len());
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Quit));
    }

    #[test]
    fn test_choice_lists_parse() {
        for p in PRIORITIES {
            assert!(p.parse::<TaskPriority>().is_ok());
        }
        for s in STATUSES {
            assert!(s.parse::<TaskStatus>().is_ok());
        }
    }
}
