//! Tracker CLI - flat-file task tracking from the terminal.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::disallowed_macros)]
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use tracker::domain::{ConfigDomain, ConfigOverrides, TaskStore};
use tracker::entities::{SortDirection, SortKey, TaskFilter, TaskUpdate, TrackerConfig};
use tracker::errors::TasksError;
use tracker::storage::FileStorage;
use tracker::ui;
use tracker::ui::prompt::{MenuAction, Prompter, ReportKind};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Flat-file task tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Data file holding the tasks
    #[arg(long, global = true, env = "TRACKER_FILE")]
    file: Option<PathBuf>,

    /// Destination of CSV exports
    #[arg(long, global = true, env = "TRACKER_EXPORT")]
    export_file: Option<PathBuf>,

    /// Field delimiter of the data file
    #[arg(long, global = true)]
    delimiter: Option<char>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Add a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Priority (high, medium, low)
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,
    },

    /// List tasks in file order
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(short, long, conflicts_with = "status")]
        priority: Option<String>,
    },

    /// Show details of a specific task
    Show {
        /// Task ID
        id: u64,
    },

    /// Update fields of a task
    Update {
        /// Task ID
        id: u64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New status (pending, in-progress, done)
        #[arg(short, long)]
        status: Option<String>,

        /// New priority (high, medium, low)
        #[arg(short, long)]
        priority: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u64,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Search titles with a case-insensitive regex
    Search {
        /// Pattern
        pattern: String,
    },

    /// Sort tasks by due_date, priority or status
    Sort {
        /// Sort key
        key: String,

        /// Descending order (due_date only)
        #[arg(long)]
        desc: bool,
    },

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export tasks to CSV
    Export {
        /// Output file (defaults to the configured export file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List lines of the data file that could not be read
    Check,

    /// Write the configuration file and create an empty data file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Count of tasks per status
    Summary {
        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open tasks past their due date
    Overdue {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },

    /// Tasks grouped by priority
    Priority,
}

fn get_project_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn local_today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project_path = get_project_path(cli.project);
    let config_domain = ConfigDomain::new(&project_path);
    let config = config_domain
        .resolve(ConfigOverrides {
            data_file: cli.file,
            export_file: cli.export_file,
            delimiter: cli.delimiter,
        })
        .await?;

    let storage = Arc::new(FileStorage::new(&config.data_file, config.delimiter));
    let store = TaskStore::new(storage);
    let today = local_today();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => run_menu(&store, &config, &today).await?,

        Commands::Add {
            title,
            priority,
            due,
        } => {
            let task = store.create(&title, &priority, &due).await?;
            ui::print_success(&format!("Created task {} - {}", task.id, task.title));
        }

        Commands::List { status, priority } => {
            let filter = match (status, priority) {
                (Some(s), _) => Some(TaskFilter::status(s)),
                (None, Some(p)) => Some(TaskFilter::priority(p)),
                (None, None) => None,
            };
            let tasks = store.list(filter.as_ref()).await?;
            ui::display_tasks(&tasks, Some(&today));
        }

        Commands::Show { id } => {
            let task = store.get(id).await?;
            ui::display_task_details(&task, Some(&today));
        }

        Commands::Update {
            id,
            title,
            status,
            priority,
            due,
        } => {
            let fields = TaskUpdate {
                title,
                status,
                priority,
                due_date: due,
            };
            if fields.is_empty() {
                ui::print_warning("Nothing to update; pass --title, --status, --priority or --due");
                return Ok(());
            }
            let task = store.update(id, &fields).await?;
            ui::print_success(&format!("Updated task {}", task.id));
            ui::display_task_details(&task, Some(&today));
        }

        Commands::Delete { id, yes } => {
            if !yes {
                ui::print_warning(&format!("About to delete task {id}. Use --yes to confirm."));
                return Ok(());
            }
            store.delete(id).await?;
            ui::print_success(&format!("Deleted task {id}"));
        }

        Commands::Search { pattern } => {
            let tasks = store.search(&pattern).await?;
            ui::display_tasks(&tasks, Some(&today));
        }

        Commands::Sort { key, desc } => {
            let key: SortKey = key.parse()?;
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let tasks = store.sort_by(key, direction).await?;
            ui::display_tasks(&tasks, Some(&today));
        }

        Commands::Report(report_cmd) => match report_cmd {
            ReportCommands::Summary { json } => {
                let report = store.summary_report().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    ui::display_summary(&report);
                }
            }
            ReportCommands::Overdue { today: reference } => {
                let reference = reference.unwrap_or_else(|| today.clone());
                let tasks = store.overdue_report(&reference).await?;
                ui::display_tasks(&tasks, Some(&reference));
            }
            ReportCommands::Priority => {
                let report = store.priority_report().await?;
                ui::display_priority_report(&report, Some(&today));
            }
        },

        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| config.export_file.clone());
            let rows = store.export_csv(&path).await?;
            ui::print_success(&format!("Exported {} task(s) to {}", rows, path.display()));
        }

        Commands::Check => {
            let lines = store.malformed_lines().await?;
            if lines.is_empty() {
                ui::print_success(&format!(
                    "All lines of {} are readable",
                    config.data_file.display()
                ));
            } else {
                println!("{}", ui::malformed_table(&lines));
                ui::print_warning(&format!(
                    "{} unreadable line(s); they are kept as-is when the file is rewritten",
                    lines.len()
                ));
            }
        }

        Commands::Init { force } => {
            let config_path = config_domain.config_path();
            if config_path.exists() && !force {
                ui::print_warning(&format!(
                    "{} already exists. Use --force to overwrite.",
                    config_path.display()
                ));
            } else {
                config_domain.save(&TrackerConfig::default()).await?;
                ui::print_success(&format!("Wrote {}", config_path.display()));
            }

            if store.is_initialized().await? {
                ui::print_info(&format!("Using existing {}", config.data_file.display()));
            } else {
                store.init().await?;
                ui::print_success(&format!("Created {}", config.data_file.display()));
            }
        }
    }

    Ok(())
}

/// Menu loop; only Quit (or a closed terminal) leaves it
async fn run_menu(store: &TaskStore, config: &TrackerConfig, today: &str) -> Result<()> {
    store.init().await?;
    let prompter = Prompter::new(store.delimiter());

    ui::print_info(&format!("Using {}", config.data_file.display()));

    loop {
        println!();
        let action = match prompter.menu() {
            Ok(action) => action,
            Err(e) => {
                debug!(error = %e, "Menu prompt closed");
                break;
            }
        };

        if action == MenuAction::Quit {
            break;
        }

        if let Err(e) = menu_action(store, &prompter, action, config, today).await {
            match e.downcast_ref::<TasksError>() {
                Some(err) if err.is_not_found() => ui::print_warning(&err.to_string()),
                Some(err) => ui::print_error(&err.to_string()),
                None => {
                    debug!(error = %e, "Prompt closed");
                    break;
                }
            }
        }
    }

    ui::print_info("Goodbye");
    Ok(())
}

async fn menu_action(
    store: &TaskStore,
    prompter: &Prompter,
    action: MenuAction,
    config: &TrackerConfig,
    today: &str,
) -> Result<()> {
    match action {
        MenuAction::Add => {
            let input = prompter.new_task()?;
            let task = store
                .create(&input.title, &input.priority, &input.due_date)
                .await?;
            ui::print_success(&format!("Created task {} - {}", task.id, task.title));
        }
        MenuAction::List => {
            let tasks = store.list(None).await?;
            ui::display_tasks(&tasks, Some(today));
        }
        MenuAction::Filter => {
            let filter = prompter.filter()?;
            let tasks = store.list(Some(&filter)).await?;
            ui::display_tasks(&tasks, Some(today));
        }
        MenuAction::View => {
            let id = prompter.task_id()?;
            let task = store.get(id).await?;
            ui::display_task_details(&task, Some(today));
        }
        MenuAction::Update => {
            let id = prompter.task_id()?;
            let current = store.get(id).await?;
            ui::display_task_details(&current, Some(today));

            let fields = prompter.task_update()?;
            if fields.is_empty() {
                ui::print_info("Nothing changed");
            } else {
                store.update(id, &fields).await?;
                ui::print_success(&format!("Updated task {id}"));
            }
        }
        MenuAction::Delete => {
            let id = prompter.task_id()?;
            let task = store.get(id).await?;
            if prompter.confirm(&format!("Delete task {} - {}?", task.id, task.title))? {
                store.delete(id).await?;
                ui::print_success(&format!("Deleted task {id}"));
            } else {
                ui::print_info("Kept");
            }
        }
        MenuAction::Search => {
            let pattern = prompter.pattern()?;
            let tasks = store.search(&pattern).await?;
            ui::display_tasks(&tasks, Some(today));
        }
        MenuAction::Sort => {
            let (key, direction) = prompter.sort()?;
            let tasks = store.sort_by(key, direction).await?;
            ui::display_tasks(&tasks, Some(today));
        }
        MenuAction::Reports => match prompter.report()? {
            ReportKind::Summary => {
                let report = store.summary_report().await?;
                ui::display_summary(&report);
            }
            ReportKind::Overdue => {
                let tasks = store.overdue_report(today).await?;
                ui::display_tasks(&tasks, Some(today));
            }
            ReportKind::Priority => {
                let report = store.priority_report().await?;
                ui::display_priority_report(&report, Some(today));
            }
        },
        MenuAction::Export => {
            let rows = store.export_csv(&config.export_file).await?;
            ui::print_success(&format!(
                "Exported {} task(s) to {}",
                rows,
                config.export_file.display()
            ));
        }
        MenuAction::Quit => {}
    }

    Ok(())
}
