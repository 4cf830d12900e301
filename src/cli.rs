use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, ApiError, TaskService};
use crate::models::{Priority, TaskInput};
use crate::utils::parse_date;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Terminal dashboard for a remote task service")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config and log file)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a new task without entering the TUI
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    ApiError(#[from] ApiError),
    #[error("Task title is required")]
    EmptyTitle,
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Unknown priority: {0} (expected low, medium or high)")]
    PriorityParseError(String),
}

/// Route tracing output to a log file in the data directory. The TUI owns
/// the terminal, so nothing may write to stdout/stderr while it runs.
pub fn init_tracing(data_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_file = File::create(data_dir.join("taskdeck.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

pub fn parse_priority(value: &str) -> Result<Priority, CliError> {
    match value {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(CliError::PriorityParseError(other.to_string())),
    }
}

/// Handle the add command: create a task against the remote service and
/// print the assigned id.
pub fn handle_add(
    title: String,
    description: Option<String>,
    due: Option<String>,
    priority: String,
    client: &ApiClient,
) -> Result<(), CliError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(CliError::EmptyTitle);
    }

    let due_date = match due {
        Some(due_str) => Some(parse_date(&due_str).map_err(|e| {
            CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e))
        })?),
        None => None,
    };

    let input = TaskInput {
        title,
        description: description.unwrap_or_default(),
        priority: parse_priority(&priority)?,
        due_date,
    };

    let task = client.create(&input)?;
    println!("Task created successfully (ID: {})", task.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_known_levels_only() {
        assert_eq!(parse_priority("low").unwrap(), Priority::Low);
        assert_eq!(parse_priority("high").unwrap(), Priority::High);
        assert!(parse_priority("urgent").is_err());
    }
}
