use super::open_timesheet;
use crate::config::Config;
use crate::error::Result;
use crate::models::time_entry::parse_sheet_date;
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration and cache paths
    Paths,
    /// Show project and task names
    Projects,
    /// Show numbered project | task combinations
    Combinations,
    /// Show logged time entries
    Entries,
    /// Show the date of the most recent time entry
    LastDate {
        /// Fallback date, in the sheet date format, when no entries exist
        #[arg(long)]
        default: Option<String>,
    },
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
            ShowResource::Projects => show_projects().await,
            ShowResource::Combinations => show_combinations().await,
            ShowResource::Entries => show_entries().await,
            ShowResource::LastDate { default } => show_last_date(default.as_deref()).await,
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let cache_dir = Config::cache_dir()?;
    let google = Config::load()
        .map(|config| config.google)
        .unwrap_or_default();

    let secrets_path = google.credentials_path()?;
    let token_path = google.token_path()?;

    info!(path = ?config_path, "Config path");
    info!(path = ?cache_dir, "Cache path");
    info!(path = ?secrets_path, "Client secrets path");
    info!(path = ?token_path, "Token path");

    Ok(())
}

async fn show_projects() -> Result<()> {
    let projects = open_timesheet().await?.list_projects().await?;

    for project in &projects.projects {
        info!(project = %project, "Project");
    }
    for task in &projects.tasks {
        info!(task = %task, "Task");
    }

    Ok(())
}

async fn show_combinations() -> Result<()> {
    let combinations = open_timesheet().await?.list_project_task_combinations().await?;

    for combination in &combinations {
        info!(id = combination.id, label = %combination.label, "Combination");
    }

    Ok(())
}

async fn show_entries() -> Result<()> {
    let entries = open_timesheet().await?.list_time_entries().await?;

    for entry in &entries {
        info!(
            date = %entry.date,
            project = %entry.project,
            task = %entry.task,
            value = %entry.value,
            "Entry"
        );
    }

    Ok(())
}

async fn show_last_date(default: Option<&str>) -> Result<()> {
    let timesheet = open_timesheet().await?;
    let default = default
        .map(|date| parse_sheet_date(date, timesheet.date_format()))
        .transpose()?;

    let date = timesheet.last_entered_date(default).await?;
    info!(date = %date, "Last entered date");

    Ok(())
}
