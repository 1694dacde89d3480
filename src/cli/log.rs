use super::open_timesheet;
use crate::error::{AppError, Result};
use crate::models::time_entry::{format_sheet_date, parse_sheet_date};
use crate::models::{ProjectTask, TimeEntry};
use chrono::Days;
use clap::Args;
use dialoguer::{Input, Select};
use tracing::info;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Entry date in the sheet date format, prompted when omitted
    #[arg(long)]
    pub date: Option<String>,

    /// Combination id from `show combinations`, prompted when omitted
    #[arg(long)]
    pub combination: Option<usize>,

    /// Duration or note, prompted when omitted
    #[arg(long)]
    pub value: Option<String>,
}

impl LogArgs {
    pub async fn execute(&self) -> Result<()> {
        let timesheet = open_timesheet().await?;
        let date_format = timesheet.date_format().to_string();

        let combinations = timesheet.list_project_task_combinations().await?;
        if combinations.is_empty() {
            return Err(AppError::Config(
                "No project/task combinations found in the projects range".to_string(),
            ));
        }

        let combination = match self.combination {
            Some(id) => combinations
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::Config(format!("Unknown combination id {}", id)))?,
            None => select_combination(&combinations)?,
        };

        let date = match &self.date {
            Some(date) => parse_sheet_date(date, &date_format)?,
            None => {
                let next_date = timesheet.last_entered_date(None).await? + Days::new(1);
                let input = prompt("Date", Some(format_sheet_date(&next_date, &date_format)?))?;
                parse_sheet_date(&input, &date_format)?
            }
        };

        let value = match &self.value {
            Some(value) => value.clone(),
            None => prompt("Duration or note", None)?,
        };

        let entry = TimeEntry::new(date, &combination.project, &combination.task, value);
        let echoed = timesheet.append_time_entries(&[entry]).await?;

        info!(
            combination = %combination.label,
            rows = echoed.len(),
            "Time entry logged"
        );

        Ok(())
    }
}

fn select_combination(combinations: &[ProjectTask]) -> Result<&ProjectTask> {
    let index = Select::new()
        .with_prompt("Project | Task")
        .items(combinations)
        .default(0)
        .interact()
        .map_err(|e| AppError::Other(e.into()))?;

    combinations
        .get(index)
        .ok_or_else(|| AppError::Config(format!("No combination at index {}", index)))
}

fn prompt(label: &str, default: Option<String>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(label);
    if let Some(default) = default {
        input = input.default(default);
    }

    input.interact_text().map_err(|e| AppError::Other(e.into()))
}
