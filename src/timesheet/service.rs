use crate::config::SheetConfig;
use crate::error::{AppError, Result};
use crate::models::{FromSheetRows, ProjectList, ProjectTask, TimeEntry, ToSheetRows};
use crate::sheets::SheetOperations;
use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use indicatif::ProgressStyle;
use tracing::{Span, debug, info, instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Project and time entry access over the configured ranges of one spreadsheet.
pub struct TimeSheet<SC> {
    config: SheetConfig,
    sheets_client: SC,
}

impl<SC> TimeSheet<SC>
where
    SC: SheetOperations + Sync,
{
    pub fn new(config: SheetConfig, sheets_client: SC) -> Self {
        Self {
            config,
            sheets_client,
        }
    }

    pub fn date_format(&self) -> &str {
        &self.config.date_format
    }

    #[instrument(name = "Listing projects", skip_all)]
    pub async fn list_projects(&self) -> Result<ProjectList> {
        let rows = self
            .sheets_client
            .read_range(&self.config.project_range)
            .await?;
        let projects = ProjectList::from_sheet_rows(&rows);

        debug!(
            projects = projects.projects.len(),
            tasks = projects.tasks.len(),
            "Read projects"
        );

        Ok(projects)
    }

    pub async fn list_project_task_combinations(&self) -> Result<Vec<ProjectTask>> {
        Ok(self.list_projects().await?.combinations())
    }

    #[instrument(name = "Listing time entries", skip_all)]
    pub async fn list_time_entries(&self) -> Result<Vec<TimeEntry>> {
        let rows = self.sheets_client.read_range(&self.config.time_range).await?;
        TimeEntry::from_sheet_rows(&rows, &self.config.date_format)
    }

    /// Append entries as user-entered values so the sheet applies its own type coercion.
    #[instrument(name = "Appending time entries", skip_all, fields(count = entries.len()))]
    pub async fn append_time_entries(&self, entries: &[TimeEntry]) -> Result<Vec<Vec<String>>> {
        let span = Span::current();
        span.pb_set_style(
            &ProgressStyle::with_template("{spinner} {span_name} {msg}")
                .map_err(|e| AppError::Other(e.into()))?,
        );
        span.pb_set_message(&self.config.time_range);

        let rows = entries.to_sheet_rows(&self.config.date_format)?;
        let echoed = self
            .sheets_client
            .append_range(&self.config.time_range, rows)
            .await?;

        info!(rows = entries.len(), "Appended time entries");

        Ok(echoed)
    }

    /// Date of the most recent entry, else `default`, else the last day of the previous month.
    pub async fn last_entered_date(
        &self,
        default: Option<NaiveDateTime>,
    ) -> Result<NaiveDateTime> {
        self.last_entered_date_on(default, Local::now().date_naive())
            .await
    }

    async fn last_entered_date_on(
        &self,
        default: Option<NaiveDateTime>,
        today: NaiveDate,
    ) -> Result<NaiveDateTime> {
        let entries = self.list_time_entries().await?;

        let date = match (entries.last(), default) {
            (Some(entry), _) => entry.date,
            (None, Some(default)) => default,
            (None, None) => last_day_of_previous_month(today).and_time(NaiveTime::MIN),
        };

        Ok(date)
    }
}

fn last_day_of_previous_month(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.day()))
}
