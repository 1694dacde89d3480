mod auth;
mod log;
mod show;

use crate::config::Config;
use crate::error::Result;
use crate::sheets::SheetsClient;
use crate::timesheet::TimeSheet;
use clap::{Parser, Subcommand};

pub use auth::AuthProvider;
pub use log::LogArgs;
pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "timewriggler")]
#[command(about = "Log time entries to a Google Sheets timesheet", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Auth {
                provider,
                reset,
                refresh,
            } => provider.execute(*reset, *refresh).await,
            Commands::Show { resource } => resource.execute().await,
            Commands::Log(args) => args.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize access to the spreadsheet
    Auth {
        #[command(subcommand)]
        provider: AuthProvider,

        /// Discard cached tokens and authorize again
        #[arg(long, global = true)]
        reset: bool,

        /// Force a refresh of the cached access token
        #[arg(long, global = true, conflicts_with = "reset")]
        refresh: bool,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    /// Append a time entry
    Log(LogArgs),
}

/// Load the config and connect a timesheet to the configured spreadsheet
async fn open_timesheet() -> Result<TimeSheet<SheetsClient>> {
    let config = Config::load()?;
    let sheets_client = SheetsClient::new(&config.google, &config.sheet.spreadsheet_id).await?;
    Ok(TimeSheet::new(config.sheet, sheets_client))
}
