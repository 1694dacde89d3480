use crate::config::Config;
use crate::error::Result;
use crate::sheets::SheetsClient;
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum AuthProvider {
    /// Authenticate with Google Sheets
    Google,
}

impl AuthProvider {
    pub async fn execute(&self, reset: bool, refresh: bool) -> Result<()> {
        match self {
            AuthProvider::Google => authenticate_google(reset, refresh).await,
        }
    }
}

async fn authenticate_google(reset: bool, refresh: bool) -> Result<()> {
    let config = Config::load()?;
    let spreadsheet_id = &config.sheet.spreadsheet_id;

    let client = match (reset, refresh) {
        (true, _) => SheetsClient::reauthorize(&config.google, spreadsheet_id).await?,
        (false, true) => {
            let mut client = SheetsClient::new(&config.google, spreadsheet_id).await?;
            client.refresh_credential().await?;
            client
        }
        (false, false) => SheetsClient::new(&config.google, spreadsheet_id).await?,
    };

    let expires_at = client.credential().and_then(|c| c.expires_at);
    info!(
        ?expires_at,
        url = client.spreadsheet_url(),
        "Google Sheets authentication verified"
    );

    Ok(())
}
