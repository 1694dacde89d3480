use super::SheetOperations;
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::sheets::auth::{
    AuthType, Credential, clear_tokens, create_authenticator, fetch_credential,
    refresh_credential,
};
use async_trait::async_trait;
use google_sheets4::api::{Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use tracing::{debug, instrument};

// Read and write access to the user's spreadsheets
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

type HubType = Sheets<HttpsConnector<HttpConnector>>;

pub struct SheetsClient {
    hub: HubType,
    auth: AuthType,
    spreadsheet_id: String,
    credential: Option<Credential>,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(config: &GoogleConfig, spreadsheet_id: &str) -> Result<Self> {
        let mut client = Self::connect(config, spreadsheet_id).await?;
        client.get_credential().await?;
        Ok(client)
    }

    /// Create a client without requesting a token yet
    async fn connect(config: &GoogleConfig, spreadsheet_id: &str) -> Result<Self> {
        let auth = create_authenticator(config).await?;
        let hub = Self::build_hub(auth.clone())?;

        Ok(Self {
            hub,
            auth,
            spreadsheet_id: spreadsheet_id.to_string(),
            credential: None,
        })
    }

    fn build_hub(auth: AuthType) -> Result<HubType> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Transport(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Sheets::new(client, auth))
    }

    pub fn spreadsheet_url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}", self.spreadsheet_id)
    }

    /// The credential obtained by the last successful token request
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Return a valid credential, acquiring it interactively or refreshing as needed
    pub async fn get_credential(&mut self) -> Result<Credential> {
        let credential = fetch_credential(&self.auth).await?;
        self.credential = Some(credential.clone());
        Ok(credential)
    }

    /// Force a refresh with the stored refresh token
    #[instrument(name = "Refreshing Google credential", skip_all)]
    pub async fn refresh_credential(&mut self) -> Result<Credential> {
        let credential = refresh_credential(&self.auth).await?;
        self.credential = Some(credential.clone());
        Ok(credential)
    }

    /// Discard cached tokens and run the interactive authorization flow again
    #[instrument(name = "Reauthorizing Google Sheets", skip_all)]
    pub async fn reauthorize(config: &GoogleConfig, spreadsheet_id: &str) -> Result<Self> {
        let mut client = Self::connect_without_tokens(config, spreadsheet_id).await?;
        client.get_credential().await?;
        Ok(client)
    }

    /// The token file is removed before the authenticator loads it, so an
    /// unreadable file cannot block a reset.
    async fn connect_without_tokens(config: &GoogleConfig, spreadsheet_id: &str) -> Result<Self> {
        clear_tokens(config)?;
        Self::connect(config, spreadsheet_id).await
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Reading range", skip(self))]
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, range)
            .major_dimension("ROWS")
            .value_render_option("FORMATTED_VALUE")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read range '{}': {}", range, e)))?;

        let rows = rows_from_values(response.values);
        debug!(rows = rows.len(), "Read rows");
        Ok(rows)
    }

    #[instrument(name = "Appending to range", skip(self, rows))]
    async fn append_range(&self, range: &str, rows: Vec<Vec<String>>) -> Result<Vec<Vec<String>>> {
        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(range.to_string()),
            values: Some(values_from_rows(rows)),
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(value_range, &self.spreadsheet_id, range)
            .value_input_option("USER_ENTERED")
            .include_values_in_response(true)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| {
                AppError::Transport(format!("Failed to append to range '{}': {}", range, e))
            })?;

        let echoed = response
            .updates
            .and_then(|updates| updates.updated_data)
            .and_then(|data| data.values);

        Ok(rows_from_values(echoed))
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Values are Option<Vec<Vec<serde_json::Value>>>
fn rows_from_values(values: Option<Vec<Vec<Value>>>) -> Vec<Vec<String>> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect()
}

fn values_from_rows(rows: Vec<Vec<String>>) -> Vec<Vec<Value>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(Value::String).collect())
        .collect()
}
