use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use crate::sheets::storage::TokenFile;
use chrono::{DateTime, Utc};
use hyper_util::client::legacy::connect::HttpConnector;
use std::fmt;
use std::fs;
use tracing::debug;
use tracing::instrument;
use yup_oauth2::{
    AccessToken, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
    authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

pub(super) type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Access token handed out by the authenticator.
#[derive(Clone, PartialEq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TryFrom<AccessToken> for Credential {
    type Error = AppError;

    fn try_from(token: AccessToken) -> Result<Self> {
        let access_token = token
            .token()
            .ok_or_else(|| AppError::Auth("Authenticator returned an empty token".to_string()))?
            .to_string();

        let expires_at = token
            .expiration_time()
            .and_then(|expiry| DateTime::from_timestamp(expiry.unix_timestamp(), 0));

        Ok(Self {
            access_token,
            expires_at,
        })
    }
}

/// Build an installed-flow authenticator from the client secrets file.
///
/// No token is requested here, so the interactive flow only runs on the first
/// call that needs one.
pub(super) async fn create_authenticator(config: &GoogleConfig) -> Result<AuthType> {
    let secrets_path = config.credentials_path()?;
    if !secrets_path.exists() {
        return Err(AppError::Auth(format!(
            "Client secrets file not found at {:?}",
            secrets_path
        )));
    }

    let secret = yup_oauth2::read_application_secret(&secrets_path)
        .await
        .map_err(|e| AppError::Auth(format!("Failed to read client secrets: {}", e)))?;

    let storage = TokenFile::load(config.token_path()?)?;

    // Consent is granted in the browser and redirected to a local listener
    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .with_storage(Box::new(storage))
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    Ok(auth)
}

/// Return a valid token, refreshing or running the interactive flow as needed.
pub(super) async fn fetch_credential(auth: &AuthType) -> Result<Credential> {
    let token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Credential::try_from(token)
}

/// Exchange the stored refresh token for a new access token.
pub(super) async fn refresh_credential(auth: &AuthType) -> Result<Credential> {
    let token = auth
        .force_refreshed_token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to refresh token: {}", e)))?;

    Credential::try_from(token)
}

/// Clear cached Google tokens by deleting the token cache file
#[instrument(name = "Clearing auth tokens for Google Sheets", skip_all)]
pub fn clear_tokens(config: &GoogleConfig) -> Result<()> {
    let token_path = config.token_path()?;

    if !token_path.exists() {
        debug!("No Google Sheets tokens to clear");
        return Ok(());
    }

    fs::remove_file(&token_path)
        .map_err(|e| AppError::Auth(format!("Failed to delete tokens file: {}", e)))?;
    debug!("Cleared Google Sheets cached tokens");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_in(dir: &std::path::Path) -> GoogleConfig {
        GoogleConfig {
            credentials_file: Some(dir.join("credentials.json")),
            token_file: Some(dir.join("tokens.json")),
        }
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = Credential {
            access_token: "ya29.secret".to_string(),
            expires_at: None,
        };
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("ya29.secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_missing_secrets_file_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = create_authenticator(&config_in(dir.path())).await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_invalid_secrets_file_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(config.credentials_file.as_ref().unwrap(), "{}").unwrap();

        let result = create_authenticator(&config).await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_clear_tokens_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let token_path: PathBuf = config.token_file.clone().unwrap();
        fs::write(&token_path, "{}").unwrap();

        clear_tokens(&config).unwrap();
        assert!(!token_path.exists());

        // Clearing again is a no-op
        clear_tokens(&config).unwrap();
    }
}
