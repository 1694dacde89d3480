use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use yup_oauth2::storage::{TokenInfo, TokenStorage};

const TOKEN_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct TokenFileContents {
    version: u32,
    tokens: Vec<StoredToken>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    /// Sorted scopes the token was issued for
    scopes: Vec<String>,
    token: TokenInfo,
}

impl StoredToken {
    fn covers(&self, target_scopes: &[&str]) -> bool {
        target_scopes
            .iter()
            .all(|scope| self.scopes.iter().any(|s| s == scope))
    }
}

/// Versioned JSON token cache used as the authenticator's storage.
pub(super) struct TokenFile {
    path: PathBuf,
    tokens: Mutex<Vec<StoredToken>>,
}

impl TokenFile {
    /// Load tokens from `path`, starting empty when the file does not exist yet.
    pub(super) fn load(path: PathBuf) -> Result<Self> {
        let tokens = match path.exists() {
            true => Self::read_tokens(&path)?,
            false => {
                debug!(?path, "No cached Google tokens found");
                Vec::new()
            }
        };

        Ok(Self {
            path,
            tokens: Mutex::new(tokens),
        })
    }

    fn read_tokens(path: &Path) -> Result<Vec<StoredToken>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AppError::Auth(format!("Failed to read tokens file: {}", e)))?;

        let file: TokenFileContents = serde_json::from_str(&contents)
            .map_err(|e| AppError::Auth(format!("Failed to parse tokens: {}", e)))?;

        if file.version != TOKEN_FILE_VERSION {
            return Err(AppError::Auth(format!(
                "Unsupported tokens file version {} (expected {}), clear it with `auth google --reset`",
                file.version, TOKEN_FILE_VERSION
            )));
        }

        Ok(file.tokens)
    }

    fn save(&self, tokens: Vec<StoredToken>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Auth(format!("Failed to create token cache directory: {}", e))
            })?;
        }

        let file = TokenFileContents {
            version: TOKEN_FILE_VERSION,
            tokens,
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| AppError::Auth(format!("Failed to serialize tokens: {}", e)))?;

        // Create file with owner-only permissions from the start to avoid race condition
        let mut handle = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)
            .map_err(|e| AppError::Auth(format!("Failed to create tokens file: {}", e)))?;

        handle
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::Auth(format!("Failed to write tokens file: {}", e)))?;

        debug!(path = ?self.path, "Saved Google tokens");

        Ok(())
    }
}

#[async_trait]
impl TokenStorage for TokenFile {
    async fn set(&self, scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let mut scopes: Vec<String> = scopes.iter().map(|s| s.to_string()).collect();
        scopes.sort();
        scopes.dedup();

        let snapshot = {
            let mut tokens = self
                .tokens
                .lock()
                .map_err(|_| anyhow::anyhow!("Token storage lock poisoned"))?;
            match tokens.iter_mut().find(|stored| stored.scopes == scopes) {
                Some(stored) => stored.token = token,
                None => tokens.push(StoredToken { scopes, token }),
            }
            tokens.clone()
        };

        self.save(snapshot)?;
        Ok(())
    }

    async fn get(&self, target_scopes: &[&str]) -> Option<TokenInfo> {
        let tokens = self.tokens.lock().ok()?;
        tokens
            .iter()
            .find(|stored| stored.covers(target_scopes))
            .map(|stored| stored.token.clone())
    }
}
