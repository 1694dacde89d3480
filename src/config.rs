use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "timewriggler";

const DEFAULT_PROJECT_RANGE: &str = "projects!A2:B";
const DEFAULT_TIME_RANGE: &str = "timesheet!A2:D";
const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
    pub sheet: SheetConfig,
}

/// Where the OAuth client secret is read from and the tokens are cached.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GoogleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl GoogleConfig {
    /// Path of the "installed application" client secret JSON
    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_file {
            Some(path) => Ok(path.clone()),
            None => Config::config_dir_file("credentials.json"),
        }
    }

    /// Path of the persisted access and refresh tokens
    pub fn token_path(&self) -> Result<PathBuf> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => Config::cache_file("google_tokens.json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_project_range")]
    pub project_range: String,
    #[serde(default = "default_time_range")]
    pub time_range: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            project_range: default_project_range(),
            time_range: default_time_range(),
            date_format: default_date_format(),
        }
    }
}

fn default_project_range() -> String {
    DEFAULT_PROJECT_RANGE.to_string()
}

fn default_time_range() -> String {
    DEFAULT_TIME_RANGE.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        if config.sheet.spreadsheet_id.is_empty() {
            return Err(AppError::Config(
                "sheet.spreadsheet_id must be set in config file".to_string(),
            ));
        }

        if config.sheet.date_format.is_empty() {
            return Err(AppError::Config(
                "sheet.date_format must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Self::config_dir_file("config.toml")
    }

    fn config_dir_file(filename: &str) -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_cache_home()
            .ok_or_else(|| AppError::Config("Failed to determine cache directory".to_string()))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create cache file path: {}", e)))
    }
}
