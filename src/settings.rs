//! Engine Settings
//!
//! Settings data structure and TOML persistence.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, OPTION_CACHE_CAPACITY, OPTION_FETCH_LIMIT,
    PAGE_SIZE_OPTIONS, REQUEST_TIMEOUT_SECS, SETTINGS_FILE,
};
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Settings shared by the table engine, the filter panel and the API client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Root of the dashboard API (e.g., "http://localhost:8000/api")
    pub api_base_url: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Initial page size for tables
    pub page_size: usize,
    /// Page sizes offered by the footer selector
    pub page_size_options: Vec<usize>,
    /// Limit passed to the option preview endpoint
    pub option_fetch_limit: usize,
    /// Number of preview responses kept in memory
    pub option_cache_capacity: usize,
    /// Directory for rolling log files (stdout only when unset)
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            option_fetch_limit: OPTION_FETCH_LIMIT,
            option_cache_capacity: OPTION_CACHE_CAPACITY,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from the platform config directory
    ///
    /// A missing or empty file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = get_or_create_config_dir()?.join(SETTINGS_FILE);

        #[cfg(debug_assertions)]
        info!("Settings file: {}", path.display());

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Invalid {
                message: "page_size must be greater than zero".to_string(),
            });
        }
        if self.page_size_options.iter().any(|size| *size == 0) {
            return Err(Error::Invalid {
                message: "page_size_options must not contain zero".to_string(),
            });
        }
        if self.option_cache_capacity == 0 {
            return Err(Error::Invalid {
                message: "option_cache_capacity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
