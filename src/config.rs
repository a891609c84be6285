//! Configuration management for repodeck
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DEFAULT_API_BASE_URL, DEFAULT_GITHUB_USER, DEFAULT_MAX_LIST_PAGES, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENV, MAX_LIST_PAGES, MAX_PAGE_SIZE, MAX_TIMEOUT_SECS,
};
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API root, e.g. "https://api.github.com" or a GitHub Enterprise "/api/v3" URL
    pub api_base_url: String,
    /// Account whose repositories are listed in anonymous mode and that owns edited repositories
    pub user: String,
    /// Environment variable holding the API token. Unset means read-only mode.
    pub token_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Upper bound on list pages followed during a load
    pub max_list_pages: u32,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Repositories per list page
    pub page_size: usize,
    /// Date format for "last updated"
    pub date_format: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Echo log records to stderr
    pub enabled: bool,
    /// One of "error", "warn", "info", "debug", "trace"
    pub level: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user: DEFAULT_GITHUB_USER.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_list_pages: DEFAULT_MAX_LIST_PAGES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            date_format: datetime::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl GitHubConfig {
    /// Read the API token from the configured environment variable
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|token| !token.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LoggingConfig {
    /// Parse the configured level. Only the five lowercase level names are accepted.
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        match self.level.as_str() {
            "error" => Ok(log::LevelFilter::Error),
            "warn" => Ok(log::LevelFilter::Warn),
            "info" => Ok(log::LevelFilter::Info),
            "debug" => Ok(log::LevelFilter::Debug),
            "trace" => Ok(log::LevelFilter::Trace),
            other => anyhow::bail!(
                "Invalid logging level '{}', expected one of error, warn, info, debug, trace",
                other
            ),
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("repodeck.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Ok(xdg_config) = Self::get_default_config_path() {
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let github = &self.github;
        if !(github.api_base_url.starts_with("https://") || github.api_base_url.starts_with("http://")) {
            anyhow::bail!(
                "api_base_url must start with http:// or https://, got '{}'",
                github.api_base_url
            );
        }
        if github.user.trim().is_empty() {
            anyhow::bail!("github.user cannot be empty");
        }
        if github.token_env.trim().is_empty() {
            anyhow::bail!("github.token_env cannot be empty");
        }
        if github.timeout_secs == 0 || github.timeout_secs > MAX_TIMEOUT_SECS {
            anyhow::bail!(
                "timeout_secs must be between 1 and {}, got {}",
                MAX_TIMEOUT_SECS,
                github.timeout_secs
            );
        }
        if github.max_list_pages == 0 || github.max_list_pages > MAX_LIST_PAGES {
            anyhow::bail!(
                "max_list_pages must be between 1 and {}, got {}",
                MAX_LIST_PAGES,
                github.max_list_pages
            );
        }

        if self.display.page_size == 0 || self.display.page_size > MAX_PAGE_SIZE {
            anyhow::bail!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                self.display.page_size
            );
        }

        if !datetime::is_valid_format(&self.display.date_format) {
            anyhow::bail!("Invalid date_format '{}'", self.display.date_format);
        }

        self.logging.level_filter()?;

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# repodeck configuration file\n# Generated on {}\n# The API token is read from the variable named by github.token_env\n\n",
            chrono::Local::now().format(datetime::DEFAULT_DATE_FORMAT)
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        log::info!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Path of the per-user config file, `<config dir>/repodeck/config.toml`
    pub fn get_default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("repodeck").join("config.toml"))
    }
}
