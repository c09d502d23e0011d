use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::thresholds::ThresholdSet;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "hostpulse";

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_cpu_threshold")]
    pub cpu_usage_threshold: i64,
    #[serde(default = "default_memory_threshold")]
    pub memory_usage_threshold: i64,
    #[serde(default = "default_disk_threshold")]
    pub disk_usage_threshold: i64,
    /// Seconds between cycles; zero means the default.
    #[serde(default)]
    pub interval_seconds: u64,
    /// Directory for the daily log files; empty means the working directory.
    #[serde(default)]
    pub log_directory: String,
    /// Identifier of the Google spreadsheet receiving the rows.
    pub google_sheet_id: String,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,
}

/// Push-notification channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notify_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Google Sheets access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadsheetConfig {
    /// Service-account key file (tilde-expanded at point of use).
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

// --- Defaults ---

pub const DEFAULT_INTERVAL_SECS: u64 = 5;

const fn default_cpu_threshold() -> i64 {
    80
}

const fn default_memory_threshold() -> i64 {
    80
}

const fn default_disk_threshold() -> i64 {
    90
}

const fn default_timeout() -> u64 {
    10
}

fn default_notify_endpoint() -> String {
    "https://notify-api.line.me/api/notify".into()
}

fn default_token_env() -> String {
    "LINE_NOTIFY_TOKEN".into()
}

fn default_credentials_path() -> String {
    "credentials.json".into()
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".into()
}

// --- Default impls ---

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_notify_endpoint(),
            token_env: default_token_env(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            api_base: default_sheets_api_base(),
            timeout_secs: default_timeout(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from the first candidate location that exists:
    /// `./config.toml`, then `<config dir>/hostpulse/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if no config file exists, or if it cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let candidates = Self::candidate_paths();
        let path = candidates.iter().find(|p| p.exists()).with_context(|| {
            let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            format!("No config file found (tried: {})", tried.join(", "))
        })?;
        Self::load_from(path)
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Rejects negative thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first negative threshold key.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("cpu_usage_threshold", self.cpu_usage_threshold),
            ("memory_usage_threshold", self.memory_usage_threshold),
            ("disk_usage_threshold", self.disk_usage_threshold),
        ];
        if let Some((key, value)) = thresholds.iter().find(|(_, v)| *v < 0) {
            bail!("{key} must be between 0 and 100, got {value}");
        }
        Ok(())
    }

    /// Delay between two cycles, falling back to 5 seconds when unset or zero.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        let secs = if self.interval_seconds == 0 {
            DEFAULT_INTERVAL_SECS
        } else {
            self.interval_seconds
        };
        Duration::from_secs(secs)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        paths
    }
}

fn clamp_percent(value: i64) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(100)
}

impl From<&AppConfig> for ThresholdSet {
    fn from(config: &AppConfig) -> Self {
        Self {
            cpu_max: clamp_percent(config.cpu_usage_threshold),
            memory_max: clamp_percent(config.memory_usage_threshold),
            disk_max: clamp_percent(config.disk_usage_threshold),
        }
    }
}
