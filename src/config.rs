use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `backend.base_url`
pub const BACKEND_URL_ENV: &str = "HEALTHDIALOG_BACKEND_URL";

/// Bounds for `ui.sidebar_percent`
pub const SIDEBAR_PERCENT_RANGE: std::ops::RangeInclusive<u16> = 20..=60;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Triage backend connection
    pub backend: BackendConfig,

    /// UI preferences
    pub ui: UiConfig,

    /// Log output
    pub logging: LoggingConfig,
}

/// Triage backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Unset means a request may wait indefinitely
    pub request_timeout_secs: Option<u64>,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_timestamps: bool,
    pub sidebar_percent: u16,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    pub level: String,
    /// Directory for `healthdialog.log`; defaults to `~/.healthdialog/logs`
    pub directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            sidebar_percent: 35,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    /// `~/.healthdialog`
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".healthdialog"))
    }

    /// `~/.healthdialog/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.ui.sidebar_percent = config
            .ui
            .sidebar_percent
            .clamp(*SIDEBAR_PERCENT_RANGE.start(), *SIDEBAR_PERCENT_RANGE.end());

        Ok(config)
    }

    /// Save configuration to file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = self.to_toml()?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Apply the backend address from the environment, if set and non-empty
    pub fn apply_env(&mut self, backend_url: Option<String>) {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend.base_url = url;
        }
    }

    /// Apply command-line overrides; these win over file and environment
    pub fn apply_overrides(&mut self, backend_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = backend_url {
            self.backend.base_url = url;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }

    /// Directory the log file is written to
    pub fn log_directory(&self) -> Result<PathBuf> {
        match &self.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home_dir()?.join("logs")),
        }
    }
}
