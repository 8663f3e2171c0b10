use super::ConfigError;
use crate::audit::activity::DEFAULT_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TOKEN_ENV: &str = "SLACKTOKEN";
pub const API_BASE_URL_ENV: &str = "SLACK_API_BASE_URL";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default = "default_access_log_count")]
    pub access_log_count: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: default_api_base_url(),
            page_limit: default_page_limit(),
            access_log_count: default_access_log_count(),
            max_pages: default_max_pages(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(alias = "console", default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Loads the config from `path`, or `config.yaml` if present, falling back
    /// to defaults. Environment overrides always apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load_from_file(DEFAULT_CONFIG_FILE);
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_from_file_with(path, |key| std::env::var(key).ok())
    }

    fn load_from_file_with<P, F>(path: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(TOKEN_ENV) {
            self.slack.token = value;
        }
        if let Some(value) = lookup(API_BASE_URL_ENV) {
            self.slack.api_base_url = value;
        }
    }
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_page_limit() -> u32 {
    1000
}

fn default_access_log_count() -> u32 {
    1000
}

fn default_max_pages() -> u32 {
    100
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
