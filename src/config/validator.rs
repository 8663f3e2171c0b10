use thiserror::Error;

use super::Config;

/// Roughly a century; larger windows reach past the representable date range.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slack.token.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "slack.token cannot be empty (set SLACKTOKEN)".to_string(),
            ));
        }

        if url::Url::parse(&self.slack.api_base_url).is_err() {
            return Err(ConfigError::InvalidConfig(format!(
                "slack.api_base_url is not a valid url: {}",
                self.slack.api_base_url
            )));
        }

        if self.slack.page_limit == 0 {
            return Err(ConfigError::InvalidConfig(
                "slack.page_limit must be greater than 0".to_string(),
            ));
        }

        if self.slack.access_log_count == 0 {
            return Err(ConfigError::InvalidConfig(
                "slack.access_log_count must be greater than 0".to_string(),
            ));
        }

        if self.slack.max_pages == 0 {
            return Err(ConfigError::InvalidConfig(
                "slack.max_pages must be greater than 0".to_string(),
            ));
        }

        if self.audit.window_days == 0 || self.audit.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidConfig(format!(
                "audit.window_days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }

        Ok(())
    }
}
