//! Telegram transport configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ConfigValidationError;

/// Telegram Bot API settings. The transport is off without a token.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<Secret<String>>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Long-poll timeout for getUpdates, in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// True when a non-empty bot token is configured
    pub fn is_enabled(&self) -> bool {
        self.bot_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.is_enabled() {
            return Ok(());
        }
        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            return Err(ConfigValidationError::InvalidUrl {
                field: "telegram.api_base",
                value: self.api_base.clone(),
            });
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 60 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_api_base(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}
