//! Reply composer configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ConfigValidationError;

/// Which composer phrases replies
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComposerKind {
    /// Built-in deterministic templates
    #[default]
    Template,
    /// OpenAI-compatible chat model rephrasing the templates
    Llm,
}

/// Reply composer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ComposerConfig {
    #[serde(default)]
    pub kind: ComposerKind,

    /// API key for the `llm` composer
    pub api_key: Option<Secret<String>>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Model request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ComposerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.kind == ComposerKind::Llm {
            if !self.has_api_key() {
                return Err(ConfigValidationError::MissingRequired("COMPOSER__API_KEY"));
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err(ConfigValidationError::InvalidUrl {
                    field: "composer.base_url",
                    value: self.base_url.clone(),
                });
            }
            if self.timeout_secs == 0 {
                return Err(ConfigValidationError::InvalidTimeout);
            }
        }
        Ok(())
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            kind: ComposerKind::default(),
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_needs_nothing() {
        assert!(ComposerConfig::default().validate().is_ok());
    }

    #[test]
    fn llm_requires_api_key() {
        let config = ComposerConfig {
            kind: ComposerKind::Llm,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::MissingRequired("COMPOSER__API_KEY"))
        );

        let config = ComposerConfig {
            kind: ComposerKind::Llm,
            api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = ComposerConfig {
            api_key: Some(Secret::new("sk-very-secret".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
