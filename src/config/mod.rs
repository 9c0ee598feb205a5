//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SHOE_CONCIERGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use shoe_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod catalog;
mod collaborators;
mod composer;
mod dialogue;
mod error;
mod payment;
mod server;
mod telegram;

pub use catalog::CatalogConfig;
pub use collaborators::CollaboratorsConfig;
pub use composer::{ComposerConfig, ComposerKind};
pub use dialogue::{DialogueConfig, MAX_DIALOGUE_PAGE_SIZE};
pub use error::{ConfigError, ConfigValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, LogFormat, ServerConfig};
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// template-composer bot serving the bundled catalog over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Catalog, inventory and order log files
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Dialogue tuning (page size, worker idle time)
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Collaborator call limits
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,

    /// Payment method and simulation switches
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Reply composer selection
    #[serde(default)]
    pub composer: ComposerConfig,

    /// Optional Telegram transport
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SHOE_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SHOE_CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SHOE_CONCIERGE__DIALOGUE__PAGE_SIZE=5` -> `dialogue.page_size = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHOE_CONCIERGE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.server.validate()?;
        self.catalog.validate()?;
        self.dialogue.validate()?;
        self.collaborators.validate()?;
        self.payment.validate()?;
        self.composer.validate()?;
        self.telegram.validate()?;
        Ok(())
    }
}
