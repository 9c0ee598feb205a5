//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Unknown log format: {0}")]
    InvalidLogFormat(String),

    #[error("Page size must be between 1 and {max}, got {actual}")]
    InvalidPageSize { max: usize, actual: usize },

    #[error("Collaborator call timeout must be between 1 and {max} seconds, got {actual}")]
    InvalidCallTimeout { max: u64, actual: u64 },

    #[error("Catalog file must be .json, .yaml or .yml: {0}")]
    UnsupportedCatalogFormat(String),

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },
}
