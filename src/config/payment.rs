//! Payment configuration

use serde::Deserialize;

use super::error::ConfigValidationError;

/// Payment configuration (simulated processor)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Method tag sent with every payment
    #[serde(default = "default_method")]
    pub method: String,

    /// Make the simulated processor decline everything
    #[serde(default)]
    pub decline_all: bool,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.method.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired("PAYMENT__METHOD"));
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            decline_all: false,
        }
    }
}

fn default_method() -> String {
    "UPI".to_string()
}
