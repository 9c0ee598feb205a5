//! Collaborator call limits

use serde::Deserialize;
use std::time::Duration;

use super::error::ConfigValidationError;

const MAX_CALL_TIMEOUT_SECS: u64 = 120;

/// Limits applied to every collaborator call
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorsConfig {
    /// Upper bound on one call, in seconds
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl CollaboratorsConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.call_timeout_secs == 0 || self.call_timeout_secs > MAX_CALL_TIMEOUT_SECS {
            return Err(ConfigValidationError::InvalidCallTimeout {
                max: MAX_CALL_TIMEOUT_SECS,
                actual: self.call_timeout_secs,
            });
        }
        Ok(())
    }
}

impl Default for CollaboratorsConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout(),
        }
    }
}

fn default_call_timeout() -> u64 {
    10
}
