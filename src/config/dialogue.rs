//! Dialogue tuning

use serde::Deserialize;

use super::error::ConfigValidationError;

/// Largest page the chat will show at once.
pub const MAX_DIALOGUE_PAGE_SIZE: usize = 10;

/// Dialogue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Products per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Seconds an idle chat worker lingers before stopping
    #[serde(default = "default_worker_idle_secs")]
    pub worker_idle_secs: u64,
}

impl DialogueConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.page_size == 0 || self.page_size > MAX_DIALOGUE_PAGE_SIZE {
            return Err(ConfigValidationError::InvalidPageSize {
                max: MAX_DIALOGUE_PAGE_SIZE,
                actual: self.page_size,
            });
        }
        if self.worker_idle_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            worker_idle_secs: default_worker_idle_secs(),
        }
    }
}

fn default_page_size() -> usize {
    3
}

fn default_worker_idle_secs() -> u64 {
    300
}
