//! Wizard dialog configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Wizard dialog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    /// Seconds of user inactivity before a pending dialog expires
    #[serde(default = "default_inactivity_secs")]
    pub inactivity_secs: u64,
}

impl DialogConfig {
    /// Get the inactivity window as a duration
    pub fn inactivity_window(&self) -> Duration {
        Duration::from_secs(self.inactivity_secs)
    }

    /// Validate dialog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.inactivity_secs < 10 || self.inactivity_secs > 3600 {
            return Err(ValidationError::InvalidInactivityWindow);
        }
        Ok(())
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            inactivity_secs: default_inactivity_secs(),
        }
    }
}

fn default_inactivity_secs() -> u64 {
    300
}
