//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Bot name cannot be empty")]
    EmptyBotName,

    #[error("Default chat id cannot be empty")]
    EmptyChatId,

    #[error("Dialog inactivity window must be between 10 and 3600 seconds")]
    InvalidInactivityWindow,
}
