//! Chat transport configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Chat transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Display name the assistant announces itself under
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Chat id used when the transport carries no explicit one
    #[serde(default = "default_chat_id")]
    pub default_chat_id: String,
}

impl ChatConfig {
    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_name.trim().is_empty() {
            return Err(ValidationError::EmptyBotName);
        }
        if self.default_chat_id.trim().is_empty() {
            return Err(ValidationError::EmptyChatId);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            default_chat_id: default_chat_id(),
        }
    }
}

fn default_bot_name() -> String {
    "matchday".to_string()
}

fn default_chat_id() -> String {
    "lobby".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.bot_name, "matchday");
        assert_eq!(config.default_chat_id, "lobby");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_bot_name() {
        let config = ChatConfig {
            bot_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_chat_id() {
        let config = ChatConfig {
            default_chat_id: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
