//! ChatChannel port - outbound rendering to the chat transport.
//!
//! The core produces `{ text, options }` payloads; the transport renders
//! them as a message with optional selectable buttons. Selecting an option
//! must be transport-encoded so that re-delivery into the wizard engine
//! reproduces the option's `value`, not its `label`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ChannelContext, DomainError, ErrorCode};
use crate::domain::wizard::SelectOption;

/// Errors that can occur while sending through the chat transport.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// Transport-level delivery failure.
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

impl From<ChannelError> for DomainError {
    fn from(err: ChannelError) -> Self {
        DomainError::new(ErrorCode::ChannelError, err.to_string())
    }
}

/// One outbound message: prompt text plus optional selectable choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Text body of the message.
    pub text: String,
    /// Selectable choices, empty for plain messages.
    pub options: Vec<SelectOption>,
}

impl OutboundMessage {
    /// Creates a plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// Creates a message with selectable choices.
    pub fn with_options(text: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// Port for sending messages into the chat.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Delivers a message into the chat named by the context.
    async fn send(
        &self,
        ctx: &ChannelContext,
        message: OutboundMessage,
    ) -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_has_no_options() {
        let message = OutboundMessage::text("hello");
        assert_eq!(message.text, "hello");
        assert!(message.options.is_empty());
    }

    #[test]
    fn channel_error_converts_to_domain_error() {
        let err: DomainError = ChannelError::Delivery("socket closed".to_string()).into();
        assert_eq!(err.code, ErrorCode::ChannelError);
        assert!(err.message.contains("socket closed"));
    }
}
