//! Console chat channel for local development.
//!
//! Prints outbound messages to stdout; paired with the stdin read loop in
//! `main.rs` it makes the whole command pipeline drivable from a terminal.

use async_trait::async_trait;

use crate::domain::foundation::ChannelContext;
use crate::ports::{ChannelError, ChatChannel, OutboundMessage};

/// Chat channel that renders messages on stdout.
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    /// Creates a console channel.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatChannel for ConsoleChannel {
    async fn send(
        &self,
        ctx: &ChannelContext,
        message: OutboundMessage,
    ) -> Result<(), ChannelError> {
        println!("[{}] {}", ctx.chat_id, message.text);
        for option in &message.options {
            println!("  ({}) {}", option.value, option.label);
        }
        Ok(())
    }
}
