//! Recording chat channel for tests.
//!
//! Captures every outbound message for assertions instead of delivering it.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned; acceptable for test
//! code, not for a production transport.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::ChannelContext;
use crate::ports::{ChannelError, ChatChannel, OutboundMessage};

/// Chat channel that records messages instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: RwLock<Vec<(ChannelContext, OutboundMessage)>>,
}

impl RecordingChannel {
    /// Creates an empty recording channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages sent so far.
    pub fn count(&self) -> usize {
        self.sent.read().expect("lock poisoned").len()
    }

    /// All sent messages, in order.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent
            .read()
            .expect("lock poisoned")
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<OutboundMessage> {
        self.sent
            .read()
            .expect("lock poisoned")
            .last()
            .map(|(_, m)| m.clone())
    }

    /// True if any sent message's text contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.sent
            .read()
            .expect("lock poisoned")
            .iter()
            .any(|(_, m)| m.text.contains(needle))
    }
}

#[async_trait]
impl ChatChannel for RecordingChannel {
    async fn send(
        &self,
        ctx: &ChannelContext,
        message: OutboundMessage,
    ) -> Result<(), ChannelError> {
        self.sent
            .write()
            .expect("lock poisoned")
            .push((ctx.clone(), message));
        Ok(())
    }
}
