//! Channel context value object.

use serde::{Deserialize, Serialize};

use super::{ChatId, UserId};

/// Where an inbound command or answer came from, and where replies go.
///
/// Carried through the command pipeline so every prompt, re-prompt, and
/// acknowledgement lands in the chat the user is talking in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelContext {
    /// The user this exchange belongs to.
    pub user_id: UserId,
    /// The chat replies should be sent to.
    pub chat_id: ChatId,
}

impl ChannelContext {
    /// Creates a new channel context.
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self { user_id, chat_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_user_and_chat() {
        let ctx = ChannelContext::new(
            UserId::new("u1").unwrap(),
            ChatId::new("lobby").unwrap(),
        );
        assert_eq!(ctx.user_id.as_str(), "u1");
        assert_eq!(ctx.chat_id.as_str(), "lobby");
    }
}
