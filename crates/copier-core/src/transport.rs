//! The seam between relay logic and the messaging client.

use async_trait::async_trait;

use crate::config::ChannelRef;
use crate::error::TransportError;

/// The bot's standing in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Owner,
    Administrator { can_post_messages: bool },
    Member,
    /// Left, banned, or never joined.
    Absent,
}

impl Membership {
    /// Any membership that lets the bot receive channel posts.
    pub fn can_read(&self) -> bool {
        !matches!(self, Membership::Absent)
    }

    pub fn can_post(&self) -> bool {
        match self {
            Membership::Owner => true,
            Membership::Administrator { can_post_messages } => *can_post_messages,
            Membership::Member | Membership::Absent => false,
        }
    }
}

/// Operations the bot needs from the messaging platform.
///
/// Implementations own retries; callers see the final outcome only.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Copy one message without a "forwarded from" header.
    async fn copy_message(
        &self,
        from: &ChannelRef,
        to: &ChannelRef,
        message_id: i32,
    ) -> Result<(), TransportError>;

    /// Copy several messages in one call, keeping album grouping.
    async fn copy_album(
        &self,
        from: &ChannelRef,
        to: &ChannelRef,
        message_ids: &[i32],
    ) -> Result<(), TransportError>;

    /// Send an HTML-formatted text message to a user's private chat.
    async fn send_to_user(&self, user_id: u64, text: &str) -> Result<(), TransportError>;

    /// Look up the bot's own membership in a channel.
    async fn bot_membership(&self, channel: &ChannelRef) -> Result<Membership, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_capabilities() {
        assert!(Membership::Member.can_read());
        assert!(!Membership::Member.can_post());
        assert!(Membership::Owner.can_post());
        assert!(Membership::Administrator { can_post_messages: true }.can_post());
        assert!(!Membership::Administrator { can_post_messages: false }.can_post());
        assert!(!Membership::Absent.can_read());
    }
}
