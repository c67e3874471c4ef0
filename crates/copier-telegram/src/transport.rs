//! teloxide-backed implementation of the relay transport.

use std::future::Future;

use async_trait::async_trait;
use copier_core::{ChannelRef, Membership, Transport, TransportError};
use teloxide::prelude::*;
use teloxide::types::{ChatMember, MessageId, ParseMode, Recipient};
use teloxide::{ApiError, RequestError};
use tracing::warn;

use crate::retry::RetryPolicy;

/// Convert a configured channel into a teloxide recipient.
pub fn recipient(channel: &ChannelRef) -> Recipient {
    match channel {
        ChannelRef::Id(id) => Recipient::Id(ChatId(*id)),
        ChannelRef::Username(name) => Recipient::ChannelUsername(format!("@{}", name)),
    }
}

/// Map a final teloxide error onto the relay's error taxonomy.
pub fn classify(error: RequestError) -> TransportError {
    match error {
        RequestError::Api(ApiError::MessageToForwardNotFound | ApiError::MessageIdInvalid) => {
            TransportError::SourceGone
        }
        RequestError::Api(ApiError::Unknown(description)) => {
            let lower = description.to_lowercase();
            if lower.contains("message to copy not found") || lower.contains("message not found") {
                TransportError::SourceGone
            } else if lower.contains("can't be copied") {
                TransportError::NotCopyable(description)
            } else {
                TransportError::Api(description)
            }
        }
        RequestError::RetryAfter(seconds) => TransportError::RateLimited(seconds.duration()),
        RequestError::Network(e) => TransportError::Network(e.to_string()),
        RequestError::Io(e) => TransportError::Network(e.to_string()),
        other => TransportError::Api(other.to_string()),
    }
}

/// Map the bot's chat member record onto [`Membership`].
pub fn membership_of(member: &ChatMember) -> Membership {
    let kind = &member.kind;
    if kind.is_owner() {
        Membership::Owner
    } else if kind.is_administrator() {
        Membership::Administrator {
            can_post_messages: kind.can_post_messages(),
        }
    } else if kind.is_present() {
        Membership::Member
    } else {
        Membership::Absent
    }
}

/// Relay transport on top of a teloxide [`Bot`].
pub struct TeloxideTransport {
    bot: Bot,
    bot_id: UserId,
    retry: RetryPolicy,
}

impl TeloxideTransport {
    /// `bot_id` is the bot's own user id, used for membership lookups.
    pub fn new(bot: Bot, bot_id: UserId) -> Self {
        Self {
            bot,
            bot_id,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn send_with_retry<T, F, Fut>(&self, action: &'static str, mut call: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    match self.retry.delay_for(attempt, &e) {
                        Some(delay) => {
                            warn!(
                                action,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "Telegram request failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(classify(e)),
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Transport for TeloxideTransport {
    async fn copy_message(
        &self,
        from: &ChannelRef,
        to: &ChannelRef,
        message_id: i32,
    ) -> Result<(), TransportError> {
        let (from, to) = (recipient(from), recipient(to));
        self.send_with_retry("copy_message", || {
            self.bot
                .copy_message(to.clone(), from.clone(), MessageId(message_id))
                .send()
        })
        .await
        .map(|_| ())
    }

    async fn copy_album(
        &self,
        from: &ChannelRef,
        to: &ChannelRef,
        message_ids: &[i32],
    ) -> Result<(), TransportError> {
        let (from, to) = (recipient(from), recipient(to));
        let ids: Vec<MessageId> = message_ids.iter().copied().map(MessageId).collect();
        self.send_with_retry("copy_messages", || {
            self.bot
                .copy_messages(to.clone(), from.clone(), ids.clone())
                .send()
        })
        .await
        .map(|_| ())
    }

    async fn send_to_user(&self, user_id: u64, text: &str) -> Result<(), TransportError> {
        let chat = ChatId(user_id as i64);
        self.send_with_retry("send_message", || {
            self.bot
                .send_message(chat, text)
                .parse_mode(ParseMode::Html)
                .send()
        })
        .await
        .map(|_| ())
    }

    async fn bot_membership(&self, channel: &ChannelRef) -> Result<Membership, TransportError> {
        let chat = recipient(channel);
        let member = self
            .send_with_retry("get_chat_member", || {
                self.bot.get_chat_member(chat.clone(), self.bot_id).send()
            })
            .await?;
        Ok(membership_of(&member))
    }
}
