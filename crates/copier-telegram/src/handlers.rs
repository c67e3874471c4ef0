//! Update handlers for the Telegram bot.

use std::sync::Arc;

use copier_core::{welcome_text, CommandHandler, EventRelay, InboundPost, OwnerCommand, PostKind};
use teloxide::prelude::*;
use teloxide::types::{MediaKind, MessageKind, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use crate::error::{Result, TelegramError};

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "Welcome message and setup help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Resume copying posts (owner only)")]
    StartForward,

    #[command(description = "Pause copying posts (owner only)")]
    StopForward,

    #[command(description = "Show configuration and forwarding status (owner only)")]
    Status,
}

impl Command {
    /// The owner command this maps to, if any.
    pub fn owner_command(&self) -> Option<OwnerCommand> {
        match self {
            Command::StartForward => Some(OwnerCommand::StartForward),
            Command::StopForward => Some(OwnerCommand::StopForward),
            Command::Status => Some(OwnerCommand::Status),
            Command::Start | Command::Help => None,
        }
    }
}

/// Classify a message payload for the relay.
pub fn post_kind(msg: &Message) -> PostKind {
    match &msg.kind {
        MessageKind::Common(common) => match &common.media_kind {
            MediaKind::Text(_) => PostKind::Text,
            MediaKind::Photo(_) => PostKind::Photo,
            MediaKind::Video(_) => PostKind::Video,
            MediaKind::Animation(_) => PostKind::Animation,
            MediaKind::Voice(_) => PostKind::Voice,
            MediaKind::Audio(_) => PostKind::Audio,
            MediaKind::Document(_) => PostKind::Document,
            MediaKind::Sticker(_) => PostKind::Sticker,
            MediaKind::Poll(_) => PostKind::Poll,
            MediaKind::Location(_) => PostKind::Location,
            MediaKind::Contact(_) => PostKind::Contact,
            MediaKind::VideoNote(_) => PostKind::Unsupported("video note"),
            MediaKind::Venue(_) => PostKind::Unsupported("venue"),
            MediaKind::Game(_) => PostKind::Unsupported("game"),
            _ => PostKind::Unsupported("unknown media"),
        },
        _ => PostKind::Unsupported("service message"),
    }
}

/// Build the relay's view of a channel post.
pub fn inbound_post(msg: &Message) -> InboundPost {
    InboundPost {
        chat_id: msg.chat.id.0,
        chat_username: msg.chat.username().map(str::to_owned),
        message_id: msg.id.0,
        kind: post_kind(msg),
        media_group_id: msg.media_group_id().map(ToString::to_string),
    }
}

/// Handle a channel post.
pub async fn handle_channel_post(msg: Message, relay: Arc<EventRelay>) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let outcome = relay
        .handle_post(inbound_post(&msg))
        .await
        .map_err(|source| TelegramError::Relay { chat_id, source })?;

    debug!(chat_id, message_id = msg.id.0, ?outcome, "Channel post handled");
    Ok(())
}

/// Handle /start and /help.
async fn handle_welcome(bot: Bot, msg: Message) -> Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }

    bot.send_message(msg.chat.id, welcome_text())
        .parse_mode(ParseMode::Html)
        .await
        .map_err(|source| TelegramError::Request {
            chat_id: msg.chat.id.0,
            source,
        })?;

    info!(
        chat_id = %msg.chat.id,
        user = ?msg.from.as_ref().map(|u| &u.username),
        "User started bot"
    );
    Ok(())
}

/// Dispatch a parsed command.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    commands: Arc<CommandHandler>,
) -> Result<()> {
    let Some(owner_command) = cmd.owner_command() else {
        return handle_welcome(bot, msg).await;
    };

    let user_id = msg.from.as_ref().map(|u| u.id.0);
    let Some(reply) = commands.handle(user_id, owner_command) else {
        return Ok(());
    };

    bot.send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Html)
        .await
        .map_err(|source| TelegramError::Request {
            chat_id: msg.chat.id.0,
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_post(extra: serde_json::Value) -> Message {
        let mut value = serde_json::json!({
            "message_id": 42,
            "date": 1_700_000_000,
            "chat": {
                "id": -100111,
                "type": "channel",
                "title": "Source",
                "username": "source_feed"
            }
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).expect("valid channel post")
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start_forward", "copier_bot").unwrap(), Command::StartForward);
        assert_eq!(Command::parse("/stop_forward", "copier_bot").unwrap(), Command::StopForward);
        assert_eq!(Command::parse("/status", "copier_bot").unwrap(), Command::Status);
        assert!(Command::parse("/connect", "copier_bot").is_err());
    }

    #[test]
    fn test_owner_command_mapping() {
        assert_eq!(Command::Status.owner_command(), Some(OwnerCommand::Status));
        assert_eq!(Command::Help.owner_command(), None);
    }

    #[test]
    fn test_text_post() {
        let msg = channel_post(serde_json::json!({ "text": "hello" }));
        let post = inbound_post(&msg);
        assert_eq!(post.chat_id, -100111);
        assert_eq!(post.chat_username.as_deref(), Some("source_feed"));
        assert_eq!(post.message_id, 42);
        assert_eq!(post.kind, PostKind::Text);
        assert_eq!(post.media_group_id, None);
    }

    #[test]
    fn test_album_photo_post() {
        let msg = channel_post(serde_json::json!({
            "media_group_id": "13579",
            "photo": [{
                "file_id": "AgAD",
                "file_unique_id": "AQAD",
                "width": 90,
                "height": 90,
                "file_size": 1024
            }]
        }));
        let post = inbound_post(&msg);
        assert_eq!(post.kind, PostKind::Photo);
        assert_eq!(post.media_group_id.as_deref(), Some("13579"));
    }

    #[test]
    fn test_location_post() {
        let msg = channel_post(serde_json::json!({
            "location": { "longitude": 13.4, "latitude": 52.5 }
        }));
        assert_eq!(post_kind(&msg), PostKind::Location);
    }
}
