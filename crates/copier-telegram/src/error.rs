//! Error types for the Telegram bot.

use copier_core::{ConfigError, RelayError};
use thiserror::Error;

/// Errors that can occur in the Telegram bot.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Required environment variables are missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to start the bot (bad token, API unreachable).
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Relaying a channel post failed.
    #[error("{source}")]
    Relay {
        chat_id: i64,
        #[source]
        source: RelayError,
    },

    /// A reply or other direct API request failed.
    #[error("Telegram request failed: {source}")]
    Request {
        chat_id: i64,
        #[source]
        source: teloxide::RequestError,
    },
}

impl TelegramError {
    /// Chat the failing update came from, if any.
    pub fn chat_id(&self) -> Option<i64> {
        match self {
            TelegramError::Relay { chat_id, .. } | TelegramError::Request { chat_id, .. } => {
                Some(*chat_id)
            }
            _ => None,
        }
    }
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

#[cfg(test)]
mod tests {
    use super::*;
    use copier_core::TransportError;

    #[test]
    fn test_chat_id_context() {
        let err = TelegramError::Relay {
            chat_id: -100111,
            source: RelayError::Copy {
                message_id: 4,
                source: TransportError::Network("reset".into()),
            },
        };
        assert_eq!(err.chat_id(), Some(-100111));
        assert!(err.to_string().contains("Failed to copy message 4"));

        assert_eq!(TelegramError::BotStartFailed("x".into()).chat_id(), None);
    }
}
