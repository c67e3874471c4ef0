//! Error types for Channel Copier core.

use std::time::Duration;

use thiserror::Error;

/// Configuration could not be assembled from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more variables are missing or malformed.
    #[error("invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl ConfigError {
    /// The individual problems, one per offending variable.
    pub fn problems(&self) -> &[String] {
        match self {
            ConfigError::Invalid { problems } => problems,
        }
    }
}

/// A channel reference that is neither a numeric id nor a public handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is neither a numeric chat id nor an @username")]
pub struct ChannelRefError(pub String);

/// Failures reported by the messaging transport.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The message to copy was deleted before the copy completed.
    #[error("source message no longer exists")]
    SourceGone,

    /// Telegram refuses to copy this kind of message.
    #[error("message cannot be copied: {0}")]
    NotCopyable(String),

    /// Flood control still in effect after the transport gave up retrying.
    #[error("rate limited, retry after {}s", .0.as_secs())]
    RateLimited(Duration),

    /// Network or I/O failure talking to the API.
    #[error("network error: {0}")]
    Network(String),

    /// Any other API-level failure (permissions, bad chat id, ...).
    #[error("Telegram API error: {0}")]
    Api(String),
}

impl TransportError {
    /// Whether this outcome is ordinary input rather than a fault.
    ///
    /// Expected outcomes are logged and dropped, never escalated to the owner.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            TransportError::SourceGone | TransportError::NotCopyable(_)
        )
    }
}

/// Failures raised by the event relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Copying a single post failed.
    #[error("Failed to copy message {message_id}: {source}")]
    Copy {
        message_id: i32,
        #[source]
        source: TransportError,
    },

    /// Copying a buffered album failed.
    #[error("Failed to copy album {media_group_id} ({count} messages): {source}")]
    CopyAlbum {
        media_group_id: String,
        count: usize,
        #[source]
        source: TransportError,
    },
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
