//! Per-post relay: source filter, on/off check, kind filter, copy.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::album::{AlbumBuffer, AlbumPush};
use crate::error::{RelayError, Result, TransportError};
use crate::notifier::ErrorNotifier;
use crate::post::InboundPost;
use crate::state::RelayState;
use crate::transport::Transport;

/// What the relay did with a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Posted somewhere other than the source channel.
    NotSource,
    /// Relaying is switched off.
    Paused,
    /// Kind the relay does not copy.
    Unsupported,
    /// Copied as a single message.
    Copied,
    /// Held as an album member; relayed once the album closes.
    Buffered,
    /// Closed an album and copied all of its members.
    AlbumCopied(usize),
    /// The copy hit an expected condition (source deleted, not copyable).
    Dropped,
}

/// Relays posts from the source channel to the target channel.
pub struct EventRelay {
    state: Arc<RelayState>,
    transport: Arc<dyn Transport>,
    notifier: Arc<ErrorNotifier>,
    albums: AlbumBuffer,
}

impl EventRelay {
    pub fn new(
        state: Arc<RelayState>,
        transport: Arc<dyn Transport>,
        notifier: Arc<ErrorNotifier>,
        album_quiet: Duration,
    ) -> Self {
        Self {
            state,
            transport,
            notifier,
            albums: AlbumBuffer::new(album_quiet),
        }
    }

    /// Handle one inbound channel post.
    ///
    /// Errors are operational copy failures; the caller hands them to the
    /// error notifier. Album flushes happen on a timer and notify directly.
    pub async fn handle_post(self: &Arc<Self>, post: InboundPost) -> Result<RelayOutcome> {
        if !self
            .state
            .source()
            .matches(post.chat_id, post.chat_username.as_deref())
        {
            debug!(chat_id = post.chat_id, "Ignoring post from non-source chat");
            return Ok(RelayOutcome::NotSource);
        }

        if !self.state.is_enabled() {
            debug!(message_id = post.message_id, "Forwarding paused, ignoring post");
            return Ok(RelayOutcome::Paused);
        }

        if !post.kind.is_supported() {
            info!(
                message_id = post.message_id,
                kind = %post.kind,
                "Ignoring unsupported message type"
            );
            return Ok(RelayOutcome::Unsupported);
        }

        info!(
            message_id = post.message_id,
            kind = %post.kind,
            media_group_id = ?post.media_group_id,
            "Received post from source channel"
        );

        let Some(group) = post.media_group_id else {
            return self.copy_single(post.message_id).await;
        };

        match self.albums.push(&group, post.message_id).await {
            AlbumPush::Complete(message_ids) => self.copy_album(&group, message_ids).await,
            AlbumPush::Buffered { generation } => {
                self.schedule_album_flush(group, generation, post.chat_id);
                Ok(RelayOutcome::Buffered)
            }
        }
    }

    async fn copy_single(&self, message_id: i32) -> Result<RelayOutcome> {
        let result = self
            .transport
            .copy_message(self.state.source(), self.state.target(), message_id)
            .await;

        match result {
            Ok(()) => {
                info!(
                    message_id,
                    target = %self.state.target(),
                    "Copied message to target channel"
                );
                Ok(RelayOutcome::Copied)
            }
            Err(e) if e.is_expected() => {
                log_expected(&e, &message_id.to_string());
                Ok(RelayOutcome::Dropped)
            }
            Err(source) => Err(RelayError::Copy { message_id, source }),
        }
    }

    async fn copy_album(&self, media_group_id: &str, message_ids: Vec<i32>) -> Result<RelayOutcome> {
        let count = message_ids.len();
        let result = self
            .transport
            .copy_album(self.state.source(), self.state.target(), &message_ids)
            .await;

        match result {
            Ok(()) => {
                info!(
                    media_group_id,
                    count,
                    target = %self.state.target(),
                    "Copied album to target channel"
                );
                Ok(RelayOutcome::AlbumCopied(count))
            }
            Err(e) if e.is_expected() => {
                log_expected(&e, media_group_id);
                Ok(RelayOutcome::Dropped)
            }
            Err(source) => Err(RelayError::CopyAlbum {
                media_group_id: media_group_id.to_string(),
                count,
                source,
            }),
        }
    }

    /// Flush the album after the quiet window unless a newer member arrives.
    fn schedule_album_flush(self: &Arc<Self>, group: String, generation: u64, chat_id: i64) {
        let relay = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(relay.albums.quiet_window()).await;

            let Some(message_ids) = relay.albums.take_if_quiet(&group, generation).await else {
                return;
            };

            if let Err(e) = relay.copy_album(&group, message_ids).await {
                relay.notifier.notify(&e, Some(chat_id)).await;
            }
        });
    }

    /// Number of albums still being collected.
    pub async fn pending_albums(&self) -> usize {
        self.albums.pending_groups().await
    }
}

fn log_expected(error: &TransportError, what: &str) {
    match error {
        TransportError::SourceGone => {
            info!(source_message = what, "Source message deleted before copy, skipping")
        }
        other => warn!(source_message = what, error = %other, "Message cannot be copied, skipping"),
    }
}
