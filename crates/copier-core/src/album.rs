//! Album (media group) buffering.
//!
//! Telegram delivers each album member as a separate post sharing one
//! `media_group_id` and never marks the last one. Members are collected per
//! group until either no new member has arrived for the quiet window or the
//! album reaches Telegram's size limit.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

/// Telegram allows at most this many items in one album.
pub const MAX_ALBUM_SIZE: usize = 10;

#[derive(Debug)]
struct PendingAlbum {
    message_ids: Vec<i32>,
    /// Generation of the most recent member.
    generation: u64,
}

/// Outcome of adding a member to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumPush {
    /// Still collecting. A flush scheduled with this generation will fire
    /// only if no later member arrives.
    Buffered { generation: u64 },
    /// The album hit the size limit; relay these ids now.
    Complete(Vec<i32>),
}

/// Per-group collection of album members, in arrival order.
#[derive(Debug)]
pub struct AlbumBuffer {
    pending: Mutex<HashMap<String, PendingAlbum>>,
    next_generation: Mutex<u64>,
    quiet: Duration,
}

impl AlbumBuffer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            next_generation: Mutex::new(0),
            quiet,
        }
    }

    /// How long a group must stay silent before it is relayed.
    pub fn quiet_window(&self) -> Duration {
        self.quiet
    }

    /// Add a member to its group.
    pub async fn push(&self, media_group_id: &str, message_id: i32) -> AlbumPush {
        let generation = {
            let mut next = self.next_generation.lock().await;
            *next += 1;
            *next
        };

        let mut pending = self.pending.lock().await;
        let album = pending
            .entry(media_group_id.to_string())
            .or_insert_with(|| PendingAlbum {
                message_ids: Vec::new(),
                generation,
            });
        album.message_ids.push(message_id);
        album.generation = generation;

        debug!(
            media_group_id,
            message_id,
            members = album.message_ids.len(),
            "Buffered album member"
        );

        if album.message_ids.len() >= MAX_ALBUM_SIZE {
            let complete = pending
                .remove(media_group_id)
                .map(|a| a.message_ids)
                .unwrap_or_default();
            return AlbumPush::Complete(complete);
        }

        AlbumPush::Buffered { generation }
    }

    /// Take a group if `generation` is still its latest member.
    ///
    /// Returns `None` when a newer member arrived since, or when the group was
    /// already taken.
    pub async fn take_if_quiet(&self, media_group_id: &str, generation: u64) -> Option<Vec<i32>> {
        let mut pending = self.pending.lock().await;
        match pending.get(media_group_id) {
            Some(album) if album.generation == generation => {
                pending.remove(media_group_id).map(|a| a.message_ids)
            }
            _ => None,
        }
    }

    /// Number of groups still being collected.
    pub async fn pending_groups(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> AlbumBuffer {
        AlbumBuffer::new(Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_only_latest_generation_takes_group() {
        let buffer = buffer();

        let AlbumPush::Buffered { generation: first } = buffer.push("g1", 1).await else {
            panic!("expected buffered");
        };
        let AlbumPush::Buffered { generation: second } = buffer.push("g1", 2).await else {
            panic!("expected buffered");
        };

        assert_eq!(buffer.take_if_quiet("g1", first).await, None);
        assert_eq!(buffer.take_if_quiet("g1", second).await, Some(vec![1, 2]));
        assert_eq!(buffer.take_if_quiet("g1", second).await, None);
        assert_eq!(buffer.pending_groups().await, 0);
    }

    #[tokio::test]
    async fn test_groups_are_independent() {
        let buffer = buffer();
        buffer.push("a", 1).await;
        let AlbumPush::Buffered { generation } = buffer.push("b", 2).await else {
            panic!("expected buffered");
        };
        buffer.push("a", 3).await;

        assert_eq!(buffer.pending_groups().await, 2);
        assert_eq!(buffer.take_if_quiet("b", generation).await, Some(vec![2]));
        assert_eq!(buffer.pending_groups().await, 1);
    }

    #[tokio::test]
    async fn test_size_limit_completes_album() {
        let buffer = buffer();
        for id in 1..MAX_ALBUM_SIZE as i32 {
            assert!(matches!(buffer.push("g", id).await, AlbumPush::Buffered { .. }));
        }
        let last = buffer.push("g", MAX_ALBUM_SIZE as i32).await;
        assert_eq!(last, AlbumPush::Complete((1..=MAX_ALBUM_SIZE as i32).collect()));
        assert_eq!(buffer.pending_groups().await, 0);
    }
}
