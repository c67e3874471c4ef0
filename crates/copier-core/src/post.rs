//! Transport-neutral view of an inbound channel post.

use std::fmt;

/// What a channel post carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKind {
    Text,
    Photo,
    Video,
    /// Short looping video (GIF).
    Animation,
    Voice,
    Audio,
    Document,
    Sticker,
    Poll,
    Location,
    Contact,
    /// Anything the relay does not copy; the payload names it for logs.
    Unsupported(&'static str),
}

impl PostKind {
    pub fn is_supported(&self) -> bool {
        !matches!(self, PostKind::Unsupported(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Photo => "photo",
            PostKind::Video => "video",
            PostKind::Animation => "animation",
            PostKind::Voice => "voice",
            PostKind::Audio => "audio",
            PostKind::Document => "document",
            PostKind::Sticker => "sticker",
            PostKind::Poll => "poll",
            PostKind::Location => "location",
            PostKind::Contact => "contact",
            PostKind::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel post as seen by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPost {
    /// Chat the post was published in.
    pub chat_id: i64,
    /// Public username of that chat, if any.
    pub chat_username: Option<String>,
    pub message_id: i32,
    pub kind: PostKind,
    /// Set for album members; shared by every member of one album.
    pub media_group_id: Option<String>,
}

impl InboundPost {
    /// A standalone post.
    pub fn new(chat_id: i64, message_id: i32, kind: PostKind) -> Self {
        Self {
            chat_id,
            chat_username: None,
            message_id,
            kind,
            media_group_id: None,
        }
    }

    /// Mark this post as a member of an album.
    pub fn in_album(mut self, media_group_id: impl Into<String>) -> Self {
        self.media_group_id = Some(media_group_id.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.chat_username = Some(username.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_kinds() {
        assert!(PostKind::Sticker.is_supported());
        assert!(!PostKind::Unsupported("video note").is_supported());
        assert_eq!(PostKind::Unsupported("dice").to_string(), "dice");
    }

    #[test]
    fn test_builder() {
        let post = InboundPost::new(-100111, 7, PostKind::Photo)
            .in_album("g1")
            .with_username("source");
        assert_eq!(post.media_group_id.as_deref(), Some("g1"));
        assert_eq!(post.chat_username.as_deref(), Some("source"));
    }
}
