//! Message events exchanged between channels and the conversation core.
//!
//! Channels turn platform updates into [`InboundMessage`]s and deliver
//! [`OutboundMessage`]s (text and documents) back to the user.

use crate::util::generate_message_id;
use conceal::artifact::Artifact;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Media attachment in an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Media type.
    pub media_type: MediaType,
    /// Channel-specific locator: a Telegram file id, a local path, ...
    pub url: String,
    /// Optional MIME type.
    pub mime_type: Option<String>,
    /// Optional file name.
    pub file_name: Option<String>,
    /// File size in bytes, if known.
    pub file_size: Option<u64>,
}

impl MediaAttachment {
    /// Create an attachment of the given type.
    pub fn new(media_type: MediaType, url: impl Into<String>) -> Self {
        Self {
            media_type,
            url: url.into(),
            mime_type: None,
            file_name: None,
            file_size: None,
        }
    }

    /// Create a photo attachment.
    pub fn photo(url: impl Into<String>) -> Self {
        Self::new(MediaType::Photo, url)
    }

    /// Set the file size.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.file_size = Some(size);
        self
    }

    /// Set the file name.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// Type of media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Compressed photo (the only media the conversation accepts).
    Photo,
    /// Document or other file.
    Document,
    /// Anything else (stickers, voice, video, ...).
    Other,
}

/// An inbound message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Unique message ID.
    pub id: String,
    /// Channel identifier (e.g., "telegram", "cli").
    pub channel: String,
    /// Sender's identifier within the channel.
    pub sender_id: String,
    /// Chat/conversation identifier.
    pub chat_id: String,
    /// Message text or caption.
    pub content: String,
    /// Media attachments.
    #[serde(default)]
    pub media: Vec<MediaAttachment>,
    /// Timestamp when the message was received.
    pub timestamp: SystemTime,
}

impl InboundMessage {
    /// Create a new inbound message with minimal required fields.
    pub fn new(
        channel: impl Into<String>,
        sender_id: impl Into<String>,
        chat_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_message_id(),
            channel: channel.into(),
            sender_id: sender_id.into(),
            chat_id: chat_id.into(),
            content: content.into(),
            media: Vec::new(),
            timestamp: SystemTime::now(),
        }
    }

    /// Create a CLI message.
    pub fn cli(chat_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new("cli", "user", chat_id, content)
    }

    /// Unique session key for this conversation.
    #[must_use]
    pub fn session_key(&self) -> String {
        format!("{}:{}", self.channel, self.chat_id)
    }

    /// Add a media attachment.
    #[must_use]
    pub fn with_media(mut self, attachment: MediaAttachment) -> Self {
        self.media.push(attachment);
        self
    }

    /// Bot command name without the slash, bot mention or arguments.
    ///
    /// `"/start@my_bot now"` yields `Some("start")`.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        let rest = self.content.trim_start().strip_prefix('/')?;
        let word = rest.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        (!name.is_empty()).then_some(name)
    }

    /// First photo attachment, if any.
    #[must_use]
    pub fn photo(&self) -> Option<&MediaAttachment> {
        self.media
            .iter()
            .find(|m| m.media_type == MediaType::Photo)
    }

    /// Trimmed text content, if non-empty.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let text = self.content.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// An outbound message to a chat: text, documents, or both.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Unique message ID.
    pub id: String,
    /// Target channel identifier.
    pub channel: String,
    /// Target chat/conversation identifier.
    pub chat_id: String,
    /// Message text. Empty for document-only messages.
    pub content: String,
    /// Documents to deliver after the text, in order.
    pub documents: Vec<Artifact>,
    /// Optional message ID this replies to.
    pub reply_to: Option<String>,
}

impl OutboundMessage {
    /// Create a new text message.
    pub fn new(
        channel: impl Into<String>,
        chat_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_message_id(),
            channel: channel.into(),
            chat_id: chat_id.into(),
            content: content.into(),
            documents: Vec::new(),
            reply_to: None,
        }
    }

    /// Create a text reply to an inbound message.
    pub fn reply_to(msg: &InboundMessage, content: impl Into<String>) -> Self {
        Self {
            reply_to: Some(msg.id.clone()),
            ..Self::new(msg.channel.clone(), msg.chat_id.clone(), content)
        }
    }

    /// Create a document-only reply to an inbound message.
    pub fn documents_for(msg: &InboundMessage, documents: Vec<Artifact>) -> Self {
        Self {
            documents,
            ..Self::reply_to(msg, String::new())
        }
    }

    /// Attach a document.
    #[must_use]
    pub fn with_document(mut self, document: Artifact) -> Self {
        self.documents.push(document);
        self
    }

    /// Whether the message carries text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_message_creation() {
        let msg = InboundMessage::new("telegram", "user123", "chat456", "Hello!");
        assert_eq!(msg.channel, "telegram");
        assert_eq!(msg.sender_id, "user123");
        assert_eq!(msg.session_key(), "telegram:chat456");
        assert_eq!(msg.text(), Some("Hello!"));
        assert!(msg.command().is_none());
    }

    #[test]
    fn test_command_parsing() {
        let cmd = |s: &str| InboundMessage::cli("c", s).command().map(str::to_owned);
        assert_eq!(cmd("/start"), Some("start".into()));
        assert_eq!(cmd("  /start@preview_bot extra"), Some("start".into()));
        assert_eq!(cmd("/cancel"), Some("cancel".into()));
        assert_eq!(cmd("/"), None);
        assert_eq!(cmd("start"), None);
    }

    #[test]
    fn test_photo_lookup() {
        let msg = InboundMessage::cli("c", "")
            .with_media(MediaAttachment::new(MediaType::Document, "doc"))
            .with_media(MediaAttachment::photo("file-1").with_size(42));
        assert_eq!(msg.photo().map(|m| m.url.as_str()), Some("file-1"));
        assert!(msg.text().is_none());
    }

    #[test]
    fn test_outbound_reply() {
        let inbound = InboundMessage::new("telegram", "user123", "chat456", "Hi");
        let outbound = OutboundMessage::reply_to(&inbound, "Hello back!");

        assert_eq!(outbound.channel, "telegram");
        assert_eq!(outbound.chat_id, "chat456");
        assert_eq!(outbound.reply_to, Some(inbound.id.clone()));
        assert!(outbound.has_text());

        let docs = OutboundMessage::documents_for(&inbound, vec![Artifact::pdf("s", vec![1])]);
        assert!(!docs.has_text());
        assert_eq!(docs.documents.len(), 1);
    }
}
