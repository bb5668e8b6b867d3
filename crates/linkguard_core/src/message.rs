//! Inbound message shapes.

use crate::{ChatId, MessageId, UserId};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Kind of chat a message arrived in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// One-to-one conversation with the agent
    Private,
    /// Basic group
    Group,
    /// Supergroup
    Supergroup,
    /// Broadcast channel
    Channel,
}

impl ChatKind {
    /// Groups and supergroups are the only chats under moderation.
    pub fn is_group(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// Kind of a structured annotation over a span of message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    /// Span whose visible text is itself a URL
    Url,
    /// Masked link: visible text differs from the target
    TextLink {
        /// Link target
        url: String,
    },
    /// `@handle` mention
    Mention,
    /// `/command`
    BotCommand,
    /// `#hashtag`
    Hashtag,
    /// Email address
    Email,
    /// Anything the moderation core does not care about
    #[serde(other)]
    Other,
}

impl EntityKind {
    /// Whether the annotation marks a link.
    pub fn is_link(&self) -> bool {
        matches!(self, EntityKind::Url | EntityKind::TextLink { .. })
    }
}

/// Annotation over `length` UTF-16 units of text starting at `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    /// What the span is
    #[serde(flatten)]
    pub kind: EntityKind,
    /// Start of the span
    pub offset: usize,
    /// Length of the span
    pub length: usize,
}

impl MessageEntity {
    /// Annotation of the given kind.
    pub fn new(kind: EntityKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }
}

/// A message delivered to the agent.
///
/// # Examples
///
/// ```
/// use linkguard_core::{ChatId, ChatKind, InboundMessage, MessageId, UserId};
///
/// let message = InboundMessage::new(ChatId::new(-100), ChatKind::Supergroup, MessageId::new(1))
///     .with_author(UserId::new(42))
///     .with_text("hello");
///
/// assert_eq!(message.body(), Some("hello"));
/// assert_eq!(*message.author(), Some(UserId::new(42)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct InboundMessage {
    /// Chat the message was posted in
    #[setters(skip)]
    chat: ChatId,
    /// Kind of that chat
    #[setters(skip)]
    chat_kind: ChatKind,
    /// Message id within the chat
    #[setters(skip)]
    message_id: MessageId,
    /// Author; absent for channel-relayed and service messages
    #[serde(default)]
    author: Option<UserId>,
    /// Message text
    #[serde(default)]
    text: Option<String>,
    /// Media caption
    #[serde(default)]
    caption: Option<String>,
    /// Annotations over the text or caption
    #[serde(default)]
    entities: Vec<MessageEntity>,
    /// Author of the message this one replies to
    #[serde(default)]
    reply_to_author: Option<UserId>,
}

impl InboundMessage {
    /// An empty message with no author.
    pub fn new(chat: ChatId, chat_kind: ChatKind, message_id: MessageId) -> Self {
        Self {
            chat,
            chat_kind,
            message_id,
            author: None,
            text: None,
            caption: None,
            entities: Vec::new(),
            reply_to_author: None,
        }
    }

    /// The text to inspect: the message text, else the caption.
    ///
    /// Empty strings count as absent.
    pub fn body(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.caption.as_deref().filter(|c| !c.is_empty()))
    }
}
