//! Platform identifiers.
//!
//! Chat, user and message ids are opaque signed integers handed out by the
//! platform. Group chats use negative ids, so none of these are unsigned.

use serde::{Deserialize, Serialize};

/// Identifier of a chat (group, supergroup, private conversation).
///
/// # Examples
///
/// ```
/// use linkguard_core::ChatId;
///
/// let chat: ChatId = "-1001234".parse().unwrap();
/// assert_eq!(chat.get(), -1001234);
/// assert_eq!(chat.to_string(), "-1001234");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct ChatId(i64);

impl ChatId {
    /// Wrap a raw platform id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw platform id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Identifier of a user (human or bot account).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw platform id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw platform id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Identifier of a message, unique within its chat.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Wrap a raw platform id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw platform id.
    pub const fn get(self) -> i64 {
        self.0
    }
}
