//! Administrative capability flags.

use serde::{Deserialize, Serialize};

/// A named administrative right an administrator may hold in a chat.
///
/// # Examples
///
/// ```
/// use linkguard_core::Capability;
///
/// assert_eq!(Capability::DeleteMessages.to_string(), "delete_messages");
/// let parsed: Capability = "restrict_members".parse().unwrap();
/// assert_eq!(parsed, Capability::RestrictMembers);
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Edit the chat title, photo and description
    ChangeInfo,
    /// Delete messages of other members
    DeleteMessages,
    /// Ban, kick and restrict members
    RestrictMembers,
    /// Create invite links and add members
    InviteUsers,
    /// Pin messages
    PinMessages,
    /// Appoint new administrators
    PromoteMembers,
    /// Start and manage voice/video chats
    ManageVideoChats,
}

/// Rights granted to a user promoted with `/op`.
pub const PROMOTION_GRANTS: [Capability; 3] = [
    Capability::DeleteMessages,
    Capability::RestrictMembers,
    Capability::InviteUsers,
];
