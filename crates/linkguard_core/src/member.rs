//! Chat membership records.

use crate::{Capability, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A member's standing in a chat.
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
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberStatus {
    /// Created the chat; holds every right
    Creator,
    /// Administrator with an explicit set of rights
    Administrator,
    /// Regular member
    Member,
    /// Member with restrictions applied
    Restricted,
    /// No longer in the chat
    Left,
    /// Banned from the chat
    Banned,
}

impl MemberStatus {
    /// Whether the status carries administrative standing.
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberStatus::Creator | MemberStatus::Administrator)
    }
}

/// One user's membership in one chat, as reported by the platform.
///
/// # Examples
///
/// ```
/// use linkguard_core::{Capability, ChatMember, MemberStatus, UserId};
///
/// let admin = ChatMember::administrator(UserId::new(5), [Capability::DeleteMessages]);
/// assert!(admin.has_capability(Capability::DeleteMessages));
/// assert!(!admin.has_capability(Capability::RestrictMembers));
///
/// let creator = ChatMember::new(UserId::new(6), MemberStatus::Creator);
/// assert!(creator.has_capability(Capability::RestrictMembers));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    /// The member
    pub user: UserId,
    /// Standing in the chat
    pub status: MemberStatus,
    /// Rights explicitly granted (only meaningful for administrators)
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
}

impl ChatMember {
    /// A member with the given status and no explicit rights.
    pub fn new(user: UserId, status: MemberStatus) -> Self {
        Self {
            user,
            status,
            capabilities: BTreeSet::new(),
        }
    }

    /// An administrator holding exactly `capabilities`.
    pub fn administrator(user: UserId, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            user,
            status: MemberStatus::Administrator,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Whether this member may exercise `capability`.
    ///
    /// The creator holds every right. Administrators hold only what was granted.
    /// Everyone else holds nothing.
    pub fn has_capability(&self, capability: Capability) -> bool {
        match self.status {
            MemberStatus::Creator => true,
            MemberStatus::Administrator => self.capabilities.contains(&capability),
            _ => false,
        }
    }

    /// Whether this member holds every capability in `required`.
    pub fn has_all<'a>(&self, required: impl IntoIterator<Item = &'a Capability>) -> bool {
        required.into_iter().all(|c| self.has_capability(*c))
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id
    pub id: UserId,
    /// Public handle without the leading `@`
    #[serde(default)]
    pub username: Option<String>,
    /// Given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Whether the account is a bot
    #[serde(default)]
    pub is_bot: bool,
}

impl UserProfile {
    /// A profile carrying only an id.
    pub fn bare(id: UserId) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
            is_bot: false,
        }
    }

    /// First name, else username, else the numeric id.
    pub fn display_name(&self) -> String {
        self.first_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.username.as_deref().filter(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_members_hold_no_capabilities() {
        let mut member = ChatMember::new(UserId::new(1), MemberStatus::Member);
        member.capabilities.insert(Capability::DeleteMessages);
        assert!(!member.has_capability(Capability::DeleteMessages));
    }

    #[test]
    fn has_all_requires_every_capability() {
        let admin = ChatMember::administrator(
            UserId::new(2),
            [Capability::DeleteMessages, Capability::InviteUsers],
        );
        assert!(admin.has_all(&[Capability::DeleteMessages]));
        assert!(!admin.has_all(&[Capability::DeleteMessages, Capability::RestrictMembers]));
        assert!(admin.has_all(&[]));
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut profile = UserProfile::bare(UserId::new(99));
        assert_eq!(profile.display_name(), "99");
        profile.username = Some("spammer".into());
        assert_eq!(profile.display_name(), "spammer");
        profile.first_name = Some("Ann".into());
        assert_eq!(profile.display_name(), "Ann");
    }
}
