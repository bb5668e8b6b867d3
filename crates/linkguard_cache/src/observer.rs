//! Seen-members cache implementation.

use linkguard_core::{ChatId, UserId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Users observed authoring messages, per chat.
///
/// # Example
///
/// ```
/// use linkguard_cache::MembershipObserver;
/// use linkguard_core::{ChatId, UserId};
///
/// let observer = MembershipObserver::new();
/// let chat = ChatId::new(-100);
///
/// observer.observe(chat, UserId::new(1));
/// observer.observe(chat, UserId::new(1));
/// observer.observe(chat, UserId::new(2));
/// assert_eq!(observer.seen(chat).len(), 2);
///
/// observer.forget(chat, [UserId::new(1)]);
/// assert!(!observer.contains(chat, UserId::new(1)));
/// ```
#[derive(Debug, Default)]
pub struct MembershipObserver {
    seen: Mutex<HashMap<ChatId, HashSet<UserId>>>,
}

impl MembershipObserver {
    /// Create an empty observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user` posted in `chat`. Idempotent.
    pub fn observe(&self, chat: ChatId, user: UserId) {
        let inserted = self.seen.lock().entry(chat).or_default().insert(user);
        if inserted {
            tracing::trace!(chat = %chat, user = %user, "Observed new member");
        }
    }

    /// Snapshot of the users seen in `chat`.
    pub fn seen(&self, chat: ChatId) -> HashSet<UserId> {
        self.seen.lock().get(&chat).cloned().unwrap_or_default()
    }

    /// Whether `user` has been seen in `chat`.
    pub fn contains(&self, chat: ChatId, user: UserId) -> bool {
        self.seen
            .lock()
            .get(&chat)
            .is_some_and(|users| users.contains(&user))
    }

    /// Drop `users` from the seen set of `chat`.
    ///
    /// Returns how many were actually present.
    pub fn forget(&self, chat: ChatId, users: impl IntoIterator<Item = UserId>) -> usize {
        let mut seen = self.seen.lock();
        let Some(members) = seen.get_mut(&chat) else {
            return 0;
        };
        let removed = users.into_iter().filter(|u| members.remove(u)).count();
        if members.is_empty() {
            seen.remove(&chat);
        }
        tracing::debug!(chat = %chat, removed, "Forgot observed members");
        removed
    }

    /// Drop everything observed in `chat`.
    pub fn clear(&self, chat: ChatId) {
        if let Some(members) = self.seen.lock().remove(&chat) {
            tracing::info!(chat = %chat, cleared = members.len(), "Cleared observed members");
        }
    }

    /// Total observations across all chats.
    pub fn len(&self) -> usize {
        self.seen.lock().values().map(HashSet::len).sum()
    }

    /// Whether nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
