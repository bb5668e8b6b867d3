//! The platform collaborator.

use async_trait::async_trait;
use linkguard_core::{Capability, ChatId, ChatMember, MessageId, UserId, UserProfile};
use linkguard_error::PlatformResult;

/// Operations the moderation core needs from the chat platform.
///
/// Every call may fail with a [`linkguard_error::PlatformError`]. Callers decide
/// per operation whether a failure means "not allowed", "not found" or "try
/// nothing"; implementations only report what happened.
///
/// # Tracing
///
/// Implementations should instrument each call with the chat and user ids so a
/// failed moderation decision can be traced back to the platform response.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Membership record of `user` in `chat`.
    async fn get_chat_member(&self, chat: ChatId, user: UserId) -> PlatformResult<ChatMember>;

    /// Current administrator roster of `chat`, creator included.
    async fn get_chat_administrators(&self, chat: ChatId) -> PlatformResult<Vec<ChatMember>>;

    /// Delete one message.
    async fn delete_message(&self, chat: ChatId, message: MessageId) -> PlatformResult<()>;

    /// Ban `user` from `chat`.
    async fn ban_chat_member(&self, chat: ChatId, user: UserId) -> PlatformResult<()>;

    /// Make `user` an administrator holding `capabilities`.
    async fn promote_chat_member(
        &self,
        chat: ChatId,
        user: UserId,
        capabilities: &[Capability],
    ) -> PlatformResult<()>;

    /// Look a user up by handle (`@name` or bare name).
    async fn resolve_user_by_handle(&self, handle: &str) -> PlatformResult<UserProfile>;

    /// Profile of a known user id.
    async fn get_user(&self, user: UserId) -> PlatformResult<UserProfile>;

    /// The agent's own account.
    async fn get_self_identity(&self) -> PlatformResult<UserProfile>;

    /// Post `text` in `chat` as a reply to `reply_to`.
    async fn reply(&self, chat: ChatId, reply_to: MessageId, text: &str) -> PlatformResult<()>;
}
