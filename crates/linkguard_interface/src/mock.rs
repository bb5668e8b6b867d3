//! In-memory platform for tests.

use crate::ChatPlatform;
use async_trait::async_trait;
use linkguard_core::{
    Capability, ChatId, ChatMember, MemberStatus, MessageId, UserId, UserProfile,
};
use linkguard_error::{PlatformError, PlatformErrorKind, PlatformResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// One call received by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    /// `get_chat_member`
    GetChatMember(ChatId, UserId),
    /// `get_chat_administrators`
    GetChatAdministrators(ChatId),
    /// `delete_message`
    DeleteMessage(ChatId, MessageId),
    /// `ban_chat_member`
    BanChatMember(ChatId, UserId),
    /// `promote_chat_member`
    PromoteChatMember(ChatId, UserId, Vec<Capability>),
    /// `resolve_user_by_handle`
    ResolveUserByHandle(String),
    /// `get_user`
    GetUser(UserId),
    /// `get_self_identity`
    GetSelfIdentity,
    /// `reply`
    Reply(ChatId, MessageId, String),
}

#[derive(Debug, Default)]
struct MockState {
    agent: Option<UserProfile>,
    members: HashMap<(ChatId, UserId), ChatMember>,
    profiles: HashMap<UserId, UserProfile>,
    handles: HashMap<String, UserId>,
    ban_failures: HashMap<UserId, PlatformErrorKind>,
    delete_failure: Option<PlatformErrorKind>,
    promote_failure: Option<PlatformErrorKind>,
    unreachable: bool,
    calls: Vec<PlatformCall>,
}

/// Scriptable [`ChatPlatform`] that keeps its state in memory and records calls.
///
/// Unknown members are reported as regular members; unknown users and handles
/// are `NotFound`. Setting [`MockPlatform::set_unreachable`] makes every call fail
/// with a transport error.
///
/// # Example
///
/// ```rust,ignore
/// use linkguard_core::{Capability, ChatId, ChatMember, UserId};
/// use linkguard_interface::MockPlatform;
///
/// let chat = ChatId::new(-1);
/// let platform = MockPlatform::new(UserId::new(900));
/// platform.add_member(chat, ChatMember::administrator(UserId::new(900), [Capability::DeleteMessages]));
/// assert!(platform.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockPlatform {
    state: Mutex<MockState>,
}

impl MockPlatform {
    /// A platform on which the agent is `agent`.
    pub fn new(agent: UserId) -> Self {
        let platform = Self::default();
        platform.state.lock().agent = Some(UserProfile::bare(agent));
        platform
    }

    /// Replace the agent's own profile, e.g. to give it a username.
    pub fn set_agent(&self, profile: UserProfile) {
        self.state.lock().agent = Some(profile);
    }

    /// Register or replace a membership record.
    pub fn add_member(&self, chat: ChatId, member: ChatMember) {
        self.state.lock().members.insert((chat, member.user), member);
    }

    /// Register a user profile, resolvable by `@username` when it has one.
    pub fn add_user(&self, profile: UserProfile) {
        let mut state = self.state.lock();
        if let Some(name) = &profile.username {
            state.handles.insert(format!("@{}", name), profile.id);
            state.handles.insert(name.clone(), profile.id);
        }
        state.profiles.insert(profile.id, profile);
    }

    /// Make bans of `user` fail with `kind`.
    pub fn fail_ban(&self, user: UserId, kind: PlatformErrorKind) {
        self.state.lock().ban_failures.insert(user, kind);
    }

    /// Make every deletion fail with `kind`.
    pub fn fail_deletes(&self, kind: PlatformErrorKind) {
        self.state.lock().delete_failure = Some(kind);
    }

    /// Make every promotion fail with `kind`.
    pub fn fail_promotions(&self, kind: PlatformErrorKind) {
        self.state.lock().promote_failure = Some(kind);
    }

    /// Toggle a transport outage.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().calls.clone()
    }

    /// Users a ban was attempted on, in order.
    pub fn ban_attempts(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::BanChatMember(_, user) => Some(user),
                _ => None,
            })
            .collect()
    }

    /// Messages a deletion was attempted on.
    pub fn delete_attempts(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::DeleteMessage(_, message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Texts of every reply sent.
    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Reply(_, _, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Users banned so far (successful bans only).
    pub fn banned(&self) -> HashSet<UserId> {
        let state = self.state.lock();
        state
            .members
            .values()
            .filter(|m| m.status == MemberStatus::Banned)
            .map(|m| m.user)
            .collect()
    }

    fn record(&self, call: PlatformCall) -> PlatformResult<()> {
        let mut state = self.state.lock();
        tracing::trace!(?call, "mock platform call");
        state.calls.push(call);
        if state.unreachable {
            return Err(PlatformError::new(PlatformErrorKind::Transport(
                "mock platform unreachable".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn get_chat_member(&self, chat: ChatId, user: UserId) -> PlatformResult<ChatMember> {
        self.record(PlatformCall::GetChatMember(chat, user))?;
        let state = self.state.lock();
        Ok(state
            .members
            .get(&(chat, user))
            .cloned()
            .unwrap_or_else(|| ChatMember::new(user, MemberStatus::Member)))
    }

    async fn get_chat_administrators(&self, chat: ChatId) -> PlatformResult<Vec<ChatMember>> {
        self.record(PlatformCall::GetChatAdministrators(chat))?;
        let state = self.state.lock();
        Ok(state
            .members
            .iter()
            .filter(|((c, _), m)| *c == chat && m.status.is_privileged())
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> PlatformResult<()> {
        self.record(PlatformCall::DeleteMessage(chat, message))?;
        match self.state.lock().delete_failure.clone() {
            Some(kind) => Err(PlatformError::new(kind)),
            None => Ok(()),
        }
    }

    async fn ban_chat_member(&self, chat: ChatId, user: UserId) -> PlatformResult<()> {
        self.record(PlatformCall::BanChatMember(chat, user))?;
        let mut state = self.state.lock();
        if let Some(kind) = state.ban_failures.get(&user) {
            return Err(PlatformError::new(kind.clone()));
        }
        state
            .members
            .insert((chat, user), ChatMember::new(user, MemberStatus::Banned));
        Ok(())
    }

    async fn promote_chat_member(
        &self,
        chat: ChatId,
        user: UserId,
        capabilities: &[Capability],
    ) -> PlatformResult<()> {
        self.record(PlatformCall::PromoteChatMember(
            chat,
            user,
            capabilities.to_vec(),
        ))?;
        let mut state = self.state.lock();
        if let Some(kind) = state.promote_failure.clone() {
            return Err(PlatformError::new(kind));
        }
        state.members.insert(
            (chat, user),
            ChatMember::administrator(user, capabilities.iter().copied()),
        );
        Ok(())
    }

    async fn resolve_user_by_handle(&self, handle: &str) -> PlatformResult<UserProfile> {
        self.record(PlatformCall::ResolveUserByHandle(handle.to_string()))?;
        let state = self.state.lock();
        state
            .handles
            .get(handle)
            .and_then(|id| state.profiles.get(id))
            .cloned()
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::NotFound(handle.to_string())))
    }

    async fn get_user(&self, user: UserId) -> PlatformResult<UserProfile> {
        self.record(PlatformCall::GetUser(user))?;
        self.state
            .lock()
            .profiles
            .get(&user)
            .cloned()
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::NotFound(user.to_string())))
    }

    async fn get_self_identity(&self) -> PlatformResult<UserProfile> {
        self.record(PlatformCall::GetSelfIdentity)?;
        self.state.lock().agent.clone().ok_or_else(|| {
            PlatformError::new(PlatformErrorKind::Transport("agent identity unset".to_string()))
        })
    }

    async fn reply(&self, chat: ChatId, reply_to: MessageId, text: &str) -> PlatformResult<()> {
        self.record(PlatformCall::Reply(chat, reply_to, text.to_string()))
    }
}
