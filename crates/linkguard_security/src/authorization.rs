//! Privilege resolution against the live platform.

use crate::{SecurityError, SecurityErrorKind, SecurityResult};
use linkguard_core::{Capability, ChatId, UserId, UserProfile};
use linkguard_error::{PlatformError, PlatformResult};
use linkguard_interface::ChatPlatform;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

/// Standing of a user in a chat, as far as command access is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Standing {
    /// No administrative standing
    Member,
    /// Chat administrator or creator
    Admin,
    /// The configured owner
    Owner,
}

/// Minimum standing a command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Only the owner
    Owner,
    /// The owner or any chat administrator
    OwnerOrAdmin,
}

/// Answers privilege questions about users and about the agent itself.
///
/// Nothing about chat membership is cached: admin lists and rights can change
/// between two messages, so every check queries the platform. Only the agent's
/// own id is remembered once known.
///
/// Every platform failure resolves to "not privileged". An unreachable status
/// check must never grant admin standing or claim the agent can act.
pub struct AuthorizationResolver<P: ChatPlatform + ?Sized> {
    platform: Arc<P>,
    owner: UserId,
    agent: OnceCell<UserProfile>,
}

impl<P: ChatPlatform + ?Sized> AuthorizationResolver<P> {
    /// Create a resolver for the given platform and owner.
    pub fn new(platform: Arc<P>, owner: UserId) -> Self {
        Self {
            platform,
            owner,
            agent: OnceCell::new(),
        }
    }

    /// The configured owner.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Exact match against the configured owner.
    pub fn is_owner(&self, user: UserId) -> bool {
        user == self.owner
    }

    /// Whether `user` is an administrator or the creator of `chat`.
    ///
    /// Returns false when the status query fails.
    #[instrument(skip_all, fields(chat = %chat, user = %user))]
    pub async fn is_chat_admin(&self, chat: ChatId, user: UserId) -> bool {
        match self.platform.get_chat_member(chat, user).await {
            Ok(member) => {
                debug!(status = %member.status, "Resolved member status");
                member.status.is_privileged()
            }
            Err(e) => {
                debug!(error = %e, "Member status unavailable, treating as non-admin");
                false
            }
        }
    }

    /// The agent's own profile, fetched once and remembered.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the identity has never been fetched and the
    /// lookup fails. A later call retries.
    pub async fn agent_profile(&self) -> PlatformResult<&UserProfile> {
        self.agent
            .get_or_try_init(|| async {
                let me = self.platform.get_self_identity().await?;
                debug!(agent = %me.id, username = ?me.username, "Resolved agent identity");
                Ok::<UserProfile, PlatformError>(me)
            })
            .await
    }

    /// The agent's own user id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::agent_profile`].
    pub async fn agent_id(&self) -> PlatformResult<UserId> {
        self.agent_profile().await.map(|me| me.id)
    }

    /// Whether a command suffix such as `LinkGuardBot` in `/yo@LinkGuardBot`
    /// names the agent.
    ///
    /// Comparison ignores ASCII case and a leading `@`. False when the agent
    /// has no username or its identity cannot be fetched.
    pub async fn is_agent_handle(&self, handle: &str) -> bool {
        let handle = handle.trim_start_matches('@');
        match self.agent_profile().await {
            Ok(me) => me
                .username
                .as_deref()
                .is_some_and(|own| own.trim_start_matches('@').eq_ignore_ascii_case(handle)),
            Err(e) => {
                warn!(error = %e, "Agent identity unavailable, command suffix not matched");
                false
            }
        }
    }

    /// Whether `user` is the agent itself. False if the identity is unknown.
    pub async fn is_agent(&self, user: UserId) -> bool {
        self.agent_id().await.is_ok_and(|agent| agent == user)
    }

    /// Whether the agent is an administrator of `chat` holding every right in
    /// `required`.
    ///
    /// Returns false when either the identity or the status query fails.
    #[instrument(skip_all, fields(chat = %chat, required = ?required))]
    pub async fn agent_has_capability(&self, chat: ChatId, required: &[Capability]) -> bool {
        let agent = match self.agent_id().await {
            Ok(agent) => agent,
            Err(e) => {
                warn!(error = %e, "Agent identity unavailable");
                return false;
            }
        };

        match self.platform.get_chat_member(chat, agent).await {
            Ok(member) => {
                let granted = member.status.is_privileged() && member.has_all(required);
                debug!(status = %member.status, granted, "Checked agent rights");
                granted
            }
            Err(e) => {
                debug!(error = %e, "Agent status unavailable, assuming no rights");
                false
            }
        }
    }

    /// Standing of `user` in `chat`: owner, admin or plain member.
    pub async fn standing(&self, chat: ChatId, user: UserId) -> Standing {
        if self.is_owner(user) {
            Standing::Owner
        } else if self.is_chat_admin(chat, user).await {
            Standing::Admin
        } else {
            Standing::Member
        }
    }

    /// Gate a privileged command.
    ///
    /// Owner-only commands never query the platform. Admin commands query the
    /// invoker's status only when the invoker is not the owner.
    ///
    /// # Errors
    ///
    /// `OwnerOnly` or `AdminOnly` when the invoker's standing is insufficient.
    #[instrument(skip_all, fields(command = %command, chat = %chat, user = %user))]
    pub async fn guard(
        &self,
        command: &str,
        requirement: Requirement,
        chat: ChatId,
        user: UserId,
    ) -> SecurityResult<Standing> {
        match requirement {
            Requirement::Owner if self.is_owner(user) => Ok(Standing::Owner),
            Requirement::Owner => {
                debug!("Rejected: owner-only command");
                Err(SecurityError::new(SecurityErrorKind::OwnerOnly {
                    command: command.to_string(),
                }))
            }
            Requirement::OwnerOrAdmin => match self.standing(chat, user).await {
                Standing::Member => {
                    debug!("Rejected: admin command from member");
                    Err(SecurityError::new(SecurityErrorKind::AdminOnly {
                        command: command.to_string(),
                    }))
                }
                standing => Ok(standing),
            },
        }
    }

    /// Refuse to act on the owner or the agent.
    ///
    /// # Errors
    ///
    /// `ProtectedTarget` when `target` is the owner or the agent.
    pub async fn ensure_targetable(&self, target: UserId) -> SecurityResult<()> {
        if self.is_owner(target) || self.is_agent(target).await {
            return Err(SecurityError::new(SecurityErrorKind::ProtectedTarget {
                user: target,
            }));
        }
        Ok(())
    }

    /// Require the agent to hold `capability` in `chat`.
    ///
    /// # Errors
    ///
    /// `MissingCapability` when the agent lacks it or its status is unknown.
    pub async fn require_capability(
        &self,
        chat: ChatId,
        capability: Capability,
    ) -> SecurityResult<()> {
        if self.agent_has_capability(chat, &[capability]).await {
            Ok(())
        } else {
            Err(SecurityError::new(SecurityErrorKind::MissingCapability {
                capability,
            }))
        }
    }
}
