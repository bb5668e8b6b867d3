//! Per-message link enforcement.

use crate::ModerationContext;
use linkguard_core::{Capability, InboundMessage};
use linkguard_error::PlatformErrorKind;
use linkguard_interface::ChatPlatform;
use linkguard_security::LinkSignal;
use tracing::{debug, info, instrument};

/// Why a message was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AllowReason {
    /// Channel-relayed or service message without an author
    #[display("no author")]
    NoAuthor,
    /// Author is the owner
    #[display("owner")]
    Owner,
    /// Author administers the chat
    #[display("chat admin")]
    ChatAdmin,
    /// Author is exempted in the chat
    #[display("exempted")]
    Exempted,
    /// Message carries no link
    #[display("no link")]
    NoLink,
    /// The agent cannot delete messages in the chat
    #[display("agent cannot delete")]
    AgentCannotDelete,
}

/// What the pipeline decided for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationDecision {
    /// Leave the message
    Allow(AllowReason),
    /// Delete the message
    Delete(LinkSignal),
}

/// What happened after the decision was carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Message left alone
    Allowed(AllowReason),
    /// Message deleted
    Deleted,
    /// Deletion attempted and refused; not retried
    DeleteFailed(PlatformErrorKind),
}

/// Decides, for every inbound group message, whether its link is deleted.
///
/// Checks run in a fixed order and stop at the first that allows the message:
///
/// 1. no author
/// 2. author is the owner
/// 3. author is a chat admin (live query)
/// 4. author is exempted
/// 5. no link in the message
/// 6. agent lacks the delete right (live query)
///
/// A message that passes all six is deleted. The remote rights check runs
/// last so messages that would be allowed anyway cost no extra call.
pub struct ModerationPipeline<P: ChatPlatform + ?Sized> {
    ctx: ModerationContext<P>,
}

impl<P: ChatPlatform + ?Sized> ModerationPipeline<P> {
    /// Create a pipeline over the shared context.
    pub fn new(ctx: ModerationContext<P>) -> Self {
        Self { ctx }
    }

    /// Decide what to do with `message` without acting on it.
    #[instrument(skip_all, fields(chat = %message.chat(), message_id = %message.message_id()))]
    pub async fn evaluate(&self, message: &InboundMessage) -> ModerationDecision {
        let chat = *message.chat();
        let Some(author) = *message.author() else {
            return ModerationDecision::Allow(AllowReason::NoAuthor);
        };

        if self.ctx.resolver.is_owner(author) {
            return ModerationDecision::Allow(AllowReason::Owner);
        }
        if self.ctx.resolver.is_chat_admin(chat, author).await {
            return ModerationDecision::Allow(AllowReason::ChatAdmin);
        }
        if self.ctx.exemptions.is_exempt(chat, author) {
            return ModerationDecision::Allow(AllowReason::Exempted);
        }

        let Some(signal) = self.ctx.classifier.classify(message) else {
            return ModerationDecision::Allow(AllowReason::NoLink);
        };

        if !self
            .ctx
            .resolver
            .agent_has_capability(chat, &[Capability::DeleteMessages])
            .await
        {
            debug!("Link found but agent cannot delete");
            return ModerationDecision::Allow(AllowReason::AgentCannotDelete);
        }

        ModerationDecision::Delete(signal)
    }

    /// Observe the author, decide, and delete when the decision says so.
    ///
    /// Deletion is best effort: a refusal is logged at debug level and
    /// reported in the outcome, never retried and never surfaced to the chat.
    #[instrument(skip_all, fields(chat = %message.chat(), message_id = %message.message_id()))]
    pub async fn handle(&self, message: &InboundMessage) -> ModerationOutcome {
        if let Some(author) = *message.author() {
            self.ctx.observer.observe(*message.chat(), author);
        }

        match self.evaluate(message).await {
            ModerationDecision::Allow(reason) => {
                debug!(%reason, "Message allowed");
                ModerationOutcome::Allowed(reason)
            }
            ModerationDecision::Delete(signal) => {
                match self
                    .ctx
                    .platform
                    .delete_message(*message.chat(), *message.message_id())
                    .await
                {
                    Ok(()) => {
                        info!(?signal, author = ?message.author(), "Deleted link message");
                        ModerationOutcome::Deleted
                    }
                    Err(e) => {
                        debug!(error = %e, "Link deletion failed");
                        ModerationOutcome::DeleteFailed(e.kind)
                    }
                }
            }
        }
    }
}
