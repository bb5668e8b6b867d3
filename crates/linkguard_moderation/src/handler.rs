//! Operator command handlers.

use crate::{
    CommandError, CommandErrorKind, CommandName, CommandResult, ModerationContext, ParsedCommand,
    SweepEngine, SweepReport, resolve_target,
};
use linkguard_core::{Capability, ChatId, InboundMessage, PROMOTION_GRANTS, UserId};
use linkguard_error::PlatformErrorKind;
use linkguard_interface::ChatPlatform;
use linkguard_security::Requirement;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Result of the promotion attempted by `/op`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// The user now administers the chat
    Promoted,
    /// The platform refused the promotion; the exemption still stands
    Failed(PlatformErrorKind),
}

/// One line of the `/whitelist` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistEntry {
    /// Exempted user
    pub user: UserId,
    /// Display name, when the platform could describe the user
    pub name: Option<String>,
}

impl fmt::Display for WhitelistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.user),
            None => write!(f, "{}", self.user),
        }
    }
}

/// Successful result of a command, rendered as the reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// `/op` exempted the user and tried to promote them
    Opped {
        /// Target
        user: UserId,
        /// False when the user was already exempt
        newly_exempted: bool,
        /// What the promotion did
        promotion: PromotionOutcome,
    },
    /// `/unop` revoked an exemption
    Unopped {
        /// Target
        user: UserId,
        /// False when the user was not exempt
        removed: bool,
    },
    /// `/kill` banned the user
    Killed {
        /// Target
        user: UserId,
    },
    /// `/whitelist` listing
    Whitelist(Vec<WhitelistEntry>),
    /// `/yo` sweep summary
    Swept(SweepReport),
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandReply::Opped {
                user,
                newly_exempted,
                promotion,
            } => {
                if *newly_exempted {
                    write!(f, "User {} whitelisted", user)?;
                } else {
                    write!(f, "User {} was already whitelisted", user)?;
                }
                match promotion {
                    PromotionOutcome::Promoted => write!(f, " and promoted."),
                    PromotionOutcome::Failed(reason) => {
                        write!(f, ", promotion failed: {}", reason)
                    }
                }
            }
            CommandReply::Unopped { user, removed: true } => {
                write!(f, "User {} removed from the whitelist.", user)
            }
            CommandReply::Unopped {
                user,
                removed: false,
            } => write!(f, "User {} was not whitelisted.", user),
            CommandReply::Killed { user } => write!(f, "User {} banned.", user),
            CommandReply::Whitelist(entries) if entries.is_empty() => {
                write!(f, "Whitelist is empty.")
            }
            CommandReply::Whitelist(entries) => {
                write!(f, "Whitelisted users:")?;
                for entry in entries {
                    write!(f, "\n- {}", entry)?;
                }
                Ok(())
            }
            CommandReply::Swept(report) if report.is_noop() => {
                write!(f, "No members to ban.")
            }
            CommandReply::Swept(report) => {
                write!(f, "Banned {} members", report.banned())?;
                if !report.failed().is_empty() {
                    write!(f, ", {} failed", report.failed().len())?;
                }
                write!(f, ".")
            }
        }
    }
}

/// Runs operator commands.
///
/// Every handler starts with an explicit privilege guard and returns a
/// rejection as a [`CommandError`] instead of acting. `/op`, `/unop` and `/yo`
/// are owner-only; `/kill` and `/whitelist` also accept chat administrators.
pub struct CommandHandler<P: ChatPlatform + ?Sized> {
    ctx: ModerationContext<P>,
    sweep: SweepEngine<P>,
}

impl<P: ChatPlatform + ?Sized> CommandHandler<P> {
    /// Create a handler over the shared context.
    pub fn new(ctx: ModerationContext<P>) -> Self {
        let sweep = SweepEngine::new(ctx.clone());
        Self { ctx, sweep }
    }

    /// Whether `command` is meant for this agent.
    ///
    /// A `/command@bot` suffix naming another bot means the command belongs to
    /// that bot; an unsuffixed command is addressed to every bot in the chat.
    pub async fn accepts(&self, command: &ParsedCommand) -> bool {
        match command.addressee.as_deref() {
            None => true,
            Some(handle) => self.ctx.resolver.is_agent_handle(handle).await,
        }
    }

    /// Run `command`, invoked by the author of `message`.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] whose text is meant for the invoking user:
    /// insufficient standing, a missing or unresolvable target, a protected
    /// target, a missing agent right or a refused platform action.
    #[instrument(skip_all, fields(chat = %message.chat(), command = %command.name))]
    pub async fn handle(
        &self,
        message: &InboundMessage,
        command: &ParsedCommand,
    ) -> CommandResult<CommandReply> {
        let chat = *message.chat();
        let Some(invoker) = *message.author() else {
            return Err(CommandError::new(CommandErrorKind::AnonymousInvoker));
        };

        let requirement = match command.name {
            CommandName::Op | CommandName::Unop | CommandName::Yo => Requirement::Owner,
            CommandName::Kill | CommandName::Whitelist => Requirement::OwnerOrAdmin,
        };
        let standing = self
            .ctx
            .resolver
            .guard(command.name.as_ref(), requirement, chat, invoker)
            .await?;
        debug!(invoker = %invoker, %standing, "Command authorized");

        let args = command.args.as_deref();
        match command.name {
            CommandName::Op => self.op(message, args).await,
            CommandName::Unop => self.unop(message, args).await,
            CommandName::Kill => self.kill(message, args).await,
            CommandName::Whitelist => Ok(self.whitelist(chat).await),
            CommandName::Yo => self.yo(chat).await,
        }
    }

    async fn op(
        &self,
        message: &InboundMessage,
        args: Option<&str>,
    ) -> CommandResult<CommandReply> {
        let chat = *message.chat();
        let user = resolve_target(&*self.ctx.platform, message, CommandName::Op, args).await?;
        self.ctx.resolver.ensure_targetable(user).await?;

        let newly_exempted = self.ctx.exemptions.add(chat, user).await;
        let promotion = match self
            .ctx
            .platform
            .promote_chat_member(chat, user, &PROMOTION_GRANTS)
            .await
        {
            Ok(()) => PromotionOutcome::Promoted,
            Err(e) => {
                warn!(user = %user, error = %e, "Promotion failed, exemption kept");
                PromotionOutcome::Failed(e.kind)
            }
        };

        info!(user = %user, newly_exempted, ?promotion, "Operator granted");
        Ok(CommandReply::Opped {
            user,
            newly_exempted,
            promotion,
        })
    }

    async fn unop(
        &self,
        message: &InboundMessage,
        args: Option<&str>,
    ) -> CommandResult<CommandReply> {
        let user = resolve_target(&*self.ctx.platform, message, CommandName::Unop, args).await?;
        let removed = self.ctx.exemptions.remove(*message.chat(), user).await;
        Ok(CommandReply::Unopped { user, removed })
    }

    async fn kill(
        &self,
        message: &InboundMessage,
        args: Option<&str>,
    ) -> CommandResult<CommandReply> {
        let chat = *message.chat();
        let user = resolve_target(&*self.ctx.platform, message, CommandName::Kill, args).await?;
        self.ctx.resolver.ensure_targetable(user).await?;
        self.ctx
            .resolver
            .require_capability(chat, Capability::RestrictMembers)
            .await?;

        self.ctx
            .platform
            .ban_chat_member(chat, user)
            .await
            .map_err(|e| {
                warn!(user = %user, error = %e, "Ban refused");
                CommandError::new(CommandErrorKind::ActionFailed {
                    command: CommandName::Kill.to_string(),
                    reason: e.kind,
                })
            })?;
        self.ctx.observer.forget(chat, [user]);

        info!(user = %user, "Member banned");
        Ok(CommandReply::Killed { user })
    }

    async fn whitelist(&self, chat: ChatId) -> CommandReply {
        let mut entries = Vec::new();
        for user in self.ctx.exemptions.list(chat) {
            let name = match self.ctx.platform.get_user(user).await {
                Ok(profile) => Some(profile.display_name()),
                Err(e) => {
                    debug!(user = %user, error = %e, "No profile, listing bare id");
                    None
                }
            };
            entries.push(WhitelistEntry { user, name });
        }
        CommandReply::Whitelist(entries)
    }

    async fn yo(&self, chat: ChatId) -> CommandResult<CommandReply> {
        let report = self.sweep.sweep_ban(chat).await.map_err(|e| {
            CommandError::new(CommandErrorKind::ActionFailed {
                command: CommandName::Yo.to_string(),
                reason: e.kind,
            })
        })?;
        Ok(CommandReply::Swept(report))
    }
}
