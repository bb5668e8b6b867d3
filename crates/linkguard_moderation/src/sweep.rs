//! Bulk ban of observed members.

use crate::ModerationContext;
use derive_getters::Getters;
use linkguard_core::{ChatId, UserId};
use linkguard_error::{PlatformErrorKind, PlatformResult};
use linkguard_interface::ChatPlatform;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct SweepReport {
    /// Members seen in the chat when the sweep started
    seen: usize,
    /// Members the sweep tried to ban
    candidates: usize,
    /// Bans that succeeded
    banned: usize,
    /// Bans that failed, with the platform's reason
    failed: Vec<(UserId, PlatformErrorKind)>,
}

impl SweepReport {
    /// Whether the sweep attempted nothing.
    pub fn is_noop(&self) -> bool {
        self.candidates == 0
    }
}

/// Bans every member seen posting in a chat who is not privileged.
///
/// Candidates are the seen members minus the live administrator roster, the
/// owner, the agent and exempted users. Bans run one at a time; a failure is
/// recorded and the sweep moves on. Every attempted candidate is dropped from
/// the seen set whether or not the ban succeeded, so a failed ban is not
/// retried by the next sweep.
pub struct SweepEngine<P: ChatPlatform + ?Sized> {
    ctx: ModerationContext<P>,
}

impl<P: ChatPlatform + ?Sized> SweepEngine<P> {
    /// Create an engine over the shared context.
    pub fn new(ctx: ModerationContext<P>) -> Self {
        Self { ctx }
    }

    /// Sweep `chat`.
    ///
    /// # Errors
    ///
    /// Returns the platform error when the administrator roster or the agent's
    /// own identity cannot be fetched. Nothing is banned and the seen set is
    /// left untouched in that case.
    #[instrument(skip_all, fields(chat = %chat))]
    pub async fn sweep_ban(&self, chat: ChatId) -> PlatformResult<SweepReport> {
        let seen = self.ctx.observer.seen(chat);
        if seen.is_empty() {
            debug!("No observed members, nothing to sweep");
            return Ok(SweepReport::default());
        }

        let admins: HashSet<UserId> = self
            .ctx
            .platform
            .get_chat_administrators(chat)
            .await
            .inspect_err(|e| warn!(error = %e, "Could not fetch administrators, sweep aborted"))?
            .into_iter()
            .map(|member| member.user)
            .collect();
        let agent = self
            .ctx
            .resolver
            .agent_id()
            .await
            .inspect_err(|e| warn!(error = %e, "Could not resolve agent, sweep aborted"))?;

        let mut candidates: Vec<UserId> = seen
            .iter()
            .copied()
            .filter(|user| {
                !admins.contains(user)
                    && !self.ctx.resolver.is_owner(*user)
                    && *user != agent
                    && !self.ctx.exemptions.is_exempt(chat, *user)
            })
            .collect();
        candidates.sort();

        let mut report = SweepReport {
            seen: seen.len(),
            candidates: candidates.len(),
            ..SweepReport::default()
        };
        if candidates.is_empty() {
            debug!(seen = report.seen, "No candidates after exclusions");
            return Ok(report);
        }

        info!(candidates = report.candidates, "Starting sweep");
        for user in candidates {
            match self.ctx.platform.ban_chat_member(chat, user).await {
                Ok(()) => {
                    debug!(user = %user, "Banned");
                    report.banned += 1;
                }
                Err(e) => {
                    debug!(user = %user, error = %e, "Ban failed");
                    report.failed.push((user, e.kind));
                }
            }
            self.ctx.observer.forget(chat, [user]);
        }

        info!(
            banned = report.banned,
            failed = report.failed.len(),
            "Sweep complete"
        );
        Ok(report)
    }
}
