//! Event loop feeding inbound messages through moderation.

use crate::{BotConfig, ModerationMetrics};
use linkguard_core::{InboundMessage, UserId};
use linkguard_interface::ChatPlatform;
use linkguard_moderation::{
    CommandHandler, CommandName, CommandReply, ModerationContext, ModerationOutcome,
    ModerationPipeline, ParsedCommand,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Why an event was dropped before moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IgnoreReason {
    /// Private chats and channels are not moderated
    #[display("not a group")]
    NotGroup,
    /// The agent's own messages
    #[display("self-authored")]
    SelfAuthored,
}

/// What happened to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped before moderation
    Ignored(IgnoreReason),
    /// Moderated; not a command
    Moderated(ModerationOutcome),
    /// Moderated, then run as a command
    Command {
        /// Link enforcement outcome for the command message itself
        moderation: ModerationOutcome,
        /// Command that ran
        command: CommandName,
        /// Whether the command succeeded
        succeeded: bool,
    },
}

/// Per-event logic shared by every spawned task.
struct Dispatcher<P: ChatPlatform + ?Sized> {
    ctx: ModerationContext<P>,
    pipeline: ModerationPipeline<P>,
    commands: CommandHandler<P>,
    metrics: ModerationMetrics,
}

impl<P: ChatPlatform + ?Sized> Dispatcher<P> {
    async fn dispatch(&self, message: InboundMessage) -> DispatchOutcome {
        if !message.chat_kind().is_group() {
            debug!(kind = %message.chat_kind(), "Ignoring non-group chat");
            return DispatchOutcome::Ignored(IgnoreReason::NotGroup);
        }
        if let Some(author) = *message.author()
            && self.is_self(author).await
        {
            return DispatchOutcome::Ignored(IgnoreReason::SelfAuthored);
        }

        self.metrics.record_message();
        let moderation = self.pipeline.handle(&message).await;
        match moderation {
            ModerationOutcome::Deleted => {
                self.metrics.record_deletion();
                return DispatchOutcome::Moderated(moderation);
            }
            ModerationOutcome::DeleteFailed(_) => self.metrics.record_deletion_failure(),
            ModerationOutcome::Allowed(_) => {}
        }

        let Some(command) = message.text().as_deref().and_then(ParsedCommand::parse) else {
            return DispatchOutcome::Moderated(moderation);
        };
        if !self.commands.accepts(&command).await {
            debug!(addressee = ?command.addressee, "Command addressed to another bot");
            return DispatchOutcome::Moderated(moderation);
        }

        let (text, succeeded) = match self.commands.handle(&message, &command).await {
            Ok(reply) => {
                self.record_reply(&reply);
                (reply.to_string(), true)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.metrics.record_rejection();
                }
                debug!(error = %e, "Command refused");
                (e.reply_text(), false)
            }
        };

        if let Err(e) = self
            .ctx
            .platform
            .reply(*message.chat(), *message.message_id(), &text)
            .await
        {
            warn!(error = %e, "Failed to send command reply");
        }

        DispatchOutcome::Command {
            moderation,
            command: command.name,
            succeeded,
        }
    }

    async fn is_self(&self, author: UserId) -> bool {
        self.ctx.resolver.is_agent(author).await
    }

    fn record_reply(&self, reply: &CommandReply) {
        self.metrics.record_command();
        match reply {
            CommandReply::Killed { .. } => self.metrics.record_ban(),
            CommandReply::Swept(report) => {
                self.metrics
                    .record_sweep(*report.banned(), report.failed().len());
            }
            _ => {}
        }
    }
}

/// Creates the inbound event queue, bounded by the configured buffer size.
///
/// Producers wait once the buffer is full, so a burst of updates cannot
/// outrun the moderation tasks without limit.
pub fn event_channel(
    config: &BotConfig,
) -> (mpsc::Sender<InboundMessage>, mpsc::Receiver<InboundMessage>) {
    mpsc::channel(*config.event_buffer())
}

/// Consumes inbound events and moderates each one on its own task.
///
/// Events are handled concurrently: a slow platform call in one handler does
/// not hold up the next message. Shared state is only reached through the
/// [`ModerationContext`], whose stores tolerate interleaved handlers.
pub struct BotServer<P: ChatPlatform + ?Sized> {
    dispatcher: Arc<Dispatcher<P>>,
}

impl<P: ChatPlatform + ?Sized + 'static> BotServer<P> {
    /// Creates a server over the shared context.
    pub fn new(ctx: ModerationContext<P>) -> Self {
        Self::with_metrics(ctx, ModerationMetrics::new())
    }

    /// Creates a server that reports into `metrics`.
    pub fn with_metrics(ctx: ModerationContext<P>, metrics: ModerationMetrics) -> Self {
        let dispatcher = Dispatcher {
            pipeline: ModerationPipeline::new(ctx.clone()),
            commands: CommandHandler::new(ctx.clone()),
            ctx,
            metrics,
        };
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Metrics recorded so far.
    pub fn metrics(&self) -> &ModerationMetrics {
        &self.dispatcher.metrics
    }

    /// Handle one event to completion.
    #[instrument(
        skip_all,
        fields(chat = %message.chat(), message_id = %message.message_id())
    )]
    pub async fn handle_event(&self, message: InboundMessage) -> DispatchOutcome {
        self.dispatcher.dispatch(message).await
    }

    /// Run until the sender side of `events` is dropped, then wait for
    /// in-flight handlers to finish.
    #[instrument(skip_all)]
    pub async fn run(self, mut events: mpsc::Receiver<InboundMessage>) {
        info!("Moderation server started");
        let mut tasks = JoinSet::new();

        while let Some(message) = events.recv().await {
            let dispatcher = Arc::clone(&self.dispatcher);
            tasks.spawn(async move {
                let chat = *message.chat();
                let message_id = *message.message_id();
                let outcome = dispatcher.dispatch(message).await;
                debug!(%chat, %message_id, ?outcome, "Event handled");
            });

            // Reap finished handlers so the set does not grow without bound.
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    error!(error = %e, "Event handler panicked");
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Event handler panicked");
            }
        }
        info!(metrics = ?self.metrics().snapshot(), "Moderation server stopped");
    }
}
