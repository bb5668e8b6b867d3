//! Moderation decisions for Linkguard.
//!
//! This crate turns inbound group messages into actions:
//!
//! - [`ModerationPipeline`] records the author as seen and decides whether a
//!   message's link must be deleted.
//! - [`SweepEngine`] bans every member seen posting who is not privileged.
//! - [`CommandHandler`] runs the operator commands (`/op`, `/unop`, `/kill`,
//!   `/whitelist`, `/yo`) behind explicit privilege guards.
//!
//! All components share state through [`ModerationContext`], which owns the
//! platform handle, the exemption store and the membership observer. Nothing is
//! held in globals.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod context;
mod error;
mod handler;
mod pipeline;
mod sweep;
mod target;

pub use command::{CommandName, ParsedCommand};
pub use context::ModerationContext;
pub use error::{CommandError, CommandErrorKind, CommandResult};
pub use handler::{CommandHandler, CommandReply, PromotionOutcome, WhitelistEntry};
pub use pipeline::{AllowReason, ModerationDecision, ModerationOutcome, ModerationPipeline};
pub use sweep::{SweepEngine, SweepReport};
pub use target::resolve_target;
