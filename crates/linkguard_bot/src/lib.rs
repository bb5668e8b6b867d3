//! Runtime for the Linkguard moderation agent.
//!
//! This crate wires the moderation components into a running process:
//! - **BotConfig**: owner, exemption file and logging settings from TOML and
//!   the environment
//! - **BotServer**: consumes inbound events and moderates each one
//! - **ModerationMetrics**: counters for deletions, commands and sweeps

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod metrics;
mod server;

pub use config::{BotConfig, ENV_LOG, ENV_OWNER_ID, ENV_WHITELIST_FILE};
pub use metrics::{MetricsSnapshot, ModerationMetrics};
pub use server::{BotServer, DispatchOutcome, IgnoreReason, event_channel};
