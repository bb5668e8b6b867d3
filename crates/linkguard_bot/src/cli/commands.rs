//! CLI command definitions.

use clap::{Parser, Subcommand};
use linkguard_core::{ChatId, UserId};
use std::path::PathBuf;

/// Linkguard - group moderation agent: link removal, exemptions and bulk bans
#[derive(Parser, Debug)]
#[command(name = "linkguard")]
#[command(about = "Group moderation agent: link removal, exemptions and bulk bans", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect or edit the exemption file offline
    #[command(subcommand)]
    Whitelist(WhitelistCommands),

    /// Report whether a text would be treated as a link
    Classify {
        /// Message text to classify
        text: String,
    },

    /// Print the effective configuration
    Config,
}

/// Exemption file subcommands
#[derive(Subcommand, Debug)]
pub enum WhitelistCommands {
    /// List exemptions, for one chat or for all
    List {
        /// Only this chat
        #[arg(long, allow_hyphen_values = true)]
        chat: Option<ChatId>,
    },

    /// Exempt a user in a chat
    Add {
        /// Chat id (group ids are negative)
        #[arg(long, allow_hyphen_values = true)]
        chat: ChatId,

        /// User id
        #[arg(long)]
        user: UserId,
    },

    /// Revoke a user's exemption in a chat
    Remove {
        /// Chat id (group ids are negative)
        #[arg(long, allow_hyphen_values = true)]
        chat: ChatId,

        /// User id
        #[arg(long)]
        user: UserId,
    },
}
