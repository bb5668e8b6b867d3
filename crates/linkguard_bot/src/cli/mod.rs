//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the linkguard binary.

mod commands;
mod inspect;
mod whitelist;

pub use commands::{Cli, Commands, WhitelistCommands};
pub use inspect::{classify_text, show_config};
pub use whitelist::handle_whitelist_command;
