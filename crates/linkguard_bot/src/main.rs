//! Linkguard CLI binary.
//!
//! This binary provides offline access to Linkguard's state:
//! - Inspect and edit the exemption file
//! - Check how the link classifier treats a text
//! - Print the effective configuration

use clap::Parser;
use linkguard_bot::BotConfig;

mod cli;
mod observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, classify_text, handle_whitelist_command, show_config};
    use observability::{LoggingConfig, init_logging};

    // Parse command-line arguments
    let cli = Cli::parse();

    // The classifier needs no owner, so it runs without a configuration
    let config = match &cli.command {
        Commands::Classify { .. } => None,
        _ => Some(BotConfig::load(cli.config.as_deref())?),
    };

    init_logging(LoggingConfig::from_config(config.as_ref(), cli.verbose))?;

    match cli.command {
        Commands::Classify { text } => classify_text(&text),
        Commands::Whitelist(command) => {
            let config = config.ok_or("no configuration loaded")?;
            handle_whitelist_command(&config, command).await?;
        }
        Commands::Config => {
            let config = config.ok_or("no configuration loaded")?;
            show_config(&config)?;
        }
    }

    Ok(())
}
