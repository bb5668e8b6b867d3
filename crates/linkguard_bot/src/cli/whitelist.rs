//! Offline exemption file management.

use super::WhitelistCommands;
use linkguard_bot::BotConfig;
use linkguard_error::{LinkguardResult, StorageErrorKind};
use linkguard_storage::ExemptionStore;
use tracing::info;

/// Run a `whitelist` subcommand against the configured exemption file.
///
/// Unlike the running agent, this reports an unreadable or corrupt file as
/// an error instead of starting empty, so an edit never overwrites data it
/// could not read.
pub async fn handle_whitelist_command(
    config: &BotConfig,
    command: WhitelistCommands,
) -> LinkguardResult<()> {
    let path = config.whitelist_path();
    let entries = match ExemptionStore::load(path).await {
        Ok(entries) => entries,
        Err(e) if matches!(e.kind, StorageErrorKind::NotFound(_)) => Default::default(),
        Err(e) => return Err(e.into()),
    };
    let store = ExemptionStore::with_entries(path, *config.owner_id(), entries);

    match command {
        WhitelistCommands::List { chat } => {
            let chats = match chat {
                Some(chat) => vec![chat],
                None => store.chats(),
            };
            if chats.is_empty() {
                println!("No exemptions in {}", path.display());
            }
            for chat in chats {
                let users: Vec<String> = store.list(chat).iter().map(|u| u.to_string()).collect();
                println!("{}: {}", chat, users.join(", "));
            }
        }
        WhitelistCommands::Add { chat, user } => {
            // The store only logs a failed write; persist again to surface it.
            if store.add(chat, user).await {
                store.persist().await?;
                info!(%chat, %user, "Exemption added");
                println!("Exempted {} in {}", user, chat);
            } else {
                println!("{} is already exempt in {}", user, chat);
            }
        }
        WhitelistCommands::Remove { chat, user } => {
            if store.remove(chat, user).await {
                store.persist().await?;
                info!(%chat, %user, "Exemption removed");
                println!("Removed {} from {}", user, chat);
            } else {
                println!("{} was not exempt in {}", user, chat);
            }
        }
    }
    Ok(())
}
