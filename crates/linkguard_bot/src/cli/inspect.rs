//! Read-only inspection commands.

use linkguard_bot::BotConfig;
use linkguard_core::{ChatId, ChatKind, InboundMessage, MessageId};
use linkguard_error::LinkguardResult;
use linkguard_security::{LinkClassifier, LinkSignal};

/// Print whether `text` would be deleted as a link.
pub fn classify_text(text: &str) {
    let message =
        InboundMessage::new(ChatId::new(0), ChatKind::Group, MessageId::new(0)).with_text(text);
    match LinkClassifier::new().classify(&message) {
        Some(LinkSignal::Pattern(found)) => println!("link: {}", found),
        Some(LinkSignal::Entity(kind)) => println!("link annotation: {:?}", kind),
        None => println!("no link"),
    }
}

/// Print the effective configuration as TOML.
pub fn show_config(config: &BotConfig) -> LinkguardResult<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
