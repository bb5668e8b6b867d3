//! Command text parsing.

/// Operator commands the agent answers to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommandName {
    /// Exempt a user and promote them
    Op,
    /// Revoke a user's exemption
    Unop,
    /// Ban one user
    Kill,
    /// List exempted users
    Whitelist,
    /// Ban every non-privileged member seen posting
    Yo,
}

impl CommandName {
    /// Usage line shown when the command is missing its argument.
    pub fn usage(self) -> &'static str {
        match self {
            CommandName::Op => "/op <user_id|@username> or reply to the user's message",
            CommandName::Unop => "/unop <user_id|@username> or reply to the user's message",
            CommandName::Kill => "/kill <user_id|@username> or reply to the user's message",
            CommandName::Whitelist => "/whitelist",
            CommandName::Yo => "/yo",
        }
    }
}

/// A command found at the start of a message.
///
/// # Examples
///
/// ```
/// use linkguard_moderation::{CommandName, ParsedCommand};
///
/// let cmd = ParsedCommand::parse("/kill@LinkGuardBot  @spammer ").unwrap();
/// assert_eq!(cmd.name, CommandName::Kill);
/// assert_eq!(cmd.args.as_deref(), Some("@spammer"));
/// assert_eq!(cmd.addressee.as_deref(), Some("LinkGuardBot"));
///
/// assert!(ParsedCommand::parse("hello /kill").is_none());
/// assert!(ParsedCommand::parse("/unknown").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Which command
    pub name: CommandName,
    /// Everything after the command word, trimmed; `None` when empty
    pub args: Option<String>,
    /// Bot handle from a `/command@bot` suffix
    pub addressee: Option<String>,
}

impl ParsedCommand {
    /// Parse `text` as a `/command[@bot] [args]` invocation.
    ///
    /// Returns `None` for text that does not start with a known command.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (rest, ""),
        };
        let (word, addressee) = match word.split_once('@') {
            Some((name, bot)) => (name, Some(bot)),
            None => (word, None),
        };
        let name: CommandName = word.parse().ok()?;

        Some(Self {
            name,
            args: (!args.is_empty()).then(|| args.to_string()),
            addressee: addressee.filter(|bot| !bot.is_empty()).map(str::to_string),
        })
    }
}
