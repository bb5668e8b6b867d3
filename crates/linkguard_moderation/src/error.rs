//! Command error types.

use derive_more::{Display, Error};
use linkguard_core::{Capability, UserId};
use linkguard_error::PlatformErrorKind;
use linkguard_security::{SecurityError, SecurityErrorKind};

/// Result type for command handlers.
pub type CommandResult<T> = Result<T, CommandError>;

/// Specific command failure conditions.
///
/// The `Display` text is what the invoking user sees.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CommandErrorKind {
    /// The command message has no identifiable sender
    #[display("Commands need an identifiable sender.")]
    AnonymousInvoker,

    /// Invoker lacks the standing the command needs
    #[display("{}", _0)]
    Unauthorized(SecurityErrorKind),

    /// No target given and no reply to take one from
    #[display("Usage: {}", usage)]
    MissingTarget {
        /// Usage line of the command
        usage: &'static str,
    },

    /// The target reference could not be resolved to a user
    #[display("Could not find user '{}'", reference)]
    TargetNotFound {
        /// What the invoker typed
        reference: String,
        /// Why resolution failed
        reason: PlatformErrorKind,
    },

    /// The target may not be acted upon
    #[display("Invalid target.")]
    InvalidTarget(UserId),

    /// The agent lacks a right the command needs
    #[display("Bot lacks the {} permission.", _0)]
    MissingCapability(Capability),

    /// The platform refused the action
    #[display("Failed: {}", reason)]
    ActionFailed {
        /// Command that failed
        command: String,
        /// Why
        reason: PlatformErrorKind,
    },
}

/// Command error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The specific error kind
    pub kind: CommandErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl CommandError {
    /// Create a new command error with location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CommandErrorKind {
        &self.kind
    }

    /// Whether the invoker was refused for lack of standing.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.kind,
            CommandErrorKind::Unauthorized(_) | CommandErrorKind::AnonymousInvoker
        )
    }

    /// Text to send back to the invoking user.
    pub fn reply_text(&self) -> String {
        self.kind.to_string()
    }
}

impl From<SecurityError> for CommandError {
    #[track_caller]
    fn from(err: SecurityError) -> Self {
        let kind = match err.kind {
            SecurityErrorKind::ProtectedTarget { user } => CommandErrorKind::InvalidTarget(user),
            SecurityErrorKind::MissingCapability { capability } => {
                CommandErrorKind::MissingCapability(capability)
            }
            other => CommandErrorKind::Unauthorized(other),
        };
        CommandError::new(kind)
    }
}
