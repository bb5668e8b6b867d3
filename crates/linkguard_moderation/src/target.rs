//! Resolution of the user a command acts on.

use crate::{CommandError, CommandErrorKind, CommandName, CommandResult};
use linkguard_core::{InboundMessage, UserId, UserRef};
use linkguard_interface::ChatPlatform;
use tracing::{debug, instrument};

/// Work out which user `command` targets.
///
/// The author of the replied-to message wins over any argument. Otherwise the
/// argument is parsed as a [`UserRef`]: numeric ids are used as-is, handles and
/// profile URLs are looked up on the platform.
///
/// # Errors
///
/// `MissingTarget` when there is neither a reply nor an argument, and
/// `TargetNotFound` when the platform cannot resolve the handle.
#[instrument(skip_all, fields(command = %command, args = ?args))]
pub async fn resolve_target<P: ChatPlatform + ?Sized>(
    platform: &P,
    message: &InboundMessage,
    command: CommandName,
    args: Option<&str>,
) -> CommandResult<UserId> {
    if let Some(author) = *message.reply_to_author() {
        debug!(target_user = %author, "Target taken from replied message");
        return Ok(author);
    }

    let reference = args.and_then(UserRef::parse).ok_or_else(|| {
        CommandError::new(CommandErrorKind::MissingTarget {
            usage: command.usage(),
        })
    })?;

    match reference {
        UserRef::Id(user) => Ok(user),
        UserRef::Handle(handle) => match platform.resolve_user_by_handle(&handle).await {
            Ok(profile) => {
                debug!(handle = %handle, target_user = %profile.id, "Resolved handle");
                Ok(profile.id)
            }
            Err(e) => {
                debug!(handle = %handle, error = %e, "Handle resolution failed");
                Err(CommandError::new(CommandErrorKind::TargetNotFound {
                    reference: handle,
                    reason: e.kind,
                }))
            }
        },
    }
}
