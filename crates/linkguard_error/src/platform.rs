//! Platform collaborator error types.
//!
//! Every call into the chat platform can fail. The kinds below let callers tell
//! a refusal by the platform apart from a missing target and from an unreachable
//! transport, even when the caller ends up treating all three the same way.

/// Platform error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// The platform refused the call because the agent lacks the right.
    #[display("Permission denied: {_0}")]
    PermissionDenied(String),

    /// The chat, user or message does not exist (or is not visible to the agent).
    #[display("Not found: {_0}")]
    NotFound(String),

    /// The platform could not be reached or answered with garbage.
    #[display("Transport failure: {_0}")]
    Transport(String),

    /// The platform asked the agent to slow down.
    #[display("Rate limited: retry after {_0}s")]
    RateLimited(u64),

    /// The request was malformed (bad handle, bad id).
    #[display("Invalid request: {_0}")]
    InvalidRequest(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// The specific error kind
    pub kind: PlatformErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use linkguard_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::NotFound("user 42".into()));
    /// assert!(err.is_not_found());
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PlatformErrorKind {
        &self.kind
    }

    /// True when the platform refused the call for lack of rights.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::PermissionDenied(_))
    }

    /// True when the target of the call does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::NotFound(_))
    }

    /// True when the platform could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::Transport(_))
    }
}

/// Result type for platform calls.
pub type PlatformResult<T> = Result<T, PlatformError>;
