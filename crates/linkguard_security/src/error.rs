//! Security error types.

use linkguard_core::{Capability, UserId};

/// Specific security error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SecurityErrorKind {
    /// Command restricted to the owner
    #[display("Only the owner may use /{}", command)]
    OwnerOnly {
        /// Command that was denied
        command: String,
    },

    /// Command restricted to the owner and chat administrators
    #[display("Only the owner or a chat administrator may use /{}", command)]
    AdminOnly {
        /// Command that was denied
        command: String,
    },

    /// Target may not be acted upon
    #[display("User {} is protected and cannot be targeted", user)]
    ProtectedTarget {
        /// Protected user
        user: UserId,
    },

    /// The agent lacks a right the action needs
    #[display("Agent lacks the {} right", capability)]
    MissingCapability {
        /// Missing capability
        capability: Capability,
    },
}

/// Security error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Security Error: {} at line {} in {}", kind, line, file)]
pub struct SecurityError {
    /// The specific error kind
    pub kind: SecurityErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl SecurityError {
    /// Create a new security error with location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SecurityErrorKind {
        &self.kind
    }
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
