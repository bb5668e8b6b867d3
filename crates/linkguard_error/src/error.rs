//! Top-level error wrapper types.

use crate::{ConfigError, PlatformError, StorageError};

/// Union of every error the Linkguard crates can raise.
///
/// # Examples
///
/// ```
/// use linkguard_error::{LinkguardError, ConfigError};
///
/// let err: LinkguardError = ConfigError::new("bad owner").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LinkguardErrorKind {
    /// Chat platform call failed
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Exemption store I/O failed
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Linkguard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use linkguard_error::{LinkguardResult, StorageError, StorageErrorKind};
///
/// fn might_fail() -> LinkguardResult<()> {
///     Err(StorageError::new(StorageErrorKind::FileWrite("disk full".into())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Linkguard Error: {}", _0)]
pub struct LinkguardError(Box<LinkguardErrorKind>);

impl LinkguardError {
    /// Create a new error from a kind.
    pub fn new(kind: LinkguardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LinkguardErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LinkguardErrorKind
impl<T> From<T> for LinkguardError
where
    T: Into<LinkguardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Linkguard operations.
pub type LinkguardResult<T> = std::result::Result<T, LinkguardError>;
