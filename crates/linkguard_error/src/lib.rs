//! Error types for Linkguard.
//!
//! This crate provides the foundation error types used throughout the Linkguard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use linkguard_error::{LinkguardResult, PlatformError, PlatformErrorKind};
//!
//! fn fetch_member() -> LinkguardResult<()> {
//!     Err(PlatformError::new(PlatformErrorKind::Transport("connection reset".into())))?
//! }
//!
//! assert!(fetch_member().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod platform;
mod storage;

pub use config::ConfigError;
pub use error::{LinkguardError, LinkguardErrorKind, LinkguardResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use storage::{StorageError, StorageErrorKind};
