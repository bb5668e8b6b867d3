//! Trait definitions for the chat platform Linkguard moderates.
//!
//! The moderation core never speaks the platform's wire protocol. It goes through
//! [`ChatPlatform`], which a transport adapter implements. With the `testing`
//! feature this crate also ships [`MockPlatform`], an in-memory implementation
//! that records every call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(any(test, feature = "testing"))]
mod mock;
mod platform;

#[cfg(any(test, feature = "testing"))]
pub use mock::{MockPlatform, PlatformCall};
pub use platform::ChatPlatform;
