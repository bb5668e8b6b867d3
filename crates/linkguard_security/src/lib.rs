//! Authorization and content checks for Linkguard.
//!
//! This crate answers the two questions every moderation decision asks:
//!
//! 1. **Who is speaking?** [`AuthorizationResolver`] decides whether a user is
//!    the owner or a chat administrator, and whether the agent itself holds the
//!    rights an action needs. Platform failures never grant privilege.
//! 2. **What did they say?** [`LinkClassifier`] decides whether a message
//!    carries a link.
//!
//! Privileged commands call [`AuthorizationResolver::guard`] first and turn a
//! [`SecurityError`] into a rejection reply.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod authorization;
mod classifier;
mod error;

pub use authorization::{AuthorizationResolver, Requirement, Standing};
pub use classifier::{LinkClassifier, LinkSignal};
pub use error::{SecurityError, SecurityErrorKind, SecurityResult};
