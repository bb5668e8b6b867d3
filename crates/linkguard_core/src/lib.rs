//! Core data types for Linkguard.
//!
//! This crate provides the identifiers, membership records and message shapes
//! shared by every other Linkguard crate. Nothing here talks to the network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capability;
mod ids;
mod member;
mod message;
mod user_ref;

pub use capability::{Capability, PROMOTION_GRANTS};
pub use ids::{ChatId, MessageId, UserId};
pub use member::{ChatMember, MemberStatus, UserProfile};
pub use message::{ChatKind, EntityKind, InboundMessage, MessageEntity};
pub use user_ref::UserRef;
