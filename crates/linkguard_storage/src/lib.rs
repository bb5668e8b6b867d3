//! Persistent exemption list for Linkguard.
//!
//! An exemption excludes a user from link enforcement and bulk-ban sweeps in one
//! chat. The list lives in memory and is written through to a JSON file on every
//! change, so it survives restarts.
//!
//! # File Format
//!
//! ```json
//! {
//!   "-1001234567890": [111, 222],
//!   "-1009876543210": [333]
//! }
//! ```
//!
//! Chat ids are object keys (text), user ids are integers. Ordering carries no
//! meaning; the file is sorted only to keep diffs readable.
//!
//! # Example
//!
//! ```rust,no_run
//! use linkguard_core::{ChatId, UserId};
//! use linkguard_storage::ExemptionStore;
//!
//! # async fn example() {
//! let owner = UserId::new(1);
//! let store = ExemptionStore::open("whitelist.json", owner).await;
//!
//! store.add(ChatId::new(-100), UserId::new(42)).await;
//! assert!(store.is_exempt(ChatId::new(-100), UserId::new(42)));
//! assert!(store.is_exempt(ChatId::new(-100), owner));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod exemption;

pub use codec::{ExemptionMap, decode, encode};
pub use exemption::ExemptionStore;
