//! Membership observation cache.
//!
//! Tracks which users have been seen posting in each chat since the process
//! started. Bulk-ban sweeps draw their candidates from here. The cache is
//! volatile on purpose: it is an observation log, not a roster.

#![warn(missing_docs)]

mod observer;

pub use observer::MembershipObserver;
