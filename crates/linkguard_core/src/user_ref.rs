//! Textual references to a user in command arguments.

use crate::UserId;
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("Valid numeric id regex"));

static PROFILE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:t\.me|telegram\.me)/(@?\w+)").expect("Valid profile URL regex")
});

/// A user named in a command argument, before resolution.
///
/// # Examples
///
/// ```
/// use linkguard_core::{UserId, UserRef};
///
/// assert_eq!(UserRef::parse("12345"), Some(UserRef::Id(UserId::new(12345))));
/// assert_eq!(UserRef::parse("@spammer"), Some(UserRef::Handle("@spammer".into())));
/// assert_eq!(
///     UserRef::parse("https://t.me/spammer"),
///     Some(UserRef::Handle("@spammer".into()))
/// );
/// assert_eq!(UserRef::parse("   "), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UserRef {
    /// Numeric id, usable without a lookup
    #[display("{_0}")]
    Id(UserId),
    /// Handle (or anything else) the platform must resolve
    #[display("{_0}")]
    Handle(String),
}

impl UserRef {
    /// Interpret a command argument.
    ///
    /// Numeric ids are taken as-is. `@handle` is kept verbatim. A profile URL
    /// (`t.me/name`, `telegram.me/name`) becomes `@name`. Anything else is a bare
    /// handle passed to the platform unchanged.
    pub fn parse(param: &str) -> Option<Self> {
        let p = param.trim();
        if p.is_empty() {
            return None;
        }

        if NUMERIC_ID.is_match(p)
            && let Ok(raw) = p.parse::<i64>()
        {
            return Some(UserRef::Id(UserId::new(raw)));
        }

        if p.starts_with('@') {
            return Some(UserRef::Handle(p.to_string()));
        }

        if let Some(caps) = PROFILE_URL.captures(p) {
            let name = &caps[1];
            let handle = if name.starts_with('@') {
                name.to_string()
            } else {
                format!("@{}", name)
            };
            return Some(UserRef::Handle(handle));
        }

        Some(UserRef::Handle(p.to_string()))
    }
}
