//! Link detection for inbound messages.

use linkguard_core::{EntityKind, InboundMessage};
use regex::Regex;
use tracing::{debug, instrument};

/// Pattern for links in plain text: `http(s)://` URIs, bare `www.` hosts,
/// `t.me/` and `telegram.me/` paths, and the literal `invite.link`.
const LINK_PATTERN: &str = r"(?i)(https?://\S+)|(\bwww\.\S+\b)|(\bt\.me/[\w\-/]+)|(\btelegram\.me/[\w\-/]+)|invite\.link";

/// Why a message was classified as carrying a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSignal {
    /// A structured annotation marks a URL or masked link
    Entity(EntityKind),
    /// The text matched the link pattern
    Pattern(String),
}

/// Decides whether a message carries a link.
///
/// Annotations are checked first, so masked links whose visible text is not a
/// URL are still caught. Otherwise the text (or caption) is matched against the
/// link pattern. Platform-internal links (`t.me/...`) count too. There is no
/// domain allow-list.
///
/// # Examples
///
/// ```
/// use linkguard_security::LinkClassifier;
///
/// let classifier = LinkClassifier::new();
/// assert!(classifier.matches_text("check http://x.com"));
/// assert!(classifier.matches_text("join t.me/abcd"));
/// assert!(!classifier.matches_text("telegramme.org"));
/// ```
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    pattern: Regex,
}

impl LinkClassifier {
    /// Create a classifier with the built-in link pattern.
    pub fn new() -> Self {
        let pattern = Regex::new(LINK_PATTERN).expect("Valid link regex");
        Self { pattern }
    }

    /// Whether `message` carries a link.
    pub fn contains_link(&self, message: &InboundMessage) -> bool {
        self.classify(message).is_some()
    }

    /// The first link signal in `message`, if any.
    #[instrument(skip_all, fields(message_id = %message.message_id()))]
    pub fn classify(&self, message: &InboundMessage) -> Option<LinkSignal> {
        if let Some(entity) = message.entities().iter().find(|e| e.kind.is_link()) {
            debug!(offset = entity.offset, "Link annotation found");
            return Some(LinkSignal::Entity(entity.kind.clone()));
        }

        let body = message.body()?;
        let found = self.pattern.find(body)?;
        debug!(matched = found.as_str(), "Link pattern matched");
        Some(LinkSignal::Pattern(found.as_str().to_string()))
    }

    /// Whether `text` matches the link pattern.
    pub fn matches_text(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkguard_core::{ChatId, ChatKind, MessageEntity, MessageId};

    fn text(body: &str) -> InboundMessage {
        InboundMessage::new(ChatId::new(-1), ChatKind::Supergroup, MessageId::new(1))
            .with_text(body)
    }

    #[test]
    fn test_protocol_links() {
        let classifier = LinkClassifier::new();
        assert!(classifier.contains_link(&text("check http://x.com")));
        assert!(classifier.contains_link(&text("HTTPS://EXAMPLE.COM/path")));
    }

    #[test]
    fn test_bare_www_hosts() {
        let classifier = LinkClassifier::new();
        assert!(classifier.contains_link(&text("visit www.example.org now")));
        assert!(classifier.contains_link(&text("WWW.Shout.net")));
    }

    #[test]
    fn test_platform_paths() {
        let classifier = LinkClassifier::new();
        assert!(classifier.contains_link(&text("join t.me/abcd")));
        assert!(classifier.contains_link(&text("telegram.me/joinchat/xyz")));
        assert!(classifier.contains_link(&text("T.ME/Shouting")));
    }

    #[test]
    fn test_invite_link_literal() {
        let classifier = LinkClassifier::new();
        assert!(classifier.contains_link(&text("grab the invite.link before it expires")));
    }

    #[test]
    fn test_plain_text_is_not_a_link() {
        let classifier = LinkClassifier::new();
        assert!(!classifier.contains_link(&text("hello world")));
        assert!(!classifier.contains_link(&text("telegramme.org")));
        assert!(!classifier.contains_link(&text("meet me at.me/later")));
    }

    #[test]
    fn test_masked_link_over_plain_text() {
        let classifier = LinkClassifier::new();
        let message = text("click here").with_entities(vec![MessageEntity::new(
            EntityKind::TextLink {
                url: "https://spam.example".to_string(),
            },
            0,
            10,
        )]);
        assert_eq!(
            classifier.classify(&message),
            Some(LinkSignal::Entity(EntityKind::TextLink {
                url: "https://spam.example".to_string()
            }))
        );
    }

    #[test]
    fn test_non_link_entities_are_ignored() {
        let classifier = LinkClassifier::new();
        let message = text("hi @friend")
            .with_entities(vec![MessageEntity::new(EntityKind::Mention, 3, 7)]);
        assert!(!classifier.contains_link(&message));
    }

    #[test]
    fn test_caption_is_checked_without_text() {
        let classifier = LinkClassifier::new();
        let message = InboundMessage::new(ChatId::new(-1), ChatKind::Group, MessageId::new(2))
            .with_caption("photo from www.example.org");
        assert!(classifier.contains_link(&message));
    }

    #[test]
    fn test_empty_message_is_not_a_link() {
        let classifier = LinkClassifier::new();
        let message = InboundMessage::new(ChatId::new(-1), ChatKind::Group, MessageId::new(3));
        assert_eq!(classifier.classify(&message), None);
    }
}
