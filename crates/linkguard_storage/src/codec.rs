//! JSON encoding of the exemption file.

use linkguard_core::{ChatId, UserId};
use linkguard_error::{StorageError, StorageErrorKind};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// In-memory shape of the exemption list.
pub type ExemptionMap = HashMap<ChatId, BTreeSet<UserId>>;

/// Render the map as pretty JSON, chats and users sorted, empty chats omitted.
pub fn encode(map: &ExemptionMap) -> Result<String, StorageError> {
    let serial: BTreeMap<String, Vec<i64>> = map
        .iter()
        .filter(|(_, users)| !users.is_empty())
        .map(|(chat, users)| (chat.to_string(), users.iter().map(|u| u.get()).collect()))
        .collect();

    serde_json::to_string_pretty(&serial)
        .map_err(|e| StorageError::new(StorageErrorKind::Encoding(e.to_string())))
}

/// Parse the JSON file contents.
///
/// Fails on malformed JSON and on keys that are not integers.
pub fn decode(contents: &str) -> Result<ExemptionMap, StorageError> {
    let raw: HashMap<String, Vec<i64>> = serde_json::from_str(contents)
        .map_err(|e| StorageError::new(StorageErrorKind::Corrupt(e.to_string())))?;

    let mut map = ExemptionMap::new();
    for (key, users) in raw {
        let chat: ChatId = key.trim().parse().map_err(|_| {
            StorageError::new(StorageErrorKind::Corrupt(format!(
                "chat key '{}' is not an integer",
                key
            )))
        })?;
        if users.is_empty() {
            continue;
        }
        map.entry(chat)
            .or_default()
            .extend(users.into_iter().map(UserId::new));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_sorts_and_drops_empty_chats() {
        let mut map = ExemptionMap::new();
        map.insert(ChatId::new(-2), BTreeSet::from([UserId::new(9), UserId::new(3)]));
        map.insert(ChatId::new(-1), BTreeSet::new());

        let json = encode(&map).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({ "-2": [3, 9] }));
    }

    #[test]
    fn decode_merges_duplicate_users() {
        let map = decode(r#"{"-5": [1, 1, 2]}"#).unwrap();
        assert_eq!(
            map.get(&ChatId::new(-5)),
            Some(&BTreeSet::from([UserId::new(1), UserId::new(2)]))
        );
    }

    #[test]
    fn decode_rejects_non_integer_keys() {
        let err = decode(r#"{"general": [1]}"#).unwrap_err();
        assert!(matches!(err.kind, StorageErrorKind::Corrupt(_)));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err.kind, StorageErrorKind::Corrupt(_)));
    }
}
