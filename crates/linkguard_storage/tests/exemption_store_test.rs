//! Tests for the file-backed exemption store.

use linkguard_core::{ChatId, UserId};
use linkguard_storage::ExemptionStore;
use std::collections::BTreeSet;
use tempfile::TempDir;

const OWNER: UserId = UserId::new(7020);
const CHAT: ChatId = ChatId::new(-1001);
const OTHER_CHAT: ChatId = ChatId::new(-1002);

#[tokio::test]
async fn test_missing_file_yields_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = ExemptionStore::open(temp_dir.path().join("whitelist.json"), OWNER).await;

    assert!(store.chats().is_empty());
    assert!(!store.is_exempt(CHAT, UserId::new(5)));
    assert!(store.is_exempt(CHAT, OWNER));
}

#[tokio::test]
async fn test_corrupt_file_yields_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whitelist.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let store = ExemptionStore::open(&path, OWNER).await;
    assert!(store.chats().is_empty());
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = ExemptionStore::open(temp_dir.path().join("whitelist.json"), OWNER).await;

    assert!(store.add(CHAT, UserId::new(5)).await);
    let once = store.list(CHAT);
    assert!(!store.add(CHAT, UserId::new(5)).await);

    assert_eq!(store.list(CHAT), once);
    assert_eq!(once, BTreeSet::from([UserId::new(5)]));
}

#[tokio::test]
async fn test_owner_is_never_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whitelist.json");
    let store = ExemptionStore::open(&path, OWNER).await;

    assert!(!store.add(CHAT, OWNER).await);
    assert!(store.list(CHAT).is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_exemptions_are_per_chat() {
    let temp_dir = TempDir::new().unwrap();
    let store = ExemptionStore::open(temp_dir.path().join("whitelist.json"), OWNER).await;

    store.add(CHAT, UserId::new(5)).await;
    assert!(store.is_exempt(CHAT, UserId::new(5)));
    assert!(!store.is_exempt(OTHER_CHAT, UserId::new(5)));
}

#[tokio::test]
async fn test_persist_and_reload_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whitelist.json");

    let store = ExemptionStore::open(&path, OWNER).await;
    store.add(CHAT, UserId::new(5)).await;
    store.add(CHAT, UserId::new(6)).await;
    store.add(OTHER_CHAT, UserId::new(7)).await;

    let reloaded = ExemptionStore::open(&path, OWNER).await;
    assert_eq!(reloaded.chats(), store.chats());
    assert_eq!(reloaded.list(CHAT), store.list(CHAT));
    assert_eq!(reloaded.list(OTHER_CHAT), store.list(OTHER_CHAT));
}

#[tokio::test]
async fn test_file_layout_is_chat_text_to_user_array() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whitelist.json");

    let store = ExemptionStore::open(&path, OWNER).await;
    store.add(CHAT, UserId::new(9)).await;
    store.add(CHAT, UserId::new(3)).await;

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({ "-1001": [3, 9] }));
}

#[tokio::test]
async fn test_remove_writes_through() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whitelist.json");

    let store = ExemptionStore::open(&path, OWNER).await;
    store.add(CHAT, UserId::new(5)).await;
    assert!(store.remove(CHAT, UserId::new(5)).await);
    assert!(!store.remove(CHAT, UserId::new(5)).await);

    let reloaded = ExemptionStore::open(&path, OWNER).await;
    assert!(reloaded.list(CHAT).is_empty());
    assert!(reloaded.chats().is_empty());
}

#[tokio::test]
async fn test_failed_persist_keeps_memory_change() {
    let temp_dir = TempDir::new().unwrap();
    // A regular file where the parent directory should be makes every write fail.
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let path = blocker.join("whitelist.json");

    let store = ExemptionStore::open(&path, OWNER).await;
    assert!(store.add(CHAT, UserId::new(5)).await);
    assert!(store.is_exempt(CHAT, UserId::new(5)));
    assert!(store.persist().await.is_err());
}

#[tokio::test]
async fn test_creates_missing_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("whitelist.json");

    let store = ExemptionStore::open(&path, OWNER).await;
    store.add(CHAT, UserId::new(5)).await;
    assert!(path.exists());
}
