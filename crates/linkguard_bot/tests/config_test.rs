//! Tests for configuration loading.

use linkguard_bot::{BotConfig, ENV_LOG, ENV_OWNER_ID, ENV_WHITELIST_FILE};
use linkguard_core::UserId;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_full_file() {
    let toml = r#"
        owner_id = 123456789
        whitelist_path = "/var/lib/linkguard/whitelist.json"
        log_filter = "linkguard=debug"
        json_logs = true
        event_buffer = 512
    "#;

    let config = BotConfig::from_sources(Some(toml), env(&[])).expect("Valid config");

    assert_eq!(*config.owner_id(), UserId::new(123456789));
    assert_eq!(
        config.whitelist_path(),
        &PathBuf::from("/var/lib/linkguard/whitelist.json")
    );
    assert_eq!(config.log_filter(), "linkguard=debug");
    assert!(*config.json_logs());
    assert_eq!(*config.event_buffer(), 512);
}

#[test]
fn test_environment_overrides_file() {
    let config = BotConfig::from_sources(
        Some("owner_id = 1\nlog_filter = \"warn\""),
        env(&[
            (ENV_OWNER_ID, " 77 "),
            (ENV_WHITELIST_FILE, "/tmp/wl.json"),
            (ENV_LOG, "trace"),
        ]),
    )
    .expect("Valid config");

    assert_eq!(*config.owner_id(), UserId::new(77));
    assert_eq!(config.whitelist_path(), &PathBuf::from("/tmp/wl.json"));
    assert_eq!(config.log_filter(), "trace");
}

#[test]
fn test_environment_alone_is_enough() {
    let config =
        BotConfig::from_sources(None, env(&[(ENV_OWNER_ID, "5")])).expect("Valid config");
    assert_eq!(config, BotConfig::new(UserId::new(5)));
}

#[test]
fn test_missing_owner_is_an_error() {
    let err = BotConfig::from_sources(None, env(&[])).expect_err("Owner required");
    assert!(err.to_string().contains("owner_id"));
}

#[test]
fn test_bad_owner_override_is_an_error() {
    let result = BotConfig::from_sources(Some("owner_id = 1"), env(&[(ENV_OWNER_ID, "alice")]));
    assert!(result.is_err());
}

#[test]
fn test_zero_event_buffer_is_rejected() {
    let result = BotConfig::from_sources(Some("owner_id = 1\nevent_buffer = 0"), env(&[]));
    assert!(result.is_err());
}

#[test]
fn test_unknown_keys_are_rejected() {
    let result = BotConfig::from_sources(Some("owner_id = 1\nowner = 2"), env(&[]));
    assert!(result.is_err());
}

#[test]
fn test_from_file_round_trips_through_toml() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let original = BotConfig::new(UserId::new(9));
    file.write_all(original.to_toml().expect("Render failed").as_bytes())
        .expect("Failed to write config");

    let loaded = BotConfig::from_file(file.path()).expect("Valid config");

    assert_eq!(loaded, original);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(BotConfig::from_file(dir.path().join("absent.toml")).is_err());
}
