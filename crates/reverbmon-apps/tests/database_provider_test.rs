//! SQLite-backed provider tests: pass-through CRUD, unique-key lookup, and
//! survival across a close + reopen cycle.

use reverbmon_apps::DatabaseApplicationProvider;
use reverbmon_core::errors::ProviderError;
use reverbmon_core::models::{ApplicationRecord, ApplicationUpdate, OptionsUpdate};
use reverbmon_core::traits::ApplicationProvider;

fn record(id: &str) -> ApplicationRecord {
    let mut record = ApplicationRecord::provision(format!("App {id}"));
    record.id = id.to_string();
    record.key = format!("{id}-key-of-16-chars");
    record.secret = format!("{id}-secret-that-is-32-characters!!");
    record
}

#[test]
fn add_then_lookup_round_trips() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    provider.add_app(record("app-1")).unwrap();

    assert_eq!(provider.find_by_id("app-1").unwrap(), record("app-1"));
    assert_eq!(provider.find_by_key("app-1-key-of-16-chars").unwrap(), record("app-1"));
    assert!(provider.exists("app-1").unwrap());
    assert!(!provider.exists("app-2").unwrap());
}

#[test]
fn all_preserves_insertion_order() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    for id in ["app-1", "app-2", "app-3"] {
        provider.add_app(record(id)).unwrap();
    }

    let ids: Vec<String> = provider.all().unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["app-1", "app-2", "app-3"]);
}

#[test]
fn unknown_lookups_fail_with_not_found() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();

    assert!(matches!(provider.find_by_id("nope"), Err(ProviderError::NotFound { .. })));
    assert!(matches!(
        provider.update_app("nope", ApplicationUpdate::default()),
        Err(ProviderError::NotFound { .. })
    ));
    assert!(matches!(provider.delete_app("nope"), Err(ProviderError::NotFound { .. })));
}

#[test]
fn update_merges_fields_and_options() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    provider.add_app(record("app-1")).unwrap();

    let merged = provider
        .update_app(
            "app-1",
            ApplicationUpdate {
                enable_client_messages: Some(true),
                max_connections: Some(Some(500)),
                options: Some(OptionsUpdate {
                    host: Some("ws.example.com".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .unwrap();

    assert!(merged.enable_client_messages);
    assert_eq!(merged.max_connections, Some(500));
    assert_eq!(merged.options.host, "ws.example.com");
    assert_eq!(merged.options.ping_interval, 60);
    assert_eq!(merged.key, "app-1-key-of-16-chars");

    // Every read is fresh: the merge is already visible.
    assert_eq!(provider.find_by_id("app-1").unwrap(), merged);
}

#[test]
fn delete_removes_the_row() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    provider.add_app(record("app-1")).unwrap();

    provider.delete_app("app-1").unwrap();
    assert!(!provider.exists("app-1").unwrap());
}

#[test]
fn key_exists_excludes_the_given_id() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    provider.add_app(record("app-1")).unwrap();

    assert!(provider.key_exists("app-1-key-of-16-chars", None).unwrap());
    assert!(!provider.key_exists("app-1-key-of-16-chars", Some("app-1")).unwrap());
    assert!(provider.key_exists("app-1-key-of-16-chars", Some("app-2")).unwrap());
}

#[test]
fn raw_includes_row_timestamps() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    provider.add_app(record("app-1")).unwrap();

    let raw = provider.raw().unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0]["id"], "app-1");
    assert!(raw[0]["created_at"].is_string());
    assert!(raw[0]["updated_at"].is_string());
}

#[test]
fn reload_is_a_no_op() {
    let provider = DatabaseApplicationProvider::open_in_memory().unwrap();
    provider.add_app(record("app-1")).unwrap();
    provider.reload().unwrap();
    assert!(provider.exists("app-1").unwrap());
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("apps.db");

    {
        let provider = DatabaseApplicationProvider::open(&db_path).unwrap();
        provider.add_app(record("app-1")).unwrap();
        // Provider drops here, connection closes.
    }

    let provider = DatabaseApplicationProvider::open(&db_path).unwrap();
    assert_eq!(provider.find_by_id("app-1").unwrap(), record("app-1"));
}
