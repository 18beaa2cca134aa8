//! Store Lifecycle Integration Tests
//!
//! Covers the create / fetch / patch surface end-to-end against a real
//! datastore directory, including conflict handling, persistence across
//! store instances, and serialized concurrent mutations.

use std::sync::Arc;
use std::thread;

use copilot_memory::models::memory::Profile;
use copilot_memory::{MemoryCreate, MemoryPatch, MemoryStore, StoreError};

fn create_doc(name: &str) -> MemoryCreate {
    MemoryCreate {
        profile: Some(Profile {
            name: Some(name.to_string()),
            role: Some("PM".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_create_then_fetch_returns_same_record() {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(tmp.path()).unwrap();

    let created = store.create("u1", create_doc("Blake"), false).unwrap();
    let fetched = store.fetch("u1").unwrap();
    assert_eq!(created, fetched);
}

#[test]
fn test_record_survives_store_reopen() {
    let tmp = tempfile::tempdir().unwrap();

    let created = {
        let store = MemoryStore::new(tmp.path()).unwrap();
        store.create("u1", create_doc("Blake"), false).unwrap()
    };

    // A fresh store instance over the same directory sees the same record
    let reopened = MemoryStore::new(tmp.path()).unwrap();
    assert_eq!(reopened.fetch("u1").unwrap(), created);
}

#[test]
fn test_duplicate_create_is_conflict_and_store_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(tmp.path()).unwrap();

    store.create("u1", create_doc("Blake"), false).unwrap();
    let err = store.create("u1", create_doc("Intruder"), false).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let record = store.fetch("u1").unwrap();
    assert_eq!(record.profile.name.as_deref(), Some("Blake"));
}

#[test]
fn test_overwrite_create_replaces_record() {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(tmp.path()).unwrap();

    store.create("u1", create_doc("Blake"), false).unwrap();
    store.create("u1", create_doc("Replacement"), true).unwrap();

    let record = store.fetch("u1").unwrap();
    assert_eq!(record.profile.name.as_deref(), Some("Replacement"));
}

#[test]
fn test_empty_patch_is_a_noop_on_record_content() {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(tmp.path()).unwrap();

    let before = store.create("u1", create_doc("Blake"), false).unwrap();
    let after = store.patch("u1", MemoryPatch::default(), false).unwrap();
    assert_eq!(before, after);
    assert_eq!(store.fetch("u1").unwrap(), before);
}

#[test]
fn test_fetch_and_patch_of_missing_user_are_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(tmp.path()).unwrap();

    assert!(matches!(
        store.fetch("ghost"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.patch("ghost", MemoryPatch::default(), false),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_concurrent_creates_all_land() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new(tmp.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let user_id = format!("user-{}", i);
                store
                    .create(&user_id, create_doc(&format!("User {}", i)), false)
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let data = store.load().unwrap();
    assert_eq!(data.len(), 8);
    for i in 0..8 {
        assert!(data.contains_key(&format!("user-{}", i)));
    }
}

#[test]
fn test_distinct_users_are_isolated() {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(tmp.path()).unwrap();

    store.create("u1", create_doc("Blake"), false).unwrap();
    store.create("u2", create_doc("Sam"), false).unwrap();

    let patch: MemoryPatch =
        serde_json::from_str(r#"{"profile": {"name": "Blake R."}}"#).unwrap();
    store.patch("u1", patch, false).unwrap();

    assert_eq!(
        store.fetch("u2").unwrap().profile.name.as_deref(),
        Some("Sam")
    );
}
