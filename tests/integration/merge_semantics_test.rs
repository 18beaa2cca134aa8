//! Merge-Patch Semantics Integration Tests
//!
//! Verifies the merge contract through the store surface: partial documents
//! leave untouched fields alone, nested objects merge field-by-field, list
//! fields replace wholesale, and the event timeline dedupes by key.

use copilot_memory::models::memory::{Event, EventType, Profile};
use copilot_memory::{MemoryCreate, MemoryPatch, MemoryStore};

fn store_with_user(dir: &std::path::Path) -> MemoryStore {
    let store = MemoryStore::new(dir).unwrap();
    let doc = MemoryCreate {
        profile: Some(Profile {
            name: Some("Blake".to_string()),
            role: Some("PM".to_string()),
            ..Default::default()
        }),
        events: vec![Event::new(EventType::Note)
            .with_id("e1")
            .with_title("kickoff")
            .with_captured_at("2025-01-01T00:00:00Z")],
        ..Default::default()
    };
    store.create("u1", doc, false).unwrap();
    store
}

#[test]
fn test_name_only_patch_preserves_role() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let patch: MemoryPatch =
        serde_json::from_str(r#"{"profile": {"name": "Blake R."}}"#).unwrap();
    let merged = store.patch("u1", patch, false).unwrap();

    assert_eq!(merged.profile.name.as_deref(), Some("Blake R."));
    assert_eq!(merged.profile.role.as_deref(), Some("PM"));
}

#[test]
fn test_nested_planning_patch_merges_field_by_field() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let seed: MemoryPatch = serde_json::from_str(
        r#"{"profile": {"weekly_planning": {"planning_day": "monday", "timezone": "America/Chicago"}}}"#,
    )
    .unwrap();
    store.patch("u1", seed, false).unwrap();

    let update: MemoryPatch = serde_json::from_str(
        r#"{"profile": {"weekly_planning": {"planning_time_local": "08:30"}}}"#,
    )
    .unwrap();
    let merged = store.patch("u1", update, false).unwrap();

    let weekly = &merged.profile.weekly_planning;
    assert_eq!(weekly.planning_time_local.as_deref(), Some("08:30"));
    assert_eq!(weekly.timezone.as_deref(), Some("America/Chicago"));
}

#[test]
fn test_list_fields_replace_wholesale() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let seed: MemoryPatch = serde_json::from_str(
        r#"{"working_memory": {"active_priorities": ["a", "b"], "tasks": [{"title": "old"}]}}"#,
    )
    .unwrap();
    store.patch("u1", seed, false).unwrap();

    let update: MemoryPatch =
        serde_json::from_str(r#"{"working_memory": {"tasks": [{"title": "new"}]}}"#).unwrap();
    let merged = store.patch("u1", update, false).unwrap();

    // supplied list replaced entirely; omitted list kept
    assert_eq!(merged.working_memory.tasks.len(), 1);
    assert_eq!(merged.working_memory.tasks[0].title, "new");
    assert_eq!(merged.working_memory.active_priorities, vec!["a", "b"]);
}

#[test]
fn test_event_with_matching_id_is_replaced_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let patch = MemoryPatch {
        events: Some(vec![
            Event::new(EventType::Note).with_id("e2").with_title("second"),
        ]),
        ..Default::default()
    };
    store.patch("u1", patch, false).unwrap();

    // resubmit e1 with corrected content
    let correction = MemoryPatch {
        events: Some(vec![Event::new(EventType::Note)
            .with_id("e1")
            .with_title("kickoff, corrected")]),
        ..Default::default()
    };
    let merged = store.patch("u1", correction, false).unwrap();

    assert_eq!(merged.events.len(), 2);
    assert_eq!(merged.events[0].id.as_deref(), Some("e1"));
    assert_eq!(merged.events[0].title.as_deref(), Some("kickoff, corrected"));
    assert_eq!(merged.events[1].id.as_deref(), Some("e2"));
}

#[test]
fn test_unmatched_event_appends() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let patch = MemoryPatch {
        events: Some(vec![Event::new(EventType::Meeting)
            .with_id("meeting-20250601-retro")
            .with_title("retro")]),
        ..Default::default()
    };
    let merged = store.patch("u1", patch, false).unwrap();

    assert_eq!(merged.events.len(), 2);
    assert_eq!(merged.events[1].title.as_deref(), Some("retro"));
}

#[test]
fn test_patch_is_idempotent_for_stable_event_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let patch = MemoryPatch {
        profile: Some(serde_json::from_str(r#"{"name": "Blake R."}"#).unwrap()),
        events: Some(vec![
            Event::new(EventType::Note)
                .with_id("e1")
                .with_title("kickoff, corrected")
                .with_captured_at("2025-06-01T00:00:00Z"),
            Event::new(EventType::Note)
                .with_id("e3")
                .with_title("fresh")
                .with_captured_at("2025-06-01T00:00:00Z"),
        ]),
        ..Default::default()
    };

    let once = store.patch("u1", patch.clone(), false).unwrap();
    let twice = store.patch("u1", patch, false).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_events_overwrite_replaces_timeline() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let patch = MemoryPatch {
        events: Some(vec![Event::new(EventType::Snapshot)
            .with_id("snapshot-20250601-120000")
            .with_title("clean slate")]),
        ..Default::default()
    };
    let merged = store.patch("u1", patch, true).unwrap();

    assert_eq!(merged.events.len(), 1);
    assert_eq!(merged.events[0].title.as_deref(), Some("clean slate"));
}

#[test]
fn test_incoming_events_get_captured_at_stamped() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with_user(tmp.path());

    let patch = MemoryPatch {
        events: Some(vec![Event::new(EventType::Note).with_title("unstamped")]),
        ..Default::default()
    };
    let merged = store.patch("u1", patch, false).unwrap();

    let appended = merged.events.last().unwrap();
    assert!(appended.captured_at.is_some());
}
