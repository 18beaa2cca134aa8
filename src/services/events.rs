//! Event Deduplication
//!
//! Merges two event timelines into one. Events carry either a stable id or
//! are identified by their content triple; resubmitting an event with a
//! known key updates it in place instead of duplicating it.

use std::collections::HashMap;

use crate::models::memory::Event;

/// Guardrail to prevent unbounded growth from transcript ingestion
pub const MAX_EVENTS: usize = 500;

/// Derived identity used to decide whether two events are the same
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// Explicit stable identifier
    Id(String),
    /// Fallback content triple: (occurred_at, title, summary), absent
    /// fields normalized to empty strings
    Content(String, String, String),
}

/// Compute the dedup key for an event
pub fn event_key(event: &Event) -> EventKey {
    match event.id.as_deref() {
        Some(id) if !id.is_empty() => EventKey::Id(id.to_string()),
        _ => EventKey::Content(
            event.occurred_at.clone().unwrap_or_default(),
            event.title.clone().unwrap_or_default(),
            event.summary.clone().unwrap_or_default(),
        ),
    }
}

/// Fill in `captured_at` for any event that lacks one.
///
/// Stamping must happen at merge time, before key computation, so that
/// deduplication ordering sees a fully-populated timeline.
pub fn stamp_captured_at(events: &mut [Event], now: &str) {
    for event in events.iter_mut() {
        if event.captured_at.is_none() {
            event.captured_at = Some(now.to_string());
        }
    }
}

/// Merge `incoming` into `existing`, deduplicating by event key.
///
/// The existing list's order is preserved. An incoming event whose key
/// matches an existing one replaces that event at its original position;
/// unmatched events append at the end in submission order. Incoming events
/// missing `captured_at` are stamped with `now` first.
pub fn dedupe_events(existing: &[Event], mut incoming: Vec<Event>, now: &str) -> Vec<Event> {
    stamp_captured_at(&mut incoming, now);

    let mut merged: Vec<Event> = existing.to_vec();
    let mut positions: HashMap<EventKey, usize> = merged
        .iter()
        .enumerate()
        .map(|(idx, event)| (event_key(event), idx))
        .collect();

    for event in incoming {
        let key = event_key(&event);
        match positions.get(&key) {
            Some(&idx) => merged[idx] = event,
            None => {
                positions.insert(key, merged.len());
                merged.push(event);
            }
        }
    }

    merged
}

/// Keep the newest `MAX_EVENTS` entries (the tail of the merged list)
pub fn cap_events(mut events: Vec<Event>) -> Vec<Event> {
    if events.len() > MAX_EVENTS {
        events.drain(..events.len() - MAX_EVENTS);
    }
    events
}
