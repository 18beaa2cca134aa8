//! Domain Services
//!
//! Pure logic with no filesystem access: event deduplication, merge-patch
//! application, and record diffing.

pub mod diff;
pub mod events;
pub mod merge;

pub use events::{dedupe_events, event_key, EventKey, MAX_EVENTS};
pub use merge::merge_memory;
