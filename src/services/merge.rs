//! Patch Merge Engine
//!
//! Applies a merge-patch document onto an existing memory record. Omitted
//! fields keep their existing values; nested objects merge field-by-field;
//! list fields replace wholesale, except the event timeline which goes
//! through the deduplicator.

use serde_json::{Map, Value};

use crate::models::memory::{
    LongTermKnowledge, Profile, UserMemory, WeeklyPlanningSettings, WorkingMemory,
};
use crate::models::patch::{
    LongTermKnowledgePatch, MemoryPatch, ProfilePatch, WeeklyPlanningPatch, WorkingMemoryPatch,
};
use crate::services::events::{cap_events, dedupe_events, stamp_captured_at};

/// Apply a merge patch to an existing record, producing a new record.
///
/// The existing record is never mutated, so a failed operation downstream
/// cannot corrupt the prior state. With `events_overwrite` the patch's event
/// list replaces the timeline wholesale; otherwise the two timelines merge
/// through the deduplicator. `now` stamps any incoming event that lacks
/// `captured_at`.
pub fn merge_memory(
    existing: &UserMemory,
    patch: &MemoryPatch,
    events_overwrite: bool,
    now: &str,
) -> UserMemory {
    let mut merged = existing.clone();

    if let Some(profile_patch) = &patch.profile {
        apply_profile_patch(&mut merged.profile, profile_patch);
    }
    if let Some(working_patch) = &patch.working_memory {
        apply_working_memory_patch(&mut merged.working_memory, working_patch);
    }
    if let Some(knowledge_patch) = &patch.long_term_knowledge {
        apply_knowledge_patch(&mut merged.long_term_knowledge, knowledge_patch);
    }

    if events_overwrite {
        if let Some(events) = &patch.events {
            let mut replaced = events.clone();
            stamp_captured_at(&mut replaced, now);
            merged.events = cap_events(replaced);
        }
    } else if let Some(events) = &patch.events {
        merged.events = cap_events(dedupe_events(&merged.events, events.clone(), now));
    }

    merged
}

/// Merge patch keys into a free-form map, retaining untouched keys.
///
/// Shallow by contract: the internal structure of preference/metadata values
/// is caller-defined and opaque to the core.
fn merge_shallow_map(target: &mut Map<String, Value>, updates: &Map<String, Value>) {
    for (key, value) in updates {
        target.insert(key.clone(), value.clone());
    }
}

fn apply_profile_patch(profile: &mut Profile, patch: &ProfilePatch) {
    if let Some(name) = &patch.name {
        profile.name = Some(name.clone());
    }
    if let Some(role) = &patch.role {
        profile.role = Some(role.clone());
    }
    if let Some(preferences) = &patch.preferences {
        merge_shallow_map(&mut profile.preferences, preferences);
    }
    if let Some(weekly) = &patch.weekly_planning {
        apply_weekly_planning_patch(&mut profile.weekly_planning, weekly);
    }
}

fn apply_weekly_planning_patch(settings: &mut WeeklyPlanningSettings, patch: &WeeklyPlanningPatch) {
    if let Some(day) = patch.planning_day {
        settings.planning_day = Some(day);
    }
    if let Some(time) = &patch.planning_time_local {
        settings.planning_time_local = Some(time.clone());
    }
    if let Some(link) = &patch.calendar_link {
        settings.calendar_link = Some(link.clone());
    }
    if let Some(timezone) = &patch.timezone {
        settings.timezone = Some(timezone.clone());
    }
}

fn apply_working_memory_patch(working: &mut WorkingMemory, patch: &WorkingMemoryPatch) {
    if let Some(thread) = &patch.current_focus_thread {
        working.current_focus_thread = thread.clone();
    }
    if let Some(priorities) = &patch.active_priorities {
        working.active_priorities = priorities.clone();
    }
    if let Some(tasks) = &patch.tasks {
        working.tasks = tasks.clone();
    }
    if let Some(decisions) = &patch.decisions {
        working.decisions = decisions.clone();
    }
    if let Some(timeblocks) = &patch.timeblocks {
        working.timeblocks = timeblocks.clone();
    }
}

fn apply_knowledge_patch(knowledge: &mut LongTermKnowledge, patch: &LongTermKnowledgePatch) {
    if let Some(projects) = &patch.projects {
        knowledge.projects = projects.clone();
    }
    if let Some(stakeholders) = &patch.stakeholders {
        knowledge.stakeholders = stakeholders.clone();
    }
    if let Some(systems) = &patch.systems {
        knowledge.systems = systems.clone();
    }
}
