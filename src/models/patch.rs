//! Partial Update Models
//!
//! Merge-patch request shapes. Omitted fields mean "no change"; present
//! fields mean "set to this value". The boundary layer deserializes PATCH
//! bodies into these and hands them to the merge engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::memory::{
    Decision, Event, LongTermKnowledge, PlanningDay, Profile, Project, Stakeholder, System, Task,
    Timeblock, WorkingMemory,
};

/// Initial document for creating a user's memory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MemoryCreate {
    pub profile: Option<Profile>,
    pub working_memory: Option<WorkingMemory>,
    pub long_term_knowledge: Option<LongTermKnowledge>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Partial update shape for weekly planning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeeklyPlanningPatch {
    pub planning_day: Option<PlanningDay>,
    pub planning_time_local: Option<String>,
    pub calendar_link: Option<String>,
    pub timezone: Option<String>,
}

/// Partial update shape for profile metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfilePatch {
    /// Set to update the display name; omit to leave unchanged
    pub name: Option<String>,
    /// Update the short role descriptor if provided
    pub role: Option<String>,
    /// Keys to overwrite in the preferences map; other keys are retained
    pub preferences: Option<Map<String, Value>>,
    /// Patch recurring planning preferences field-by-field
    pub weekly_planning: Option<WeeklyPlanningPatch>,
}

/// Partial update shape for working memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkingMemoryPatch {
    /// Overwrite the active focus thread identifier when provided
    pub current_focus_thread: Option<String>,
    /// Replace the list of priorities; omit to leave unchanged
    pub active_priorities: Option<Vec<String>>,
    /// Replace tasks with the provided list; omit to keep current tasks
    pub tasks: Option<Vec<Task>>,
    /// Replace decisions with the provided list; omit to leave untouched
    pub decisions: Option<Vec<Decision>>,
    /// Replace timeblocks with the provided list; omit to keep current blocks
    pub timeblocks: Option<Vec<Timeblock>>,
}

/// Partial update shape for durable knowledge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LongTermKnowledgePatch {
    /// Replace known projects; omit to preserve existing project data
    pub projects: Option<Vec<Project>>,
    /// Replace stakeholders; omit to keep the current stakeholder list
    pub stakeholders: Option<Vec<Stakeholder>>,
    /// Replace systems and integrations; omit to leave unchanged
    pub systems: Option<Vec<System>>,
}

/// Partial update for a user's memory record.
///
/// Event handling is governed by the `events_overwrite` flag passed to the
/// store's patch operation: replace the whole timeline when true, merge with
/// deduplication when false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MemoryPatch {
    pub profile: Option<ProfilePatch>,
    pub working_memory: Option<WorkingMemoryPatch>,
    pub long_term_knowledge: Option<LongTermKnowledgePatch>,
    pub events: Option<Vec<Event>>,
}

impl MemoryPatch {
    /// True when the patch carries no changes at all
    pub fn is_empty(&self) -> bool {
        self.profile.is_none()
            && self.working_memory.is_none()
            && self.long_term_knowledge.is_none()
            && self.events.is_none()
    }
}
