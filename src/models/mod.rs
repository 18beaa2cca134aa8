//! Data Models
//!
//! Serde shapes for memory records, partial updates, and audit entries.

pub mod audit;
pub mod memory;
pub mod patch;

pub use audit::{AuditEntry, ChangeKind, FieldChange, OperationKind};
pub use memory::{
    Decision, DecisionType, Event, EventType, LongTermKnowledge, PlanningDay, Profile, Project,
    ProjectStatus, Stakeholder, System, Task, TaskStatus, Timeblock, TimeblockType, UserMemory,
    WeeklyPlanningSettings, WorkingMemory,
};
pub use patch::{
    LongTermKnowledgePatch, MemoryCreate, MemoryPatch, ProfilePatch, WeeklyPlanningPatch,
    WorkingMemoryPatch,
};
