//! Co-Pilot Memory - Persistence Core
//!
//! Durable, single-file datastore for per-user assistant memory records.
//! It provides:
//! - Create / fetch / merge-patch operations keyed by user id
//! - Deep-merge patch application with timeline-event deduplication
//! - Backup-before-write protection and corruption recovery
//! - Crash-safe atomic persistence and an append-only audit diff log
//!
//! The HTTP routing/validation layer that decodes requests into these typed
//! shapes lives outside this crate and hands it already-validated values.

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export the operational surface
pub use models::audit::{AuditEntry, ChangeKind, FieldChange, OperationKind};
pub use models::memory::{Event, EventType, Profile, UserMemory, WorkingMemory};
pub use models::patch::{MemoryCreate, MemoryPatch};
pub use storage::store::{Datastore, MemoryStore};
pub use utils::error::{StoreError, StoreResult};
