//! Memory Store
//!
//! Orchestrates the datastore lifecycle: wholesale load with corruption
//! recovery, create/fetch/patch operations, backup-before-write, atomic
//! persist, and best-effort audit logging. All mutations across all user
//! keys serialize through one write lock; reads never take it and rely on
//! the atomic-replace write strategy to observe consistent state.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;

use crate::models::audit::OperationKind;
use crate::models::memory::UserMemory;
use crate::models::patch::{MemoryCreate, MemoryPatch};
use crate::services::events::{cap_events, stamp_captured_at};
use crate::services::merge::merge_memory;
use crate::storage::audit_log::AuditLogger;
use crate::storage::backup::BackupManager;
use crate::utils::error::{StoreError, StoreResult};
use crate::utils::paths::{default_data_dir, ensure_dir, StorePaths};

/// The full on-disk mapping of user id to memory record
pub type Datastore = BTreeMap<String, UserMemory>;

/// Durable, single-file store of per-user memory records
#[derive(Debug)]
pub struct MemoryStore {
    paths: StorePaths,
    backup: BackupManager,
    audit: AuditLogger,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let paths = StorePaths::new(root);
        ensure_dir(paths.root())?;
        Ok(Self {
            backup: BackupManager::new(paths.clone()),
            audit: AuditLogger::new(paths.clone()),
            paths,
            write_lock: Mutex::new(()),
        })
    }

    /// Open a store at the conventional location (~/.copilot-memory/)
    pub fn open_default() -> StoreResult<Self> {
        Self::new(default_data_dir()?)
    }

    /// Load the full datastore from disk.
    ///
    /// A missing primary file is a fresh store. An unparsable primary file
    /// triggers restore from backup; if the backup is also unusable the
    /// result is `RecoveryFailure`, never a silent empty store that would
    /// mask data loss.
    pub fn load(&self) -> StoreResult<Datastore> {
        let path = self.paths.memory_file();
        if !path.exists() {
            tracing::info!("No memory file found, starting fresh");
            return Ok(Datastore::new());
        }

        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(data) => Ok(data),
            Err(parse_err) => {
                tracing::warn!(
                    error = %parse_err,
                    path = %path.display(),
                    "Corrupted memory file detected, restoring from backup"
                );
                self.backup.restore().map_err(|restore_err| {
                    StoreError::recovery_failure(format!(
                        "primary file unparsable ({}) and backup unusable ({})",
                        parse_err, restore_err
                    ))
                })
            }
        }
    }

    /// Fetch one user's record. Read-only; never takes the write lock.
    pub fn fetch(&self, user_id: &str) -> StoreResult<UserMemory> {
        let data = self.load()?;
        data.get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("Memory not found for '{}'", user_id)))
    }

    /// Create a memory record for a user.
    ///
    /// Fails with `Conflict` when the user already has a record and
    /// `overwrite` is false.
    pub fn create(
        &self,
        user_id: &str,
        document: MemoryCreate,
        overwrite: bool,
    ) -> StoreResult<UserMemory> {
        let _guard = self.lock_writes()?;
        let mut data = self.load()?;

        if data.contains_key(user_id) && !overwrite {
            return Err(StoreError::conflict(format!(
                "Memory for '{}' already exists. Use patch or set overwrite.",
                user_id
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let mut events = document.events;
        stamp_captured_at(&mut events, &now);

        let record = UserMemory {
            user_id: user_id.to_string(),
            profile: document.profile.unwrap_or_default(),
            working_memory: document.working_memory.unwrap_or_default(),
            long_term_knowledge: document.long_term_knowledge.unwrap_or_default(),
            events: cap_events(events),
        };

        let previous = data.insert(user_id.to_string(), record.clone());
        self.persist(&data)?;
        self.record_audit(user_id, OperationKind::Create, previous.as_ref(), &record);
        Ok(record)
    }

    /// Apply a merge patch to an existing record.
    ///
    /// Fails with `NotFound` before any side effect when the user has no
    /// record.
    pub fn patch(
        &self,
        user_id: &str,
        partial: MemoryPatch,
        events_overwrite: bool,
    ) -> StoreResult<UserMemory> {
        let _guard = self.lock_writes()?;
        let mut data = self.load()?;

        let existing = data
            .get(user_id)
            .ok_or_else(|| StoreError::not_found(format!("Memory not found for '{}'", user_id)))?;

        let now = chrono::Utc::now().to_rfc3339();
        let merged = merge_memory(existing, &partial, events_overwrite, &now);

        let previous = data.insert(user_id.to_string(), merged.clone());
        self.persist(&data)?;
        self.record_audit(user_id, OperationKind::Patch, previous.as_ref(), &merged);
        Ok(merged)
    }

    /// Write the datastore to disk: snapshot the previous on-disk content,
    /// then write to a temp file and atomically replace the primary. A crash
    /// mid-write can never leave a half-written primary file.
    fn persist(&self, data: &Datastore) -> StoreResult<()> {
        let primary = self.paths.memory_file();

        if primary.exists() {
            let previous = fs::read(&primary)?;
            // Only parsable content may become the backup; snapshotting a
            // corrupt primary would destroy the last known good state.
            if serde_json::from_slice::<Datastore>(&previous).is_ok() {
                self.backup.snapshot(&previous)?;
            } else {
                tracing::warn!(
                    path = %primary.display(),
                    "Previous primary content is unparsable; keeping existing backup"
                );
            }
        }

        let content = serde_json::to_string_pretty(data)?;
        let mut tmp = NamedTempFile::new_in(self.paths.root())?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&primary).map_err(|e| StoreError::Io(e.error))?;

        tracing::info!(path = %primary.display(), "Memory saved");
        Ok(())
    }

    /// Best-effort audit append; a failure must not roll back the persist
    /// that already succeeded.
    fn record_audit(
        &self,
        user_id: &str,
        operation: OperationKind,
        before: Option<&UserMemory>,
        after: &UserMemory,
    ) {
        if let Err(e) = self.audit.record(user_id, operation, before, after) {
            tracing::warn!(
                error = %e,
                user_id,
                operation = %operation,
                "Failed to write audit entry; mutation already persisted"
            );
        }
    }

    fn lock_writes(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::internal("write lock poisoned"))
    }
}
