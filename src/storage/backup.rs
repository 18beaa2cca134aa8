//! Backup Manager
//!
//! Writes a recovery copy of the datastore before every mutating write and
//! restores from it when the primary file is corrupt. The snapshot is taken
//! from the *previous* on-disk bytes, strictly before the primary is
//! replaced; a backup of the new write would be useless for recovering from
//! a write that corrupted the primary.

use std::collections::BTreeMap;
use std::fs;

use crate::models::memory::UserMemory;
use crate::utils::error::{StoreError, StoreResult};
use crate::utils::paths::{StorePaths, BACKUP_SNAPSHOT_PREFIX};

/// Number of timestamped snapshots retained alongside the rolling backup
pub const MAX_TIMESTAMPED_BACKUPS: usize = 10;

/// Manages the rolling backup file and its timestamped siblings
#[derive(Debug)]
pub struct BackupManager {
    paths: StorePaths,
}

impl BackupManager {
    /// Create a backup manager for the given datastore paths
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Write the previous primary content to the backup locations.
    ///
    /// Both the rolling backup and a timestamped snapshot are written; a
    /// failure of either is fatal for the current operation, because
    /// persisting new state without a valid fallback would leave the store
    /// unrecoverable if the new write itself proves corrupt.
    pub fn snapshot(&self, previous_content: &[u8]) -> StoreResult<()> {
        let rolling = self.paths.backup_file();
        fs::write(&rolling, previous_content).map_err(|e| {
            StoreError::backup(format!(
                "failed to write rolling backup {}: {}",
                rolling.display(),
                e
            ))
        })?;

        let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let snapshot = self.paths.backup_snapshot(&timestamp);
        fs::write(&snapshot, previous_content).map_err(|e| {
            StoreError::backup(format!(
                "failed to write snapshot {}: {}",
                snapshot.display(),
                e
            ))
        })?;

        tracing::info!(
            rolling = %rolling.display(),
            snapshot = %snapshot.display(),
            "Backup created"
        );

        if let Err(e) = self.prune_snapshots() {
            tracing::warn!(error = %e, "Failed to prune old backup snapshots");
        }

        Ok(())
    }

    /// Parse the rolling backup into a datastore map.
    ///
    /// Fails if the backup is missing or unparsable; there is no further
    /// fallback behind it.
    pub fn restore(&self) -> StoreResult<BTreeMap<String, UserMemory>> {
        let path = self.paths.backup_file();
        if !path.exists() {
            return Err(StoreError::backup(format!(
                "no backup file at {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        let data = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), "Restored datastore from backup");
        Ok(data)
    }

    /// Delete timestamped snapshots beyond the retention limit, oldest first.
    /// The timestamp format sorts lexicographically.
    fn prune_snapshots(&self) -> StoreResult<()> {
        let mut snapshots: Vec<_> = fs::read_dir(self.paths.root())?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                (name.starts_with(BACKUP_SNAPSHOT_PREFIX) && name.ends_with(".json"))
                    .then(|| entry.path())
            })
            .collect();

        if snapshots.len() <= MAX_TIMESTAMPED_BACKUPS {
            return Ok(());
        }

        snapshots.sort();
        let excess = snapshots.len() - MAX_TIMESTAMPED_BACKUPS;
        for path in snapshots.into_iter().take(excess) {
            fs::remove_file(&path)?;
            tracing::debug!(path = %path.display(), "Pruned backup snapshot");
        }

        Ok(())
    }
}
