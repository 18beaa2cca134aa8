//! Datastore Path Utilities
//!
//! Resolves the files that make up one datastore root: the primary
//! memory file, its rolling backup, and the append-only audit log.

use std::path::{Path, PathBuf};

use crate::utils::error::{StoreError, StoreResult};

/// Primary datastore file name
pub const MEMORY_FILE: &str = "memory.json";
/// Rolling backup file name (last known good)
pub const BACKUP_FILE: &str = "memory_backup.json";
/// Prefix for timestamped backup snapshots
pub const BACKUP_SNAPSHOT_PREFIX: &str = "memory_backup_";
/// Append-only audit log file name
pub const AUDIT_LOG_FILE: &str = "memory_audit.log";

/// File locations for one datastore root directory
#[derive(Debug, Clone)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    /// Create paths rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The datastore root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the primary memory file
    pub fn memory_file(&self) -> PathBuf {
        self.root.join(MEMORY_FILE)
    }

    /// Path to the rolling backup file
    pub fn backup_file(&self) -> PathBuf {
        self.root.join(BACKUP_FILE)
    }

    /// Path to a timestamped backup snapshot
    pub fn backup_snapshot(&self, timestamp: &str) -> PathBuf {
        self.root
            .join(format!("{}{}.json", BACKUP_SNAPSHOT_PREFIX, timestamp))
    }

    /// Path to the audit log file
    pub fn audit_log_file(&self) -> PathBuf {
        self.root.join(AUDIT_LOG_FILE)
    }
}

/// Get the user's home directory
pub fn home_dir() -> StoreResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| StoreError::internal("Could not determine home directory"))
}

/// Get the default datastore directory (~/.copilot-memory/)
pub fn default_data_dir() -> StoreResult<PathBuf> {
    Ok(home_dir()?.join(".copilot-memory"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> StoreResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
