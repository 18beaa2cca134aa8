//! Audit Logger
//!
//! Appends one diff entry per mutating operation to an append-only JSONL
//! log. Each line is self-describing and independently parsable, so a
//! partial tail from a crash mid-append cannot corrupt prior entries. The
//! log is never truncated, reordered, or rewritten.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

use serde_json::{Map, Value};

use crate::models::audit::{AuditEntry, OperationKind};
use crate::models::memory::UserMemory;
use crate::services::diff::{diff_values, unified_diff};
use crate::utils::error::StoreResult;
use crate::utils::paths::StorePaths;

/// Appends audit entries for datastore mutations
#[derive(Debug)]
pub struct AuditLogger {
    paths: StorePaths,
}

impl AuditLogger {
    /// Create an audit logger for the given datastore paths
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Record one mutation: compute the field-level diff between the before
    /// and after states and append it as a single JSON line.
    ///
    /// Callers treat a failure here as a warning, not an error: audit
    /// logging is best-effort observability and must never roll back a
    /// persist that already succeeded.
    pub fn record(
        &self,
        user_id: &str,
        operation: OperationKind,
        before: Option<&UserMemory>,
        after: &UserMemory,
    ) -> StoreResult<()> {
        let before_value = match before {
            Some(record) => serde_json::to_value(record)?,
            None => Value::Object(Map::new()),
        };
        let after_value = serde_json::to_value(after)?;

        let changes = diff_values(&before_value, &after_value);
        let before_pretty = serde_json::to_string_pretty(&before_value)?;
        let after_pretty = serde_json::to_string_pretty(&after_value)?;
        let diff = unified_diff(&before_pretty, &after_pretty);

        let entry = AuditEntry::new(user_id, operation)
            .with_changes(changes)
            .with_diff(diff);
        let line = serde_json::to_string(&entry)?;

        let path = self.paths.audit_log_file();
        let needs_leading_newline = Self::has_torn_tail(&path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if needs_leading_newline {
            file.write_all(b"\n")?;
        }
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;

        tracing::info!(user_id, operation = %operation, "Audit entry recorded");
        Ok(())
    }

    /// True when the log exists and its last byte is not a newline, the
    /// mark of a crash mid-append. The next entry then starts on a fresh
    /// line so the torn tail stays isolated to its own line.
    fn has_torn_tail(path: &std::path::Path) -> StoreResult<bool> {
        let len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(false),
        };
        if len == 0 {
            return Ok(false);
        }

        let mut file = fs::File::open(path)?;
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}
