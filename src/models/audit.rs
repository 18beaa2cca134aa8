//! Audit Trail Models
//!
//! Data structures for the append-only audit log. One entry is written per
//! mutating operation; entries are never rewritten.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of mutating operation recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Patch,
}

impl OperationKind {
    /// Short string form used in log messages
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Patch => "patch",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a field changed between the before and after states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// A single field-level change, with a dotted path from the record root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Dotted path to the field (e.g. "profile.name")
    pub path: String,
    /// Kind of change
    pub change: ChangeKind,
    /// Value before the change (absent for additions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    /// Value after the change (absent for removals)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

impl FieldChange {
    /// A field that exists only in the after state
    pub fn added(path: impl Into<String>, after: Value) -> Self {
        Self {
            path: path.into(),
            change: ChangeKind::Added,
            before: None,
            after: Some(after),
        }
    }

    /// A field that exists only in the before state
    pub fn removed(path: impl Into<String>, before: Value) -> Self {
        Self {
            path: path.into(),
            change: ChangeKind::Removed,
            before: Some(before),
            after: None,
        }
    }

    /// A field whose value differs between the two states
    pub fn changed(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self {
            path: path.into(),
            change: ChangeKind::Changed,
            before: Some(before),
            after: Some(after),
        }
    }
}

/// One immutable audit log entry, serialized as a single JSON line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry identifier (UUID)
    pub id: String,
    /// When the mutation was recorded (RFC 3339)
    pub timestamp: String,
    /// User whose record was mutated
    pub user_id: String,
    /// Kind of mutating operation
    pub operation: OperationKind,
    /// Field-level changes between the before and after states
    pub changes: Vec<FieldChange>,
    /// Unified diff of the record's JSON rendering, for human audit
    pub diff: String,
}

impl AuditEntry {
    /// Create a new entry stamped with the current instant
    pub fn new(user_id: impl Into<String>, operation: OperationKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            user_id: user_id.into(),
            operation,
            changes: Vec::new(),
            diff: String::new(),
        }
    }

    /// Set the field-level changes
    pub fn with_changes(mut self, changes: Vec<FieldChange>) -> Self {
        self.changes = changes;
        self
    }

    /// Set the unified diff text
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = diff.into();
        self
    }
}
