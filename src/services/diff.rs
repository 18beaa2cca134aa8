//! Record Diff Computation
//!
//! Produces the two renderings carried by each audit entry: a structural
//! field-level diff (added/removed/changed leaves with dotted paths) and a
//! unified text diff of the records' JSON form.

use serde_json::Value;
use similar::{ChangeTag, TextDiff};

use crate::models::audit::FieldChange;

/// Compute the field-level diff between two JSON values.
///
/// Objects are walked recursively; every other value (including arrays) is
/// compared wholesale. Paths are dotted from the record root.
pub fn diff_values(before: &Value, after: &Value) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    diff_into("", before, after, &mut changes);
    changes
}

fn diff_into(path: &str, before: &Value, after: &Value, changes: &mut Vec<FieldChange>) {
    match (before, after) {
        (Value::Object(before_map), Value::Object(after_map)) => {
            for (key, before_value) in before_map {
                let child_path = join_path(path, key);
                match after_map.get(key) {
                    Some(after_value) => {
                        diff_into(&child_path, before_value, after_value, changes)
                    }
                    None => changes.push(FieldChange::removed(child_path, before_value.clone())),
                }
            }
            for (key, after_value) in after_map {
                if !before_map.contains_key(key) {
                    changes.push(FieldChange::added(join_path(path, key), after_value.clone()));
                }
            }
        }
        (before_value, after_value) if before_value != after_value => {
            changes.push(FieldChange::changed(
                path.to_string(),
                before_value.clone(),
                after_value.clone(),
            ));
        }
        _ => {}
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Render a unified diff between two text renderings of a record
pub fn unified_diff(before: &str, after: &str) -> String {
    let diff = TextDiff::from_lines(before, after);

    let mut output = String::from("--- before\n+++ after\n");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }

        let (old_start, old_count, new_start, new_count) = group.iter().fold(
            (usize::MAX, 0usize, usize::MAX, 0usize),
            |(os, oc, ns, nc), op| {
                let old_range = op.old_range();
                let new_range = op.new_range();
                (
                    os.min(old_range.start),
                    oc + old_range.len(),
                    ns.min(new_range.start),
                    nc + new_range.len(),
                )
            },
        );

        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_start + 1,
            old_count,
            new_start + 1,
            new_count
        ));

        for op in group {
            for change in diff.iter_changes(op) {
                let prefix = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };

                output.push_str(prefix);
                output.push_str(change.value());
            }
        }
    }

    output
}
