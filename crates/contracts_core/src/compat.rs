//! Breaking-change detection between two versions of a contract.
//!
//! Consumers written against `old` keep working with `new` only if no field they
//! may rely on disappears or tightens. Added fields are never breaking.

use crate::{Contract, FieldType};
use serde::Serialize;
use std::fmt;

/// A change from one contract version to the next that can break consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum BreakingChange {
    /// A field present in the old contract is missing from the new one
    FieldRemoved { field: String },
    /// A field's declared type changed
    TypeChanged {
        field: String,
        from: FieldType,
        to: FieldType,
    },
    /// An optional field became required
    BecameRequired { field: String },
}

impl BreakingChange {
    /// Name of the affected field.
    pub fn field(&self) -> &str {
        match self {
            BreakingChange::FieldRemoved { field }
            | BreakingChange::TypeChanged { field, .. }
            | BreakingChange::BecameRequired { field } => field,
        }
    }
}

impl fmt::Display for BreakingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakingChange::FieldRemoved { field } => write!(f, "field '{}' was removed", field),
            BreakingChange::TypeChanged { field, from, to } => {
                write!(f, "field '{}' changed type from {} to {}", field, from, to)
            }
            BreakingChange::BecameRequired { field } => {
                write!(f, "field '{}' is now required", field)
            }
        }
    }
}

/// Lists the breaking changes from `old` to `new`, sorted by field name.
pub fn breaking_changes(old: &Contract, new: &Contract) -> Vec<BreakingChange> {
    let mut changes = Vec::new();

    for before in old.fields() {
        let Some(after) = new.field(&before.name) else {
            changes.push(BreakingChange::FieldRemoved {
                field: before.name.clone(),
            });
            continue;
        };

        if before.field_type != after.field_type {
            changes.push(BreakingChange::TypeChanged {
                field: before.name.clone(),
                from: before.field_type,
                to: after.field_type,
            });
        }
        if !before.required && after.required {
            changes.push(BreakingChange::BecameRequired {
                field: before.name.clone(),
            });
        }
    }

    changes.sort_by(|a, b| a.field().cmp(b.field()));
    changes
}
