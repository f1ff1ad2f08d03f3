//! Per-field conflict reports returned when a merge is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A field that could not be applied, with the value currently stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConflict {
    pub field: String,
    pub current: String,
}

impl FieldConflict {
    /// Human-readable line for this conflict.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field {}: conflict, current value is {}",
            self.field, self.current
        )
    }
}

/// Conflicted fields of a merge that did not commit.
///
/// Entries keep the change set's field order and are unique per field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictReport {
    conflicts: Vec<FieldConflict>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a conflict, replacing an earlier entry for the same field.
    pub fn push(&mut self, field: &str, current: &str) {
        match self.conflicts.iter_mut().find(|c| c.field == field) {
            Some(existing) => existing.current = current.to_string(),
            None => self.conflicts.push(FieldConflict {
                field: field.to_string(),
                current: current.to_string(),
            }),
        }
    }

    /// Current value recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.conflicts
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.current.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldConflict> {
        self.conflicts.iter()
    }

    /// Conflicted field names in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.conflicts.iter().map(|c| c.field.as_str()).collect()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conflict) in self.conflicts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", conflict)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ConflictReport {
    type Item = &'a FieldConflict;
    type IntoIter = std::slice::Iter<'a, FieldConflict>;

    fn into_iter(self) -> Self::IntoIter {
        self.conflicts.iter()
    }
}
