//! Conditional writes.
//!
//! A [`ConditionalWrite`] bundles the assignments for one record with the
//! predicate that must hold at write time. It is storage-neutral: the
//! in-memory table evaluates it directly and [`ConditionalWrite::to_sql`]
//! renders it for relational adapters.

mod builder;
mod predicate;
mod sql;

pub use builder::ConditionalWriteBuilder;
pub use predicate::{Clause, Condition, Operator, Predicate};
pub use sql::{SqlParam, SqlStatement};

/// Sets `column` to `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: String,
    pub value: String,
}

/// Guarded update of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalWrite {
    /// Values to store
    pub assignments: Vec<Assignment>,
    /// Condition the record must satisfy at write time
    pub predicate: Predicate,
}

impl ConditionalWrite {
    /// Identity of the targeted record.
    pub fn record_id(&self) -> u64 {
        self.predicate.record_id
    }

    /// Names of the assigned columns, in assignment order.
    pub fn columns(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.column.as_str()).collect()
    }

    /// Returns the value assigned to `column`, if any.
    pub fn assigned(&self, column: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.column == column)
            .map(|a| a.value.as_str())
    }
}
