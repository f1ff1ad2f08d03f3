//! Incremental construction of conditional writes.

use super::{Assignment, Clause, Condition, ConditionalWrite, Predicate};

/// Incrementally assembles a [`ConditionalWrite`].
///
/// # Example
/// ```
/// use field_merge_core::ConditionalWriteBuilder;
///
/// let mut builder = ConditionalWriteBuilder::new(1);
/// builder
///     .set("title", "Cat")
///     .require_any_of("title", &["Dog", "Cat"]);
/// let write = builder.build();
/// assert_eq!(write.assigned("title"), Some("Cat"));
/// ```
#[derive(Debug, Clone)]
pub struct ConditionalWriteBuilder {
    record_id: u64,
    assignments: Vec<Assignment>,
    clauses: Vec<Clause>,
}

impl ConditionalWriteBuilder {
    /// Starts a write targeting `record_id`.
    pub fn new(record_id: u64) -> Self {
        Self {
            record_id,
            assignments: Vec::new(),
            clauses: Vec::new(),
        }
    }

    /// Assigns `value` to `column`, replacing an earlier assignment.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.assignments.iter_mut().find(|a| a.column == column) {
            Some(existing) => existing.value = value,
            None => self.assignments.push(Assignment {
                column: column.to_string(),
                value,
            }),
        }
        self
    }

    /// Requires `column` to still read `value`.
    pub fn require_equal(&mut self, column: &str, value: &str) -> &mut Self {
        self.require_any_of(column, &[value])
    }

    /// Requires `column` to read one of `values`.
    ///
    /// Repeated values and repeated empty values collapse into one condition.
    pub fn require_any_of(&mut self, column: &str, values: &[&str]) -> &mut Self {
        let mut any_of: Vec<Condition> = Vec::with_capacity(values.len());
        for value in values {
            let condition = Condition::equals(column, value);
            if !any_of.contains(&condition) {
                any_of.push(condition);
            }
        }
        if !any_of.is_empty() {
            self.clauses.push(Clause { any_of });
        }
        self
    }

    /// Returns `true` if nothing has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finishes the write.
    pub fn build(self) -> ConditionalWrite {
        ConditionalWrite {
            assignments: self.assignments,
            predicate: Predicate {
                record_id: self.record_id,
                clauses: self.clauses,
            },
        }
    }
}
