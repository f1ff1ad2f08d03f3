//! Structured write predicates.
//!
//! A predicate is a conjunction of clauses; each clause is a disjunction of
//! (column, operator, value) conditions. Storage adapters render it into
//! their native conditional-update form.

use crate::error::MergeError;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Column equals the condition's value
    Eq,
    /// Column is NULL or the empty string
    IsNullOrEmpty,
}

/// One `(column, operator, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Column name as submitted (resolved by the storage adapter)
    pub column: String,
    /// Comparison operator
    pub operator: Operator,
    /// Compared value (`None` for [`Operator::IsNullOrEmpty`])
    pub value: Option<String>,
}

impl Condition {
    /// Condition holding when `column` currently reads `value`.
    ///
    /// An empty `value` becomes "IS NULL OR = ''" so that absent and empty
    /// stored values compare alike.
    pub fn equals(column: impl Into<String>, value: &str) -> Self {
        let column = column.into();
        if value.is_empty() {
            Self {
                column,
                operator: Operator::IsNullOrEmpty,
                value: None,
            }
        } else {
            Self {
                column,
                operator: Operator::Eq,
                value: Some(value.to_string()),
            }
        }
    }

    /// Evaluates the condition against a stored value.
    pub fn matches(&self, stored: Option<&str>) -> bool {
        match self.operator {
            Operator::IsNullOrEmpty => stored.map_or(true, str::is_empty),
            Operator::Eq => stored == self.value.as_deref(),
        }
    }
}

/// Disjunction of conditions; holds when any condition holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Alternatives
    pub any_of: Vec<Condition>,
}

/// Conjunction of clauses scoped to a single record identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// Identity the write is restricted to
    pub record_id: u64,
    /// Clauses that must all hold
    pub clauses: Vec<Clause>,
}

impl Predicate {
    /// Creates a predicate matching only the identity.
    pub fn for_record(record_id: u64) -> Self {
        Self {
            record_id,
            clauses: Vec::new(),
        }
    }

    /// Evaluates the clauses against one stored record.
    ///
    /// # Arguments
    /// * `value_of` - Resolves a column name to the record's stored value
    ///
    /// # Returns
    /// `Result<bool, MergeError>`; resolution errors propagate.
    pub fn evaluate<'v, F>(&self, mut value_of: F) -> Result<bool, MergeError>
    where
        F: FnMut(&str) -> Result<Option<&'v str>, MergeError>,
    {
        for clause in &self.clauses {
            let mut holds = false;
            for condition in &clause.any_of {
                if condition.matches(value_of(&condition.column)?) {
                    holds = true;
                    break;
                }
            }
            if !holds {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Iterates over every condition in every clause.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.clauses.iter().flat_map(|c| c.any_of.iter())
    }
}
