//! Merge and storage error types.

use thiserror::Error;

/// Errors raised by the merge protocol and the record store.
///
/// Conflicts are not errors: they come back as
/// [`MergeOutcome::Conflict`](crate::merge::MergeOutcome::Conflict).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Table not found
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Column not found in table
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Column declared twice (case-insensitively) in one table
    #[error("Column '{column}' already exists in table '{table}'")]
    ColumnAlreadyExists { table: String, column: String },

    /// Record not found
    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound { table: String, id: u64 },

    /// Field is not in the editable allow-list
    #[error("Field '{field}' is not editable")]
    DisallowedField { field: String },

    /// Field submitted twice in one change set
    #[error("Field '{field}' submitted more than once")]
    DuplicateField { field: String },

    /// Invalid input rejected before any merge work
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A single-identity conditional write touched more than one row
    #[error("More than one record updated for id {record_id} ({rows} rows)")]
    MultipleRowsAffected { record_id: u64, rows: usize },

    /// A conditional write touched no row, yet every field still matches
    #[error("No update occurred for id {record_id}, but no conflict was found")]
    NoConflictFound { record_id: u64 },

    /// Patch library rejected a patch it was asked to apply
    #[error("Patch could not be applied: {0}")]
    Patch(String),

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl MergeError {
    /// Returns `true` for invariant violations that indicate a defect in
    /// predicate construction or allow-list configuration.
    ///
    /// Callers should render a generic error and must not retry the merge.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MergeError::MultipleRowsAffected { .. } | MergeError::NoConflictFound { .. }
        )
    }

    /// Returns `true` for input the caller should have rejected upstream.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MergeError::DisallowedField { .. }
                | MergeError::DuplicateField { .. }
                | MergeError::Validation(_)
        )
    }
}

impl<T> From<std::sync::PoisonError<T>> for MergeError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        MergeError::LockPoisoned
    }
}
