//! Conflict classification.
//!
//! Turns the affected-row count of a conditional write, and the report built
//! from re-fetched values when nothing was written, into a merge outcome.

use tracing::error;

use super::{ConflictReport, MergeOutcome};
use crate::error::MergeError;

/// What a single-record conditional write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteResult {
    /// Exactly one row changed
    Applied,
    /// No row changed; the predicate did not hold
    Missed,
}

/// Classifies an affected-row count.
///
/// # Returns
/// `Err(MergeError::MultipleRowsAffected)` for more than one row.
pub(crate) fn classify_rows(record_id: u64, rows: usize) -> Result<WriteResult, MergeError> {
    match rows {
        0 => Ok(WriteResult::Missed),
        1 => Ok(WriteResult::Applied),
        rows => {
            error!(record_id, rows, "Conditional write affected more than one record");
            Err(MergeError::MultipleRowsAffected { record_id, rows })
        }
    }
}

/// Concludes a missed write.
///
/// # Returns
/// `Conflict(report)`, or `Err(MergeError::NoConflictFound)` when the report
/// is empty.
pub(crate) fn conclude_missed(
    record_id: u64,
    report: ConflictReport,
) -> Result<MergeOutcome, MergeError> {
    if report.is_empty() {
        error!(record_id, "Write missed but every field still matches");
        return Err(MergeError::NoConflictFound { record_id });
    }
    Ok(MergeOutcome::Conflict(report))
}
