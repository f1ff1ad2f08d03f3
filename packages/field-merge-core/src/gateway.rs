//! Storage seam used by the merge protocol.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::MergeError;
use crate::write::ConditionalWrite;

/// Stored values keyed by the requested field names.
///
/// `None` is an absent (NULL) value; it compares equal to the empty string
/// throughout the merge protocol.
pub type FieldValues = HashMap<String, Option<String>>;

/// Record store the merge protocol reads from and writes to.
///
/// Implementations must evaluate a conditional write's predicate and apply
/// its assignments as one atomic step.
pub trait StorageGateway {
    /// Reads the current values of `fields` for one record.
    ///
    /// # Returns
    /// A map keyed by each requested name exactly as given. Fails with
    /// [`MergeError::RecordNotFound`] if the record does not exist.
    fn fetch_fields(&self, record_id: u64, fields: &[&str]) -> Result<FieldValues, MergeError>;

    /// Executes a conditional write.
    ///
    /// # Returns
    /// The number of rows affected; `0` when the record is missing or the
    /// predicate does not hold.
    fn execute_conditional_update(&self, write: &ConditionalWrite) -> Result<usize, MergeError>;
}

impl<G: StorageGateway + ?Sized> StorageGateway for &G {
    fn fetch_fields(&self, record_id: u64, fields: &[&str]) -> Result<FieldValues, MergeError> {
        (**self).fetch_fields(record_id, fields)
    }

    fn execute_conditional_update(&self, write: &ConditionalWrite) -> Result<usize, MergeError> {
        (**self).execute_conditional_update(write)
    }
}

impl<G: StorageGateway + ?Sized> StorageGateway for Arc<G> {
    fn fetch_fields(&self, record_id: u64, fields: &[&str]) -> Result<FieldValues, MergeError> {
        (**self).fetch_fields(record_id, fields)
    }

    fn execute_conditional_update(&self, write: &ConditionalWrite) -> Result<usize, MergeError> {
        (**self).execute_conditional_update(write)
    }
}

/// Reads a fetched value, treating absent and NULL as empty.
pub(crate) fn stored<'a>(values: &'a FieldValues, field: &str) -> &'a str {
    values
        .get(field)
        .and_then(|value| value.as_deref())
        .unwrap_or("")
}
