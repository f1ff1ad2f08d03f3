use serde::{Deserialize, Serialize};

/// One stored record.
///
/// `values` follows the owning table's column order; `None` is NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub values: Vec<Option<String>>,
}

impl Record {
    /// Returns the value at `index`, or `None` for NULL or out of range.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}
