//! Table schema and row management.
//!
//! Each table has:
//! - An identity column holding the record id
//! - Ordered text columns
//! - A row buffer published atomically
//! - A record id sequence

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::column::Column;
use super::record::Record;
use super::row_buffer::RowBuffer;
use crate::error::MergeError;
use crate::gateway::{FieldValues, StorageGateway};
use crate::write::ConditionalWrite;

/// Table schema and rows.
#[derive(Debug)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Identity column name
    pub identity: String,
    /// Column definitions in declaration order
    pub columns: Vec<Column>,
    /// Row snapshots
    rows: RowBuffer,
    /// Next record id to assign
    next_id: AtomicU64,
}

impl Table {
    /// Creates a new table.
    ///
    /// Column names are matched case-insensitively, so two columns differing
    /// only in case are rejected, as is a column named like the identity.
    ///
    /// # Arguments
    /// * `name` - Table name
    /// * `identity` - Identity column name
    /// * `columns` - Column definitions
    ///
    /// # Returns
    /// `Result<Table, MergeError>` containing the created table or an error.
    pub fn create(
        name: impl Into<String>,
        identity: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<Self, MergeError> {
        let name = name.into();
        let identity = identity.into();

        if name.is_empty() || identity.is_empty() {
            return Err(MergeError::Validation(
                "table and identity names must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        seen.insert(identity.to_ascii_lowercase());
        for column in &columns {
            if column.name.is_empty() {
                return Err(MergeError::Validation(format!(
                    "empty column name in table '{}'",
                    name
                )));
            }
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(MergeError::ColumnAlreadyExists {
                    table: name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            identity,
            columns,
            rows: RowBuffer::new(),
            next_id: AtomicU64::new(1), // Start IDs at 1
        })
    }

    /// Atomically increments and returns the next record id.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Returns the number of stored records.
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// Resolves a column name, ignoring ASCII case.
    ///
    /// # Returns
    /// `Result<usize, MergeError>` containing the column index.
    pub fn resolve_column(&self, name: &str) -> Result<usize, MergeError> {
        self.columns
            .iter()
            .position(|c| c.is_named(name))
            .ok_or_else(|| MergeError::ColumnNotFound {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Rejects a NULL or empty value for a required column.
    fn check_required(&self, index: usize, value: Option<&str>) -> Result<(), MergeError> {
        match self.columns.get(index) {
            Some(column) if column.required && value.map_or(true, str::is_empty) => {
                Err(MergeError::Validation(format!(
                    "column '{}' of table '{}' is required",
                    column.name, self.name
                )))
            }
            _ => Ok(()),
        }
    }

    /// Inserts a new record.
    ///
    /// Columns not mentioned are stored as NULL.
    ///
    /// # Arguments
    /// * `values` - `(column, value)` pairs; column names are case-insensitive
    ///
    /// # Returns
    /// `Result<u64, MergeError>` containing the assigned record id.
    pub fn insert(&self, values: &[(&str, Option<&str>)]) -> Result<u64, MergeError> {
        let mut row: Vec<Option<String>> = vec![None; self.columns.len()];
        for (column, value) in values {
            let index = self.resolve_column(column)?;
            row[index] = value.map(str::to_string);
        }

        for (index, value) in row.iter().enumerate() {
            self.check_required(index, value.as_deref())?;
        }

        let id = self.next_id();
        let record = Record { id, values: row };
        self.rows.update(|rows| {
            let mut next = rows.clone();
            next.insert(id, record.clone());
            Ok((Some(next), ()))
        })?;

        debug!(table = %self.name, id, "Inserted record");
        Ok(id)
    }

    /// Reads one record.
    ///
    /// # Returns
    /// `Result<Record, MergeError>`; `RecordNotFound` if the id is unknown.
    pub fn get(&self, id: u64) -> Result<Record, MergeError> {
        self.rows
            .load()
            .get(&id)
            .cloned()
            .ok_or_else(|| MergeError::RecordNotFound {
                table: self.name.clone(),
                id,
            })
    }

    /// Returns all records in id order.
    pub fn records(&self) -> Vec<Record> {
        self.rows.load().values().cloned().collect()
    }

    /// Renders a record as a JSON object keyed by column name.
    pub fn to_json(&self, record: &Record) -> Value {
        let mut object = Map::new();
        object.insert(self.identity.clone(), Value::from(record.id));
        for (index, column) in self.columns.iter().enumerate() {
            let value = match record.value(index) {
                Some(text) => Value::String(text.to_string()),
                None => Value::Null,
            };
            object.insert(column.name.clone(), value);
        }
        Value::Object(object)
    }
}

impl StorageGateway for Table {
    fn fetch_fields(&self, record_id: u64, fields: &[&str]) -> Result<FieldValues, MergeError> {
        let indices = fields
            .iter()
            .map(|field| self.resolve_column(field))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self.rows.load();
        let record = rows
            .get(&record_id)
            .ok_or_else(|| MergeError::RecordNotFound {
                table: self.name.clone(),
                id: record_id,
            })?;

        Ok(fields
            .iter()
            .zip(indices)
            .map(|(field, index)| (field.to_string(), record.value(index).map(str::to_string)))
            .collect())
    }

    fn execute_conditional_update(&self, write: &ConditionalWrite) -> Result<usize, MergeError> {
        // Resolve and validate every assignment before touching rows
        let mut assignments = Vec::with_capacity(write.assignments.len());
        for assignment in &write.assignments {
            let index = self.resolve_column(&assignment.column)?;
            self.check_required(index, Some(assignment.value.as_str()))?;
            assignments.push((index, assignment.value.as_str()));
        }
        for condition in write.predicate.conditions() {
            self.resolve_column(&condition.column)?;
        }

        let record_id = write.record_id();
        let affected = self.rows.update(|rows| {
            let Some(record) = rows.get(&record_id) else {
                return Ok((None, 0));
            };

            let holds = write
                .predicate
                .evaluate(|column| Ok(record.value(self.resolve_column(column)?)))?;
            if !holds {
                return Ok((None, 0));
            }

            let mut next = rows.clone();
            if let Some(row) = next.get_mut(&record_id) {
                for (index, value) in &assignments {
                    row.values[*index] = Some((*value).to_string());
                }
            }
            Ok((Some(next), 1))
        })?;

        trace!(table = %self.name, record_id, affected, "Conditional update executed");
        Ok(affected)
    }
}
