//! Database container managing tables.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::MergeError;
use crate::table::{Column, Table};

/// Database container holding all tables.
///
/// Tables are shared as `Arc<Table>` so callers can hand one to a
/// [`Merger`](crate::merge::Merger) as its storage gateway.
#[derive(Debug, Default)]
pub struct Database {
    /// Map of table name to table instance
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Database {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table.
    ///
    /// # Arguments
    /// * `name` - Table name
    /// * `identity` - Identity column name
    /// * `columns` - Column definitions
    ///
    /// # Returns
    /// `Result<Arc<Table>, MergeError>` containing the created table.
    pub fn create_table(
        &self,
        name: &str,
        identity: &str,
        columns: Vec<Column>,
    ) -> Result<Arc<Table>, MergeError> {
        let mut tables = self.tables.write()?;
        if tables.contains_key(name) {
            return Err(MergeError::TableAlreadyExists(name.to_string()));
        }
        let table = Arc::new(Table::create(name, identity, columns)?);
        tables.insert(name.to_string(), Arc::clone(&table));
        tracing::info!(table = name, "Created table");
        Ok(table)
    }

    /// Gets a table by name.
    ///
    /// # Returns
    /// `Result<Arc<Table>, MergeError>`; `TableNotFound` if absent.
    pub fn table(&self, name: &str) -> Result<Arc<Table>, MergeError> {
        let tables = self.tables.read()?;
        tables
            .get(name)
            .cloned()
            .ok_or_else(|| MergeError::TableNotFound {
                table: name.to_string(),
            })
    }
}
