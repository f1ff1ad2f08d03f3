//! Shared fixtures.

use std::collections::HashMap;
use std::sync::Arc;

use field_merge_core::{
    ChangeSet, Column, Database, EditableFields, FieldChange, MergeConfig, MergeStrategy, Merger,
    Table,
};

pub const STRATEGIES: [MergeStrategy; 2] = [MergeStrategy::Equality, MergeStrategy::Patch];

/// Database with an `issues(id, title, description)` table.
pub fn issues_db() -> (Database, Arc<Table>) {
    let db = Database::new();
    let table = db
        .create_table(
            "issues",
            "id",
            vec![Column::new("title").required(), Column::new("description")],
        )
        .unwrap();
    (db, table)
}

pub fn editable() -> EditableFields {
    EditableFields::new("id", ["title", "description"]).unwrap()
}

pub fn merger(table: &Arc<Table>, strategy: MergeStrategy) -> Merger<Arc<Table>> {
    Merger::new(Arc::clone(table), MergeConfig::with_strategy(strategy))
}

/// Change set from `(field, baseline, desired)` triples.
pub fn changes(list: &[(&str, &str, &str)]) -> ChangeSet {
    ChangeSet::from_changes(
        list.iter()
            .map(|(name, baseline, desired)| FieldChange::new(*name, Some(*baseline), Some(*desired))),
        &editable(),
        false,
    )
    .unwrap()
}

/// Form-style parameters.
pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn title(table: &Table, id: u64) -> Option<String> {
    table.get(id).unwrap().value(0).map(str::to_string)
}

pub fn description(table: &Table, id: u64) -> Option<String> {
    table.get(id).unwrap().value(1).map(str::to_string)
}
