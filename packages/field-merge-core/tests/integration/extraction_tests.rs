//! Submitted form parameters through to storage.

use field_merge_core::{ChangeSet, MergeError};

use super::helpers::*;

#[test]
fn test_form_submission_merges_changed_fields() {
    let (_db, table) = issues_db();
    let id = table
        .insert(&[("title", Some("Dog")), ("description", Some("line one\nline two"))])
        .unwrap();

    let submitted = params(&[
        ("id", "999"),
        ("title", "Cat"),
        ("title.old", "Dog"),
        ("description", "line one\r\nline two"),
        ("description.old", "line one\r\nline two"),
    ]);
    let changes = ChangeSet::extract(&submitted, &editable(), true);
    assert_eq!(changes.names(), vec!["title"]);

    for strategy in STRATEGIES {
        let outcome = merger(&table, strategy).merge(id, &changes).unwrap();
        assert!(outcome.is_committed());
    }
    assert_eq!(title(&table, id).as_deref(), Some("Cat"));
    assert_eq!(
        description(&table, id).as_deref(),
        Some("line one\nline two")
    );
}

#[test]
fn test_missing_baseline_counts_as_empty() {
    let (_db, table) = issues_db();
    let id = table.insert(&[("title", Some("Dog"))]).unwrap();

    let submitted = params(&[("description", "first text")]);
    let changes = ChangeSet::extract(&submitted, &editable(), false);
    assert_eq!(changes.names(), vec!["description"]);

    let outcome = merger(&table, Default::default())
        .merge(id, &changes)
        .unwrap();
    assert!(outcome.is_committed());
    assert_eq!(description(&table, id).as_deref(), Some("first text"));
}

#[test]
fn test_identity_cannot_be_edited() {
    let result = ChangeSet::from_changes(
        vec![field_merge_core::FieldChange::new("id", Some("1"), Some("2"))],
        &editable(),
        false,
    );
    assert!(matches!(result, Err(MergeError::DisallowedField { .. })));
}
