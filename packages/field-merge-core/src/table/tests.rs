use super::row_buffer::RowBuffer;
use super::*;
use crate::error::MergeError;
use crate::gateway::StorageGateway;
use crate::write::ConditionalWriteBuilder;
use ntest::timeout;
use std::sync::Arc;
use std::thread;

fn issues() -> Table {
    Table::create(
        "issues",
        "id",
        vec![Column::new("title").required(), Column::new("description")],
    )
    .unwrap()
}

#[test]
fn test_create_rejects_duplicate_columns_ignoring_case() {
    let result = Table::create(
        "issues",
        "id",
        vec![Column::new("title"), Column::new("TITLE")],
    );
    assert!(matches!(
        result,
        Err(MergeError::ColumnAlreadyExists { .. })
    ));

    let result = Table::create("issues", "id", vec![Column::new("Id")]);
    assert!(matches!(
        result,
        Err(MergeError::ColumnAlreadyExists { .. })
    ));
}

#[test]
fn test_insert_and_get() {
    let table = issues();
    let id = table
        .insert(&[("title", Some("Dog")), ("description", None)])
        .unwrap();
    assert_eq!(id, 1);
    assert_eq!(table.insert(&[("title", Some("Cat"))]).unwrap(), 2);

    let record = table.get(id).unwrap();
    assert_eq!(record.value(0), Some("Dog"));
    assert_eq!(record.value(1), None);
    assert_eq!(table.record_count(), 2);
    assert_eq!(
        table.records().iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn test_insert_enforces_required_columns() {
    let table = issues();
    assert!(matches!(
        table.insert(&[("description", Some("x"))]),
        Err(MergeError::Validation(_))
    ));
    assert!(table.insert(&[("title", Some(""))]).is_err());
    assert_eq!(table.record_count(), 0);
}

#[test]
fn test_columns_resolve_case_insensitively() {
    let table = issues();
    let id = table.insert(&[("TITLE", Some("Dog"))]).unwrap();
    assert_eq!(table.resolve_column("Title").unwrap(), 0);

    let values = table.fetch_fields(id, &["TiTlE"]).unwrap();
    assert_eq!(values.get("TiTlE"), Some(&Some("Dog".to_string())));
}

#[test]
fn test_get_unknown_record() {
    let table = issues();
    assert!(matches!(
        table.get(42),
        Err(MergeError::RecordNotFound { id: 42, .. })
    ));
    assert!(matches!(
        table.fetch_fields(42, &["title"]),
        Err(MergeError::RecordNotFound { .. })
    ));
}

#[test]
fn test_conditional_update_applies_when_predicate_holds() {
    let table = issues();
    let id = table.insert(&[("title", Some("Dog"))]).unwrap();

    let mut builder = ConditionalWriteBuilder::new(id);
    builder
        .set("title", "Cat")
        .require_any_of("title", &["Dog", "Cat"]);
    assert_eq!(table.execute_conditional_update(&builder.build()).unwrap(), 1);
    assert_eq!(table.get(id).unwrap().value(0), Some("Cat"));
}

#[test]
fn test_conditional_update_skips_when_predicate_fails() {
    let table = issues();
    let id = table.insert(&[("title", Some("Fish"))]).unwrap();

    let mut builder = ConditionalWriteBuilder::new(id);
    builder
        .set("title", "Cat")
        .require_any_of("title", &["Dog", "Cat"]);
    assert_eq!(table.execute_conditional_update(&builder.build()).unwrap(), 0);
    assert_eq!(table.get(id).unwrap().value(0), Some("Fish"));
}

#[test]
fn test_conditional_update_missing_record_affects_nothing() {
    let table = issues();
    let mut builder = ConditionalWriteBuilder::new(9);
    builder.set("title", "Cat");
    assert_eq!(table.execute_conditional_update(&builder.build()).unwrap(), 0);
}

#[test]
fn test_conditional_update_null_matches_empty() {
    let table = issues();
    let id = table.insert(&[("title", Some("Dog"))]).unwrap();

    let mut builder = ConditionalWriteBuilder::new(id);
    builder
        .set("description", "added")
        .require_any_of("description", &["", "added"]);
    assert_eq!(table.execute_conditional_update(&builder.build()).unwrap(), 1);
    assert_eq!(table.get(id).unwrap().value(1), Some("added"));
}

#[test]
fn test_conditional_update_unknown_column_errors() {
    let table = issues();
    let id = table.insert(&[("title", Some("Dog"))]).unwrap();

    let mut builder = ConditionalWriteBuilder::new(id);
    builder.set("owner", "me");
    assert!(matches!(
        table.execute_conditional_update(&builder.build()),
        Err(MergeError::ColumnNotFound { .. })
    ));
}

#[test]
fn test_conditional_update_cannot_blank_required_column() {
    let table = issues();
    let id = table.insert(&[("title", Some("Dog"))]).unwrap();

    let mut builder = ConditionalWriteBuilder::new(id);
    builder
        .set("TITLE", "")
        .require_any_of("title", &["Dog", ""]);
    let err = table.execute_conditional_update(&builder.build()).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(table.get(id).unwrap().value(0), Some("Dog"));

    // Optional columns may be cleared
    let mut builder = ConditionalWriteBuilder::new(id);
    builder.set("description", "");
    assert_eq!(table.execute_conditional_update(&builder.build()).unwrap(), 1);
}

#[test]
fn test_to_json_uses_column_names() {
    let table = issues();
    let id = table.insert(&[("title", Some("Dog"))]).unwrap();
    let json = table.to_json(&table.get(id).unwrap());
    assert_eq!(
        json,
        serde_json::json!({"id": 1, "title": "Dog", "description": null})
    );
}

#[test]
#[timeout(1000)]
fn test_concurrent_guarded_writes_only_one_wins() {
    let table = Arc::new(issues());
    let id = table.insert(&[("title", Some("start"))]).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let mut builder = ConditionalWriteBuilder::new(id);
                builder
                    .set("title", format!("writer {}", n))
                    .require_equal("title", "start");
                table.execute_conditional_update(&builder.build()).unwrap()
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 1);
    assert!(table.get(id).unwrap().value(0).unwrap().starts_with("writer "));
}

#[test]
#[timeout(1000)]
fn test_concurrent_inserts_keep_every_record() {
    let table = Arc::new(issues());

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..25 {
                    let title = format!("{}-{}", n, i);
                    table.insert(&[("title", Some(title.as_str()))]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.record_count(), 100);
}

#[test]
fn test_row_buffer_leaves_rows_untouched_on_none() {
    let buffer = RowBuffer::new();
    let before = buffer.load();
    let out = buffer.update(|_| Ok((None, 7))).unwrap();
    assert_eq!(out, 7);
    assert!(Arc::ptr_eq(&before, &buffer.load()));
    assert!(buffer.load().is_empty());
}
