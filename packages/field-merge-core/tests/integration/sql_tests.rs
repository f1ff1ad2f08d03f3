//! SQL rendering of the writes the strategies build.

use field_merge_core::merge::equality::build_write;
use field_merge_core::write::SqlParam;
use field_merge_core::ConditionalWriteBuilder;

use super::helpers::*;

#[test]
fn test_equality_write_renders_guarded_update() {
    let write = build_write(
        12,
        &changes(&[("title", "Dog", "Cat"), ("description", "", "added")]),
    );
    let statement = write.to_sql("issues", "id").unwrap();

    assert_eq!(
        statement.text,
        "UPDATE issues SET title = ?1, description = ?2 WHERE id = ?3 \
         AND (title = ?4 OR title = ?5) \
         AND ((description IS NULL OR description = '') OR description = ?6)"
    );
    assert_eq!(statement.params.len(), 6);
    assert_eq!(statement.params[2], SqlParam::Id(12));
    assert_eq!(statement.params[3], SqlParam::Text("Dog".to_string()));
}

#[test]
fn test_identity_only_update() {
    let mut builder = ConditionalWriteBuilder::new(1);
    builder.set("title", "x");
    let statement = builder.build().to_sql("issues", "id").unwrap();
    assert_eq!(statement.text, "UPDATE issues SET title = ?1 WHERE id = ?2");
}
