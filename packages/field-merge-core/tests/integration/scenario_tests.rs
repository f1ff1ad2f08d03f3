//! Merge scenarios, each run against both strategies.

use field_merge_core::{MergeOutcome, MergeStrategy};

use super::helpers::*;

/// Stored matches baseline: commit and store desired.
#[test]
fn test_baseline_matches_commits() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table.insert(&[("title", Some("Dog"))]).unwrap();

        let outcome = merger(&table, strategy)
            .merge(id, &changes(&[("title", "Dog", "Cat")]))
            .unwrap();

        assert_eq!(outcome, MergeOutcome::Committed, "{}", strategy);
        assert_eq!(title(&table, id).as_deref(), Some("Cat"), "{}", strategy);
    }
}

/// Stored differs from both: conflict with the current value, nothing written.
#[test]
fn test_diverged_value_conflicts() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table.insert(&[("title", Some("Fish"))]).unwrap();

        let outcome = merger(&table, strategy)
            .merge(id, &changes(&[("title", "Dog", "Cat")]))
            .unwrap();

        let report = outcome.conflicts().expect("conflict expected");
        assert_eq!(report.get("title"), Some("Fish"), "{}", strategy);
        assert_eq!(
            report.to_string(),
            "field title: conflict, current value is Fish"
        );
        assert_eq!(title(&table, id).as_deref(), Some("Fish"), "{}", strategy);
    }
}

/// Stored already equals desired: never a conflict.
#[test]
fn test_already_desired_commits() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table.insert(&[("title", Some("Cat"))]).unwrap();

        let outcome = merger(&table, strategy)
            .merge(id, &changes(&[("title", "Dog", "Cat")]))
            .unwrap();

        assert!(outcome.is_committed(), "{}", strategy);
        assert_eq!(title(&table, id).as_deref(), Some("Cat"));
    }
}

/// Only the changed field is written.
#[test]
fn test_unchanged_field_is_not_written() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table
            .insert(&[("title", Some("Dog")), ("description", Some("stored"))])
            .unwrap();

        // The client saw a different description but left it alone
        let submitted = changes(&[("title", "Dog", "Cat"), ("description", "seen", "seen")]);
        assert_eq!(submitted.names(), vec!["title"]);

        let outcome = merger(&table, strategy).merge(id, &submitted).unwrap();
        assert!(outcome.is_committed(), "{}", strategy);
        assert_eq!(title(&table, id).as_deref(), Some("Cat"));
        assert_eq!(description(&table, id).as_deref(), Some("stored"));
    }
}

/// Repeating a committed merge is a no-op success.
#[test]
fn test_repeated_merge_is_idempotent() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table.insert(&[("title", Some("Dog"))]).unwrap();
        let merger = merger(&table, strategy);
        let edit = changes(&[("title", "Dog", "Cat")]);

        assert!(merger.merge(id, &edit).unwrap().is_committed());
        assert!(merger.merge(id, &edit).unwrap().is_committed(), "{}", strategy);
        assert_eq!(title(&table, id).as_deref(), Some("Cat"));
    }
}

/// Two clients edit different parts of one text field.
#[test]
fn test_patch_strategy_merges_disjoint_text_edits() {
    let (_db, table) = issues_db();
    let id = table
        .insert(&[(
            "description",
            Some("Steps: open the form.\nExpected: it saves.\nActual: it crashes."),
        ), ("title", Some("Bug"))])
        .unwrap();
    let baseline = "Steps: open the form.\nExpected: it saves.\nActual: it crashes.";

    let first = merger(&table, MergeStrategy::Patch)
        .merge(
            id,
            &changes(&[(
                "description",
                baseline,
                "Steps: open the edit form.\nExpected: it saves.\nActual: it crashes.",
            )]),
        )
        .unwrap();
    assert!(first.is_committed());

    let second = merger(&table, MergeStrategy::Patch)
        .merge(
            id,
            &changes(&[(
                "description",
                baseline,
                "Steps: open the form.\nExpected: it saves.\nActual: it crashes on submit.",
            )]),
        )
        .unwrap();
    assert!(second.is_committed());
    assert_eq!(
        description(&table, id).as_deref(),
        Some("Steps: open the edit form.\nExpected: it saves.\nActual: it crashes on submit.")
    );
}

/// The same disjoint edits conflict under the equality strategy.
#[test]
fn test_equality_strategy_rejects_disjoint_text_edits() {
    let (_db, table) = issues_db();
    let id = table
        .insert(&[("title", Some("Bug")), ("description", Some("one two three"))])
        .unwrap();

    let merger = merger(&table, MergeStrategy::Equality);
    assert!(merger
        .merge(id, &changes(&[("description", "one two three", "ONE two three")]))
        .unwrap()
        .is_committed());

    let outcome = merger
        .merge(id, &changes(&[("description", "one two three", "one two THREE")]))
        .unwrap();
    assert_eq!(
        outcome.conflicts().unwrap().get("description"),
        Some("ONE two three")
    );
}

/// Blanking a required field is rejected and nothing is written.
#[test]
fn test_clearing_required_field_is_rejected() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table
            .insert(&[("title", Some("Dog")), ("description", Some("old"))])
            .unwrap();

        let err = merger(&table, strategy)
            .merge(
                id,
                &changes(&[("title", "Dog", ""), ("description", "old", "new")]),
            )
            .unwrap_err();

        assert!(err.is_validation(), "{}: {}", strategy, err);
        assert_eq!(title(&table, id).as_deref(), Some("Dog"), "{}", strategy);
        assert_eq!(description(&table, id).as_deref(), Some("old"), "{}", strategy);
    }
}
