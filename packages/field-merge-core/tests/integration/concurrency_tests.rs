//! Concurrent writers on one record.

use std::sync::{Arc, Barrier};
use std::thread;

use ntest::timeout;

use field_merge_core::{MergeOutcome, MergeStrategy};

use super::helpers::*;

/// Writers racing from the same baseline: exactly one commits.
#[test]
#[timeout(1000)]
fn test_one_of_many_racing_writers_commits() {
    for strategy in STRATEGIES {
        let (_db, table) = issues_db();
        let id = table.insert(&[("title", Some("start"))]).unwrap();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let merger = merger(&table, strategy);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let desired = format!("writer {}", n);
                    barrier.wait();
                    merger
                        .merge(id, &changes(&[("title", "start", desired.as_str())]))
                        .unwrap()
                })
            })
            .collect();

        let outcomes: Vec<MergeOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let committed = outcomes.iter().filter(|o| o.is_committed()).count();
        assert_eq!(committed, 1, "{}", strategy);

        let winner = title(&table, id).unwrap();
        for outcome in outcomes.iter().filter(|o| !o.is_committed()) {
            assert_eq!(outcome.conflicts().unwrap().get("title"), Some(winner.as_str()));
        }
    }
}

/// Writers touching different fields never conflict.
#[test]
#[timeout(1000)]
fn test_writers_on_different_fields_all_commit() {
    let (_db, table) = issues_db();
    let id = table
        .insert(&[("title", Some("t")), ("description", Some("d"))])
        .unwrap();

    let title_writer = {
        let merger = merger(&table, MergeStrategy::Equality);
        thread::spawn(move || {
            (0..50)
                .map(|i| {
                    let from = if i == 0 { "t".to_string() } else { format!("t{}", i - 1) };
                    let to = format!("t{}", i);
                    merger
                        .merge(id, &changes(&[("title", from.as_str(), to.as_str())]))
                        .unwrap()
                        .is_committed()
                })
                .all(|ok| ok)
        })
    };
    let description_writer = {
        let merger = merger(&table, MergeStrategy::Patch);
        thread::spawn(move || {
            (0..50)
                .map(|i| {
                    let from = if i == 0 { "d".to_string() } else { format!("d{}", i - 1) };
                    let to = format!("d{}", i);
                    merger
                        .merge(id, &changes(&[("description", from.as_str(), to.as_str())]))
                        .unwrap()
                        .is_committed()
                })
                .all(|ok| ok)
        })
    };

    assert!(title_writer.join().unwrap());
    assert!(description_writer.join().unwrap());
    assert_eq!(title(&table, id).as_deref(), Some("t49"));
    assert_eq!(description(&table, id).as_deref(), Some("d49"));
}
