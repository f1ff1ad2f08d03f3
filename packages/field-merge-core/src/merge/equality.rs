//! Baseline-or-desired equality merge.
//!
//! Writes every changed field to its desired value in one conditional write
//! guarded by `current = baseline OR current = desired` per field. Stored
//! values are only read when the write misses.

use tracing::{debug, info, warn};

use super::classify::{classify_rows, conclude_missed, WriteResult};
use super::{ConflictReport, MergeOutcome};
use crate::change_set::ChangeSet;
use crate::error::MergeError;
use crate::gateway::{stored, StorageGateway};
use crate::write::{ConditionalWrite, ConditionalWriteBuilder};

/// Builds the guarded write for a change set.
pub fn build_write(record_id: u64, changes: &ChangeSet) -> ConditionalWrite {
    let mut builder = ConditionalWriteBuilder::new(record_id);
    for change in changes {
        builder
            .set(&change.name, change.desired())
            .require_any_of(&change.name, &[change.baseline(), change.desired()]);
    }
    builder.build()
}

pub(crate) fn merge<G>(
    gateway: &G,
    record_id: u64,
    changes: &ChangeSet,
) -> Result<MergeOutcome, MergeError>
where
    G: StorageGateway + ?Sized,
{
    let write = build_write(record_id, changes);
    let rows = gateway.execute_conditional_update(&write)?;

    match classify_rows(record_id, rows)? {
        WriteResult::Applied => {
            info!(record_id, fields = ?changes.names(), "Merge committed");
            Ok(MergeOutcome::Committed)
        }
        WriteResult::Missed => {
            let current = gateway.fetch_fields(record_id, &changes.names())?;

            let mut report = ConflictReport::new();
            for change in changes {
                let value = stored(&current, &change.name);
                if value == change.baseline() || value == change.desired() {
                    debug!(record_id, field = %change.name, "Field still mergeable");
                    continue;
                }
                report.push(&change.name, value);
            }

            if !report.is_empty() {
                warn!(record_id, fields = ?report.fields(), "Merge conflicted");
            }
            conclude_missed(record_id, report)
        }
    }
}
