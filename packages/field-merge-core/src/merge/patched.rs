//! Patch-and-reapply merge.
//!
//! Fetches the stored values, replays each field's baseline → desired patch
//! onto them and writes the results guarded by the values that were fetched.

use tracing::{debug, info, warn};

use super::classify::{classify_rows, conclude_missed, WriteResult};
use super::{ConflictReport, MergeOutcome};
use crate::change_set::{ChangeSet, FieldChange};
use crate::error::MergeError;
use crate::gateway::{stored, StorageGateway};
use crate::patch::{Patch, PatchEngine};
use crate::write::ConditionalWriteBuilder;

pub(crate) fn merge<G>(
    gateway: &G,
    engine: &PatchEngine,
    record_id: u64,
    changes: &ChangeSet,
) -> Result<MergeOutcome, MergeError>
where
    G: StorageGateway + ?Sized,
{
    let patches: Vec<(&FieldChange, Patch)> = changes
        .iter()
        .map(|change| (change, engine.make_patch(change.baseline(), change.desired())))
        .filter(|(_, patch)| !patch.is_empty())
        .collect();
    if patches.is_empty() {
        return Ok(MergeOutcome::Committed);
    }

    let names: Vec<&str> = patches.iter().map(|(c, _)| c.name.as_str()).collect();
    let current = gateway.fetch_fields(record_id, &names)?;

    let mut builder = ConditionalWriteBuilder::new(record_id);
    let mut report = ConflictReport::new();
    // (field, value the write is guarded on)
    let mut guarded: Vec<(&str, &str)> = Vec::new();

    for (change, patch) in &patches {
        let value = stored(&current, &change.name);
        if value == change.desired() {
            debug!(record_id, field = %change.name, "Field already holds desired value");
            continue;
        }

        let result = engine.apply_patch(patch, value)?;
        if result.is_clean() {
            debug!(record_id, field = %change.name, "Patch re-applied");
            builder
                .set(&change.name, result.text)
                .require_equal(&change.name, value);
            guarded.push((change.name.as_str(), value));
        } else {
            debug!(
                record_id,
                field = %change.name,
                applied = ?result.applied,
                patch = %patch,
                "Patch did not apply"
            );
            report.push(&change.name, value);
        }
    }

    if !report.is_empty() {
        warn!(record_id, fields = ?report.fields(), "Merge conflicted");
        return Ok(MergeOutcome::Conflict(report));
    }
    if builder.is_empty() {
        info!(record_id, "Merge committed, nothing to write");
        return Ok(MergeOutcome::Committed);
    }

    let write = builder.build();
    let rows = gateway.execute_conditional_update(&write)?;

    match classify_rows(record_id, rows)? {
        WriteResult::Applied => {
            info!(record_id, fields = ?write.columns(), "Merge committed");
            Ok(MergeOutcome::Committed)
        }
        WriteResult::Missed => {
            // Someone wrote between fetch and write; report what moved
            let fields: Vec<&str> = guarded.iter().map(|(field, _)| *field).collect();
            let now = gateway.fetch_fields(record_id, &fields)?;
            for (field, fetched) in &guarded {
                let value = stored(&now, field);
                if value != *fetched {
                    report.push(field, value);
                }
            }

            if !report.is_empty() {
                warn!(record_id, fields = ?report.fields(), "Merge lost a race");
            }
            conclude_missed(record_id, report)
        }
    }
}
