//! Field-level optimistic merge.
//!
//! A [`Merger`] turns a change set into one conditional write against its
//! storage gateway and classifies the outcome. It holds no per-request state
//! and can be shared freely between threads.

mod classify;
pub mod equality;
mod patched;
mod report;

pub use report::{ConflictReport, FieldConflict};

use tracing::debug;

use crate::change_set::ChangeSet;
use crate::config::{MergeConfig, MergeStrategy};
use crate::error::MergeError;
use crate::gateway::StorageGateway;
use crate::patch::PatchEngine;

/// Result of a merge that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every changed field was written, or nothing needed writing
    Committed,
    /// Nothing was written; the report lists the conflicting fields
    Conflict(ConflictReport),
}

impl MergeOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MergeOutcome::Committed)
    }

    /// Returns the conflict report, if any.
    pub fn conflicts(&self) -> Option<&ConflictReport> {
        match self {
            MergeOutcome::Conflict(report) => Some(report),
            MergeOutcome::Committed => None,
        }
    }
}

/// Merges change sets into records held by a storage gateway.
#[derive(Debug, Clone)]
pub struct Merger<G> {
    gateway: G,
    config: MergeConfig,
    engine: PatchEngine,
}

impl<G: StorageGateway> Merger<G> {
    /// Creates a merger.
    ///
    /// # Arguments
    /// * `gateway` - Storage the merge reads from and writes to
    /// * `config` - Strategy and patch tunables
    pub fn new(gateway: G, config: MergeConfig) -> Self {
        let engine = PatchEngine::new(config.patch.clone());
        Self {
            gateway,
            config,
            engine,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merges `changes` into record `record_id`.
    ///
    /// An empty change set commits without touching storage.
    ///
    /// # Returns
    /// `Ok(Committed)` or `Ok(Conflict(report))`; fatal invariant violations
    /// and storage failures come back as `Err`.
    pub fn merge(&self, record_id: u64, changes: &ChangeSet) -> Result<MergeOutcome, MergeError> {
        if changes.is_empty() {
            debug!(record_id, "Empty change set, nothing to merge");
            return Ok(MergeOutcome::Committed);
        }

        debug!(
            record_id,
            strategy = %self.config.strategy,
            fields = ?changes.names(),
            "Merging change set"
        );
        match self.config.strategy {
            MergeStrategy::Equality => equality::merge(&self.gateway, record_id, changes),
            MergeStrategy::Patch => {
                patched::merge(&self.gateway, &self.engine, record_id, changes)
            }
        }
    }
}
