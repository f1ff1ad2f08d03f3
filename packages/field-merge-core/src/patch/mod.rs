//! Text patch engine.
//!
//! Thin adapter over `dmp`, a port of diff-match-patch. Patches are made
//! and applied by the library; this module only maps [`PatchConfig`] onto
//! its match settings and wraps its patch type.

mod hunk;

pub use hunk::{Hunk, Patch, PatchResult};

use dmp::Dmp;

use crate::config::PatchConfig;
use crate::error::MergeError;

/// Builds and applies field-scoped text patches.
///
/// Tunables are fixed at construction; every call works on its own
/// matcher instance, so a shared engine is safe to use from many threads.
#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    config: PatchConfig,
}

impl PatchEngine {
    /// Creates an engine with the given tunables.
    pub fn new(config: PatchConfig) -> Self {
        Self { config }
    }

    /// Returns the engine's tunables.
    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    fn matcher(&self) -> Dmp {
        Dmp {
            match_threshold: self.config.match_threshold,
            match_distance: saturating_i32(self.config.match_distance),
            patch_margin: saturating_i32(self.config.patch_margin),
            ..Dmp::default()
        }
    }

    /// Computes the patch turning `baseline` into `desired`.
    ///
    /// # Returns
    /// An empty patch when the two texts are equal.
    pub fn make_patch(&self, baseline: &str, desired: &str) -> Patch {
        if baseline == desired {
            return Patch::default();
        }
        let hunks = self
            .matcher()
            .patch_make1(baseline, desired)
            .into_iter()
            .map(Hunk::from)
            .collect();
        Patch { hunks }
    }

    /// Applies `patch` to `target`.
    ///
    /// Each hunk is located near where the previous hunks predict it; a hunk
    /// that cannot be located within the match threshold is skipped and
    /// flagged as failed.
    ///
    /// # Returns
    /// `Result<PatchResult, MergeError>` with the patched text and per-hunk
    /// success flags; `MergeError::Patch` if the library rejects the patch.
    pub fn apply_patch(&self, patch: &Patch, target: &str) -> Result<PatchResult, MergeError> {
        if patch.is_empty() {
            return Ok(PatchResult {
                text: target.to_string(),
                applied: Vec::new(),
            });
        }

        let patches: Vec<dmp::Patch> = patch.hunks.iter().map(|h| h.inner.clone()).collect();
        let (text, applied) = self
            .matcher()
            .patch_apply(&patches, target)
            .map_err(|e| MergeError::Patch(format!("{:?}", e)))?;

        Ok(PatchResult {
            text: text.into_iter().collect(),
            applied,
        })
    }
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
