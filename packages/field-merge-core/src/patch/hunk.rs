//! Patch and hunk definitions.

use std::fmt;

/// One contiguous edit with its surrounding context.
///
/// Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Hunk {
    pub(crate) inner: dmp::Patch,
}

impl Hunk {
    /// Offset of the hunk within the baseline text.
    pub fn old_start(&self) -> usize {
        usize::try_from(self.inner.start1).unwrap_or(0)
    }

    /// Offset of the hunk within the desired text.
    pub fn new_start(&self) -> usize {
        usize::try_from(self.inner.start2).unwrap_or(0)
    }

    /// Context plus replaced text, as found in the baseline.
    pub fn before(&self) -> String {
        self.collect(|operation| operation <= 0)
    }

    /// Context plus replacement text, as it should read afterwards.
    pub fn after(&self) -> String {
        self.collect(|operation| operation >= 0)
    }

    // Operations: -1 delete, 0 equal, 1 insert
    fn collect(&self, keep: impl Fn(i32) -> bool) -> String {
        self.inner
            .diffs
            .iter()
            .filter(|diff| keep(diff.operation))
            .map(|diff| diff.text.as_str())
            .collect()
    }
}

impl From<dmp::Patch> for Hunk {
    fn from(inner: dmp::Patch) -> Self {
        Self { inner }
    }
}

/// Ordered list of hunks turning one text into another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patch {
    pub(crate) hunks: Vec<Hunk>,
}

impl Patch {
    /// Returns the hunks in application order.
    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Returns the number of hunks.
    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }
}

/// Unified-diff-like form: an `@@ -start,len +start,len @@` header per hunk
/// followed by its context, deleted and inserted lines.
impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hunk in &self.hunks {
            write!(f, "{}", hunk.inner)?;
        }
        Ok(())
    }
}

/// Result of applying a patch to a target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// Patched text
    pub text: String,
    /// Per-hunk success, in application order. Hunks longer than the
    /// matcher's pattern limit are split first and reported per piece.
    pub applied: Vec<bool>,
}

impl PatchResult {
    /// Returns `true` if every hunk applied.
    pub fn is_clean(&self) -> bool {
        self.applied.iter().all(|ok| *ok)
    }
}
