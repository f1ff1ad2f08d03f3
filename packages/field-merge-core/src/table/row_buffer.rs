//! Copy-on-write row storage using ArcSwap.
//!
//! Readers take an `Arc` snapshot and never block. Writers clone the
//! snapshot, modify the clone and publish it with compare-and-swap, so a
//! writer that raced another one re-evaluates against the newer rows.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::record::Record;
use crate::error::MergeError;

/// Rows keyed by record identity.
pub type Rows = BTreeMap<u64, Record>;

/// Atomic row snapshot holder.
#[derive(Debug)]
pub struct RowBuffer {
    inner: ArcSwap<Rows>,
}

impl RowBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Rows::new()),
        }
    }

    /// Loads the current snapshot.
    ///
    /// The snapshot stays valid and unchanged while the `Arc` is held.
    pub fn load(&self) -> Arc<Rows> {
        self.inner.load_full()
    }

    /// Returns the number of stored rows.
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    /// Computes and publishes a successor snapshot.
    ///
    /// `f` receives the current rows and returns the replacement (or `None`
    /// to leave the rows untouched) together with a result value. If another
    /// writer publishes first, `f` runs again on the newer rows; it must
    /// therefore be free of side effects.
    ///
    /// # Arguments
    /// * `f` - Successor function
    ///
    /// # Returns
    /// `Result<R, MergeError>` with the value returned by the successful run.
    pub fn update<F, R>(&self, mut f: F) -> Result<R, MergeError>
    where
        F: FnMut(&Rows) -> Result<(Option<Rows>, R), MergeError>,
    {
        loop {
            let current = self.inner.load_full();
            let (next, out) = f(&*current)?;
            let Some(next) = next else {
                return Ok(out);
            };

            // Publish only if nobody swapped in between
            let previous = self.inner.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                return Ok(out);
            }
            tracing::trace!("Row snapshot changed during write, retrying");
        }
    }
}

impl Default for RowBuffer {
    fn default() -> Self {
        Self::new()
    }
}
