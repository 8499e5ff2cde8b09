//! Shared handle for interleaving one writer with many readers.

use crate::array::RowArray;
use crate::error::CoreResult;
use crate::stats::StatsSnapshot;
use crate::types::{Placement, RowNumber};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

/// A cloneable, thread-safe handle to a [`RowArray`].
///
/// Readers take a shared lock and never block each other. An append takes
/// the exclusive lock for the duration of that one append, so readers see
/// either all of a row or none of it. Any row number returned by
/// [`SharedRowArray::append`] is readable from every clone afterwards.
///
/// # Example
///
/// ```rust,ignore
/// let shared = SharedRowArray::new(RowArray::open_in_memory(Config::new(1_000))?);
///
/// let reader = shared.clone();
/// std::thread::spawn(move || reader.get(RowNumber::new(0)));
///
/// shared.append(&[1, 2, 3])?;
/// ```
#[derive(Debug, Clone)]
pub struct SharedRowArray {
    inner: Arc<RwLock<RowArray>>,
}

impl SharedRowArray {
    /// Wraps an array for shared use.
    #[must_use]
    pub fn new(array: RowArray) -> Self {
        Self {
            inner: Arc::new(RwLock::new(array)),
        }
    }

    /// Appends a row under the write lock.
    pub fn append(&self, row: &[i32]) -> CoreResult<RowNumber> {
        self.inner.write().append(row)
    }

    /// Reads a row under a read lock.
    pub fn get(&self, row: RowNumber) -> CoreResult<Vec<i32>> {
        self.inner.read().get(row)
    }

    /// Reads a row into `out` under a read lock.
    pub fn get_into(&self, row: RowNumber, out: &mut Vec<i32>) -> CoreResult<()> {
        self.inner.read().get_into(row, out)
    }

    /// Returns where the payload of `row` is stored.
    pub fn placement(&self, row: RowNumber) -> CoreResult<Placement> {
        self.inner.read().placement(row)
    }

    /// Returns the number of rows appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if no row has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns a snapshot of the array statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats()
    }

    /// Holds the read lock for a batch of lookups.
    pub fn read(&self) -> RwLockReadGuard<'_, RowArray> {
        self.inner.read()
    }

    /// Returns the array if this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns the handle itself while other clones are alive.
    pub fn try_into_inner(self) -> Result<RowArray, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner())
            .map_err(|inner| Self { inner })
    }
}

impl From<RowArray> for SharedRowArray {
    fn from(array: RowArray) -> Self {
        Self::new(array)
    }
}
