//! Array statistics.
//!
//! Counters are updated on the hot path with relaxed atomics so reads through
//! a shared `&RowArray` can record themselves without a lock.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut array = RowArray::open_in_memory(Config::new(100))?;
//! array.append(&[1, 2, 3])?;
//!
//! let stats = array.stats();
//! println!("Appends: {}", stats.appends);
//! println!("Rotations: {}", stats.rotations);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Array statistics and metrics.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct ArrayStats {
    /// Rows appended successfully.
    appends: AtomicU64,
    /// Rows read successfully.
    reads: AtomicU64,
    /// Integers written to segments.
    ints_written: AtomicU64,
    /// Integers copied out of segments.
    ints_read: AtomicU64,
    /// Segments rotated out.
    rotations: AtomicU64,
    /// Segments msynced on rotation.
    syncs: AtomicU64,
    /// Rows rejected as too large.
    rejected: AtomicU64,
    /// Failed operations of any kind.
    errors: AtomicU64,
}

impl ArrayStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_append(&self, ints: u64) {
        self.appends.fetch_add(1, Ordering::Relaxed);
        self.ints_written.fetch_add(ints, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self, ints: u64) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.ints_read.fetch_add(ints, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sync(&self) {
        self.syncs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of rows appended.
    pub fn appends(&self) -> u64 {
        self.appends.load(Ordering::Relaxed)
    }

    /// Returns the number of rows read.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of segment rotations.
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    /// Returns the number of failed operations.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            appends: self.appends(),
            reads: self.reads(),
            ints_written: self.ints_written.load(Ordering::Relaxed),
            ints_read: self.ints_read.load(Ordering::Relaxed),
            rotations: self.rotations(),
            syncs: self.syncs.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            errors: self.errors(),
        }
    }
}

/// A point-in-time snapshot of array statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Rows appended successfully.
    pub appends: u64,
    /// Rows read successfully.
    pub reads: u64,
    /// Integers written to segments.
    pub ints_written: u64,
    /// Integers copied out of segments.
    pub ints_read: u64,
    /// Segments rotated out.
    pub rotations: u64,
    /// Segments msynced on rotation.
    pub syncs: u64,
    /// Rows rejected as too large.
    pub rejected: u64,
    /// Failed operations of any kind.
    pub errors: u64,
}
