//! Error types for mmarray core.

use crate::types::{RowNumber, SegmentId};
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in mmarray core operations.
///
/// Every low-level fault is classified into one of these kinds and returned
/// to the caller. Nothing is logged and skipped.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage buffer error.
    #[error("storage error: {0}")]
    Storage(#[from] mmarray_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The row can never fit in a segment.
    #[error("row of {len} integers exceeds the segment capacity of {max} integers")]
    RowTooLarge {
        /// Length of the rejected row.
        len: usize,
        /// Integers per segment.
        max: usize,
    },

    /// An index record was appended out of sequence.
    ///
    /// This is a programming error inside the array, not a recoverable
    /// condition.
    #[error("out-of-order index append: expected {expected}, got {actual}")]
    OutOfOrderAppend {
        /// The next row number the index expected.
        expected: RowNumber,
        /// The row number that was supplied.
        actual: RowNumber,
    },

    /// The row has not been appended.
    #[error("unknown row: {row}")]
    UnknownRow {
        /// The requested row.
        row: RowNumber,
    },

    /// The row lies beyond the declared capacity of the index.
    #[error("{row} exceeds the index capacity of {capacity} rows")]
    IndexOutOfBounds {
        /// The requested row.
        row: RowNumber,
        /// Declared row capacity.
        capacity: u32,
    },

    /// Every slot of the index is in use.
    #[error("array is full: capacity of {capacity} rows reached")]
    CapacityExceeded {
        /// Declared row capacity.
        capacity: u32,
    },

    /// A placement references a segment that does not exist.
    #[error("invalid segment: {segment}")]
    InvalidSegment {
        /// The raw segment id from the placement.
        segment: i64,
    },

    /// A placement references integers that were never written.
    #[error("out of range read in {segment}: offset {offset}, len {len}, written {written}")]
    OutOfRange {
        /// The segment being read.
        segment: SegmentId,
        /// The raw offset from the placement.
        offset: i64,
        /// The raw length from the placement.
        len: i64,
        /// Integers written to the segment.
        written: usize,
    },

    /// Configuration rejected at open time.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Another handle has exclusive access to the array directory.
    #[error("array locked: another process has exclusive access")]
    ArrayLocked,
}

impl CoreError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an out of range error from in-range values.
    pub(crate) fn out_of_range(
        segment: SegmentId,
        offset: usize,
        len: usize,
        written: usize,
    ) -> Self {
        Self::OutOfRange {
            segment,
            offset: offset as i64,
            len: len as i64,
            written,
        }
    }
}
