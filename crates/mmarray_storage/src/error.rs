//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to access slots beyond the buffer capacity.
    #[error("access beyond end of buffer: offset {offset}, len {len}, capacity {capacity}")]
    OutOfBounds {
        /// The requested offset, in integers.
        offset: usize,
        /// The requested length, in integers.
        len: usize,
        /// The buffer capacity, in integers.
        capacity: usize,
    },

    /// The buffer has been frozen and no longer accepts writes.
    #[error("buffer is read-only")]
    ReadOnly,

    /// The mapping was lost while switching it to read-only.
    #[error("buffer mapping has been released")]
    Unmapped,

    /// The requested capacity cannot be allocated.
    #[error("invalid buffer capacity: {capacity} integers")]
    InvalidCapacity {
        /// The rejected capacity, in integers.
        capacity: usize,
    },
}
