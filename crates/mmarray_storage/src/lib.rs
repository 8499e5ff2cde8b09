//! # mmarray Storage
//!
//! Fixed-capacity integer buffers for mmarray.
//!
//! This crate provides the lowest-level storage abstraction for mmarray.
//! Buffers are **opaque arrays of `i32`** - they do not interpret
//! the values they hold.
//!
//! ## Design Principles
//!
//! - Buffers have a fixed capacity chosen at creation and never grow
//! - Values are stored as raw native-endian 32-bit integers, no header
//! - No knowledge of rows, segments or index records
//! - Must be `Send + Sync` so frozen buffers can serve concurrent readers
//!
//! ## Available Buffers
//!
//! - [`MappedIntBuffer`] - Memory-mapped file, the production buffer
//! - [`HeapIntBuffer`] - For testing and ephemeral arrays
//!
//! ## Example
//!
//! ```rust
//! use mmarray_storage::{HeapIntBuffer, IntBuffer};
//!
//! let mut buffer = HeapIntBuffer::new(8).unwrap();
//! buffer.write(2, &[7, -1, 42]).unwrap();
//! assert_eq!(buffer.read(2, 3).unwrap(), vec![7, -1, 42]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod error;
mod heap;
mod mapped;

pub use buffer::{IntBuffer, BYTES_PER_INT};
pub use error::{StorageError, StorageResult};
pub use heap::HeapIntBuffer;
pub use mapped::MappedIntBuffer;
