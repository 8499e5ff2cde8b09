//! # mmarray Core
//!
//! Disk-backed, append-only storage for variable-length `i32` rows.
//!
//! The full dataset can be far larger than one contiguous allocation, yet any
//! row is reachable by its dense row number in constant time. This crate
//! provides:
//! - Segment store: rows packed into fixed-capacity memory-mapped segments,
//!   rotated when full
//! - Row index: one mapped table of `{row, segment, offset, length}` records
//! - [`RowArray`]: the append/get facade tying the two together
//! - [`SharedRowArray`]: a lock-protected handle for one writer and many readers
//!
//! ## Example
//!
//! ```rust
//! use mmarray_core::{Config, RowArray, RowNumber};
//!
//! let mut array = RowArray::open_in_memory(Config::new(3).segment_ints(5)).unwrap();
//! array.append(&[1, 2]).unwrap();
//! array.append(&[3, 4, 5]).unwrap();
//! let row = array.append(&[6]).unwrap();
//!
//! assert_eq!(row, RowNumber::new(2));
//! assert_eq!(array.get(row).unwrap(), vec![6]);
//! assert_eq!(array.segment_count(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod array;
mod backing;
mod config;
pub mod dir;
mod error;
pub mod index;
pub mod segment;
mod shared;
mod stats;
mod types;

pub use array::{RowArray, Rows};
pub use config::{Config, DEFAULT_DIR_NAME, DEFAULT_SEGMENT_BYTES, RECORD_WIDTH};
pub use error::{CoreError, CoreResult};
pub use shared::SharedRowArray;
pub use stats::{ArrayStats, StatsSnapshot};
pub use types::{Placement, RowNumber, SegmentId};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
