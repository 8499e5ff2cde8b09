//! Row index: row number to placement.
//!
//! The index is one mapped integer buffer sized once for the declared row
//! capacity. Row `n` owns the four integers at `n * 4`:
//!
//! ```text
//! | row_number (4) | segment_id (4) | offset (4) | length (4) |
//! ```
//!
//! All fields are native-endian `i32`. The `row_number` field echoes the
//! slot position and is checked on every lookup. The buffer never grows;
//! running out of slots is an error, not a trigger for reallocation.

mod record;
mod row_index;

pub use record::IndexRecord;
pub use row_index::RowIndex;
