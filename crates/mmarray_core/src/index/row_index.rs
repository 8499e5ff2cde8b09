//! The row index buffer.

use crate::config::RECORD_WIDTH;
use crate::error::{CoreError, CoreResult};
use crate::index::record::IndexRecord;
use crate::types::{Placement, RowNumber};
use mmarray_storage::IntBuffer;

/// Append-only table of index records, one per row.
///
/// Records are written in strictly increasing row order. The buffer is
/// sized for the declared capacity at construction and never resized.
pub struct RowIndex {
    buffer: Box<dyn IntBuffer>,
    /// Declared row capacity.
    capacity: u32,
    /// Records appended so far.
    len: u32,
}

impl RowIndex {
    /// Wraps a buffer of at least `capacity * 4` integers.
    pub(crate) fn new(buffer: Box<dyn IntBuffer>, capacity: u32) -> CoreResult<Self> {
        let needed = capacity as usize * RECORD_WIDTH;
        if buffer.capacity() < needed {
            return Err(CoreError::invalid_config(format!(
                "index buffer holds {} integers, {needed} required",
                buffer.capacity()
            )));
        }
        Ok(Self {
            buffer,
            capacity,
            len: 0,
        })
    }

    /// Appends the record for `row`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfOrderAppend` unless `row` equals the number of records
    /// already appended, and `CapacityExceeded` once every slot is used.
    pub fn append(&mut self, row: RowNumber, placement: Placement) -> CoreResult<()> {
        if row.as_u32() != self.len {
            return Err(CoreError::OutOfOrderAppend {
                expected: RowNumber::new(self.len),
                actual: row,
            });
        }
        if self.is_full() {
            return Err(CoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let record = IndexRecord::new(row, placement);
        self.buffer
            .write(row.as_usize() * RECORD_WIDTH, &record.encode())?;
        self.len += 1;
        Ok(())
    }

    /// Resolves `row` to the placement of its payload.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfBounds` if `row` is at or beyond the declared capacity
    /// - `UnknownRow` if `row` has not been appended, or its slot does not
    ///   echo the row number
    /// - `InvalidSegment` / `OutOfRange` if the stored fields are negative
    pub fn resolve(&self, row: RowNumber) -> CoreResult<Placement> {
        let record = self.record(row)?;
        if !record.belongs_to(row) {
            return Err(CoreError::UnknownRow { row });
        }
        record.placement()
    }

    /// Reads the raw record stored for `row`.
    ///
    /// # Errors
    ///
    /// Same bounds checks as [`RowIndex::resolve`], without the echo check.
    pub fn record(&self, row: RowNumber) -> CoreResult<IndexRecord> {
        if row.as_u32() >= self.capacity {
            return Err(CoreError::IndexOutOfBounds {
                row,
                capacity: self.capacity,
            });
        }
        if row.as_u32() >= self.len {
            return Err(CoreError::UnknownRow { row });
        }

        let mut raw = [0i32; RECORD_WIDTH];
        self.buffer
            .read_into(row.as_usize() * RECORD_WIDTH, &mut raw)?;
        Ok(IndexRecord::decode(raw))
    }

    /// Returns the number of records appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true if no record has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the declared row capacity.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns true once every slot is in use.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Flushes appended records to durable storage.
    pub fn flush(&mut self) -> CoreResult<()> {
        Ok(self.buffer.flush()?)
    }

    /// Drops write access to the index buffer. Does not flush.
    pub fn freeze(&mut self) -> CoreResult<()> {
        Ok(self.buffer.freeze()?)
    }
}

impl std::fmt::Debug for RowIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowIndex")
            .field("capacity", &self.capacity)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
