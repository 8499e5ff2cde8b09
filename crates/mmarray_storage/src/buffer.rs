//! Integer buffer trait definition.

use crate::error::{StorageError, StorageResult};

/// Width of one stored integer in bytes.
pub const BYTES_PER_INT: usize = 4;

/// A fixed-capacity buffer of 32-bit signed integers.
///
/// Buffers are **opaque integer arrays**. They provide positional reads and
/// writes over a capacity fixed at creation. mmarray owns all layout
/// interpretation - buffers do not understand rows, segments or index records.
///
/// # Invariants
///
/// - `capacity` never changes after creation
/// - `read` returns exactly the values previously written at that offset
///   (slots never written read back as zero)
/// - after `freeze`, every `write` fails with [`StorageError::ReadOnly`]
///   while reads keep working
/// - Buffers must be `Send + Sync` for concurrent readers
///
/// # Implementors
///
/// - [`super::MappedIntBuffer`] - For file-backed storage
/// - [`super::HeapIntBuffer`] - For testing
pub trait IntBuffer: Send + Sync {
    /// Returns the number of integer slots in the buffer.
    fn capacity(&self) -> usize;

    /// Reads `len` integers starting at `offset` into a fresh vector.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::OutOfBounds`] if the range extends past the
    /// capacity.
    fn read(&self, offset: usize, len: usize) -> StorageResult<Vec<i32>> {
        let mut out = vec![0; len];
        self.read_into(offset, &mut out)?;
        Ok(out)
    }

    /// Fills `out` with the integers starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::OutOfBounds`] if the range extends past the
    /// capacity.
    fn read_into(&self, offset: usize, out: &mut [i32]) -> StorageResult<()>;

    /// Writes `data` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The range extends past the capacity
    /// - The buffer has been frozen
    fn write(&mut self, offset: usize, data: &[i32]) -> StorageResult<()>;

    /// Flushes written values to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Permanently drops write access.
    ///
    /// `freeze` does not flush. Values written before it stay readable and
    /// are written back by the OS in its own time; call [`IntBuffer::flush`]
    /// first when they must be durable now. Calling `freeze` on a frozen
    /// buffer is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the remapping fails.
    fn freeze(&mut self) -> StorageResult<()>;

    /// Returns true once [`IntBuffer::freeze`] has succeeded.
    fn is_frozen(&self) -> bool;
}

/// Validates that `offset..offset + len` lies within `capacity`.
pub(crate) fn check_bounds(offset: usize, len: usize, capacity: usize) -> StorageResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(StorageError::OutOfBounds {
            offset,
            len,
            capacity,
        }),
    }
}

/// Decodes native-endian integers from `bytes` into `out`.
pub(crate) fn decode_ints(bytes: &[u8], out: &mut [i32]) {
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(BYTES_PER_INT)) {
        *value = i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Encodes `data` as native-endian integers into `bytes`.
pub(crate) fn encode_ints(data: &[i32], bytes: &mut [u8]) {
    for (chunk, value) in bytes.chunks_exact_mut(BYTES_PER_INT).zip(data) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
}
