//! In-memory integer buffer for testing.

use crate::buffer::{check_bounds, IntBuffer};
use crate::error::{StorageError, StorageResult};

/// An in-memory integer buffer.
///
/// This buffer keeps all values in a heap vector and is suitable for:
/// - Unit tests
/// - Ephemeral arrays that don't need a backing file
///
/// # Example
///
/// ```rust
/// use mmarray_storage::{HeapIntBuffer, IntBuffer};
///
/// let mut buffer = HeapIntBuffer::new(4).unwrap();
/// buffer.write(0, &[1, 2]).unwrap();
/// buffer.freeze().unwrap();
/// assert!(buffer.write(2, &[3]).is_err());
/// assert_eq!(buffer.read(0, 2).unwrap(), vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct HeapIntBuffer {
    data: Vec<i32>,
    frozen: bool,
}

impl HeapIntBuffer {
    /// Creates a zero-filled buffer with `capacity` integer slots.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> StorageResult<Self> {
        if capacity == 0 {
            return Err(StorageError::InvalidCapacity { capacity });
        }
        Ok(Self {
            data: vec![0; capacity],
            frozen: false,
        })
    }
}

impl IntBuffer for HeapIntBuffer {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read_into(&self, offset: usize, out: &mut [i32]) -> StorageResult<()> {
        check_bounds(offset, out.len(), self.data.len())?;
        out.copy_from_slice(&self.data[offset..offset + out.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[i32]) -> StorageResult<()> {
        if self.frozen {
            return Err(StorageError::ReadOnly);
        }
        check_bounds(offset, data.len(), self.data.len())?;
        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn freeze(&mut self) -> StorageResult<()> {
        self.frozen = true;
        Ok(())
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_zero_capacity_rejected() {
        assert!(matches!(
            HeapIntBuffer::new(0),
            Err(StorageError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn heap_unwritten_slots_are_zero() {
        let buffer = HeapIntBuffer::new(3).unwrap();
        assert_eq!(buffer.read(0, 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn heap_write_and_read() {
        let mut buffer = HeapIntBuffer::new(6).unwrap();
        buffer.write(1, &[10, 20, 30]).unwrap();
        assert_eq!(buffer.read(1, 3).unwrap(), vec![10, 20, 30]);
        assert_eq!(buffer.read(0, 1).unwrap(), vec![0]);
    }

    #[test]
    fn heap_write_past_end_fails() {
        let mut buffer = HeapIntBuffer::new(4).unwrap();
        let result = buffer.write(3, &[1, 2]);
        assert!(matches!(result, Err(StorageError::OutOfBounds { .. })));
    }

    #[test]
    fn heap_read_past_end_fails() {
        let buffer = HeapIntBuffer::new(4).unwrap();
        assert!(matches!(
            buffer.read(2, 3),
            Err(StorageError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn heap_empty_read() {
        let buffer = HeapIntBuffer::new(4).unwrap();
        assert!(buffer.read(4, 0).unwrap().is_empty());
    }

    #[test]
    fn heap_freeze_blocks_writes() {
        let mut buffer = HeapIntBuffer::new(4).unwrap();
        buffer.write(0, &[5]).unwrap();
        buffer.freeze().unwrap();
        buffer.freeze().unwrap();

        assert!(buffer.is_frozen());
        assert!(matches!(buffer.write(1, &[6]), Err(StorageError::ReadOnly)));
        assert_eq!(buffer.read(0, 1).unwrap(), vec![5]);
    }
}
