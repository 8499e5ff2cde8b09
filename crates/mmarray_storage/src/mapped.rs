//! Memory-mapped integer buffer backed by a file.

use crate::buffer::{check_bounds, decode_ints, encode_ints, IntBuffer, BYTES_PER_INT};
use crate::error::{StorageError, StorageResult};
use memmap2::{Mmap, MmapMut};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// The current mapping of a [`MappedIntBuffer`].
#[derive(Debug)]
enum Mapping {
    /// Read-write mapping, the file handle is still open.
    Writable(MmapMut),
    /// Read-only mapping left after `freeze`.
    ReadOnly(Mmap),
    /// Remapping failed; nothing is mapped anymore.
    Released,
}

/// A file-backed integer buffer using a shared memory mapping.
///
/// The backing file is created (or truncated) and sized to exactly
/// `capacity * 4` bytes. Values are stored as raw native-endian integers with
/// no header, so the file can be inspected with any tool that reads `i32`s.
///
/// # Resource Lifetime
///
/// - While writable, the buffer owns both the file handle and a read-write
///   mapping.
/// - [`IntBuffer::freeze`] converts the mapping to read-only and closes the
///   file handle without an msync. Reads keep working and dirty pages are
///   still written back to the file.
/// - Dropping the buffer unmaps it. Nothing is left to a finalizer.
///
/// # Example
///
/// ```no_run
/// use mmarray_storage::{IntBuffer, MappedIntBuffer};
/// use std::path::Path;
///
/// let mut buffer = MappedIntBuffer::create(Path::new("ints.bin"), 1024).unwrap();
/// buffer.write(0, &[1, 2, 3]).unwrap();
/// buffer.freeze().unwrap();
/// assert_eq!(buffer.read(0, 3).unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct MappedIntBuffer {
    path: PathBuf,
    file: Option<File>,
    map: Mapping,
    capacity: usize,
}

impl MappedIntBuffer {
    /// Creates the backing file at `path` and maps `capacity` integers.
    ///
    /// An existing file at `path` is truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `capacity` is zero or its byte size overflows
    /// - The file cannot be created, sized or mapped
    pub fn create(path: &Path, capacity: usize) -> StorageResult<Self> {
        let byte_len = capacity
            .checked_mul(BYTES_PER_INT)
            .filter(|&len| len > 0)
            .ok_or(StorageError::InvalidCapacity { capacity })?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(byte_len as u64)?;

        let map = map_writable(&file)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            map: Mapping::Writable(map),
            capacity,
        })
    }

    /// Returns the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bytes(&self) -> StorageResult<&[u8]> {
        match &self.map {
            Mapping::Writable(map) => Ok(&map[..]),
            Mapping::ReadOnly(map) => Ok(&map[..]),
            Mapping::Released => Err(StorageError::Unmapped),
        }
    }
}

#[allow(unsafe_code)]
fn map_writable(file: &File) -> StorageResult<MmapMut> {
    // SAFETY: the file was just created and sized by us and is owned by the
    // buffer for as long as the mapping lives. Other processes are kept out
    // by the directory lock held one layer up.
    let map = unsafe { MmapMut::map_mut(file)? };
    Ok(map)
}

impl IntBuffer for MappedIntBuffer {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read_into(&self, offset: usize, out: &mut [i32]) -> StorageResult<()> {
        check_bounds(offset, out.len(), self.capacity)?;
        let start = offset * BYTES_PER_INT;
        let end = start + out.len() * BYTES_PER_INT;
        decode_ints(&self.bytes()?[start..end], out);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[i32]) -> StorageResult<()> {
        check_bounds(offset, data.len(), self.capacity)?;
        let Mapping::Writable(map) = &mut self.map else {
            return Err(StorageError::ReadOnly);
        };
        let start = offset * BYTES_PER_INT;
        let end = start + data.len() * BYTES_PER_INT;
        encode_ints(data, &mut map[start..end]);
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        if let Mapping::Writable(map) = &self.map {
            map.flush()?;
        }
        Ok(())
    }

    fn freeze(&mut self) -> StorageResult<()> {
        match std::mem::replace(&mut self.map, Mapping::Released) {
            Mapping::Writable(map) => {
                self.map = Mapping::ReadOnly(map.make_read_only()?);
            }
            other => self.map = other,
        }

        // The mapping stays valid without the descriptor.
        self.file = None;
        Ok(())
    }

    fn is_frozen(&self) -> bool {
        !matches!(self.map, Mapping::Writable(_))
    }
}
