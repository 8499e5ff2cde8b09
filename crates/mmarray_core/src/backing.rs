//! Buffer sources for segments and the row index.

use crate::dir::ArrayDir;
use crate::error::CoreResult;
use crate::types::SegmentId;
use mmarray_storage::{HeapIntBuffer, IntBuffer};
use std::path::Path;

/// Where an array obtains its buffers.
#[derive(Debug)]
pub(crate) enum Backing {
    /// Memory-mapped files in a locked directory.
    Directory(ArrayDir),
    /// Heap buffers; nothing touches the file system.
    Memory,
}

impl Backing {
    /// Creates the row index buffer.
    pub(crate) fn create_index(&self, len: usize) -> CoreResult<Box<dyn IntBuffer>> {
        match self {
            Self::Directory(dir) => Ok(Box::new(dir.create_index(len)?)),
            Self::Memory => Ok(Box::new(HeapIntBuffer::new(len)?)),
        }
    }

    /// Creates the buffer for a new segment.
    pub(crate) fn create_segment(
        &self,
        segment: SegmentId,
        capacity: usize,
        sync: bool,
    ) -> CoreResult<Box<dyn IntBuffer>> {
        match self {
            Self::Directory(dir) => Ok(Box::new(dir.create_segment(segment, capacity, sync)?)),
            Self::Memory => Ok(Box::new(HeapIntBuffer::new(capacity)?)),
        }
    }

    /// Returns the array directory, if file-backed.
    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Self::Directory(dir) => Some(dir.path()),
            Self::Memory => None,
        }
    }
}
