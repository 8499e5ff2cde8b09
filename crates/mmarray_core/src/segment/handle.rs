//! A single segment and its write cursor.

use crate::types::SegmentId;
use mmarray_storage::IntBuffer;
use std::fmt;

/// Write state of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    /// Receiving writes.
    Active,
    /// Rotated out; contents and cursor are final.
    Frozen,
}

/// Point-in-time description of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Segment identifier.
    pub id: SegmentId,
    /// Current write state.
    pub state: SegmentState,
    /// Integers written so far.
    pub written: usize,
    /// Integer slots in the segment.
    pub capacity: usize,
}

/// A segment buffer together with its write cursor.
pub(crate) struct Segment {
    pub(crate) id: SegmentId,
    pub(crate) buffer: Box<dyn IntBuffer>,
    /// Next free integer slot; also the count of integers written.
    pub(crate) cursor: usize,
}

impl Segment {
    pub(crate) fn new(id: SegmentId, buffer: Box<dyn IntBuffer>) -> Self {
        Self {
            id,
            buffer,
            cursor: 0,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buffer.capacity() - self.cursor
    }

    pub(crate) fn state(&self) -> SegmentState {
        if self.buffer.is_frozen() {
            SegmentState::Frozen
        } else {
            SegmentState::Active
        }
    }

    pub(crate) fn info(&self) -> SegmentInfo {
        SegmentInfo {
            id: self.id,
            state: self.state(),
            written: self.cursor,
            capacity: self.buffer.capacity(),
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
