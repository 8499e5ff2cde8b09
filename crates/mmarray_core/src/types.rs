//! Core type definitions for mmarray.

use std::fmt;

/// Dense, zero-based number of an appended row.
///
/// Row numbers are assigned in insertion order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowNumber(pub u32);

impl RowNumber {
    /// Creates a new row number.
    #[must_use]
    pub const fn new(row: u32) -> Self {
        Self(row)
    }

    /// Returns the raw row value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the row value as a slice index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the next row number.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RowNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row:{}", self.0)
    }
}

/// Identifier for a segment.
///
/// Segment IDs start at zero and increase by one per rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub u32);

impl SegmentId {
    /// Creates a new segment ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the ID as an arena index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the next segment ID.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg:{}", self.0)
    }
}

/// Location of a row payload: segment, starting offset and length,
/// both counted in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Segment holding the payload.
    pub segment: SegmentId,
    /// First integer slot of the payload.
    pub offset: u32,
    /// Number of integers in the payload.
    pub len: u32,
}

impl Placement {
    /// Creates a new placement.
    #[must_use]
    pub const fn new(segment: SegmentId, offset: u32, len: u32) -> Self {
        Self {
            segment,
            offset,
            len,
        }
    }

    /// Returns the slot just past the payload.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.segment, self.offset, self.end())
    }
}
