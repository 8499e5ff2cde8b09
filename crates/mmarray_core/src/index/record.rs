//! Fixed-width index record.

use crate::config::RECORD_WIDTH;
use crate::error::{CoreError, CoreResult};
use crate::types::{Placement, RowNumber, SegmentId};

/// One index record exactly as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    /// Echo of the slot position.
    pub row: i32,
    /// Segment holding the payload.
    pub segment: i32,
    /// First integer of the payload within the segment.
    pub offset: i32,
    /// Payload length in integers.
    pub len: i32,
}

impl IndexRecord {
    /// Builds the record for `row` stored at `placement`.
    #[must_use]
    pub fn new(row: RowNumber, placement: Placement) -> Self {
        // Config validation bounds rows, segments and offsets by i32::MAX.
        Self {
            row: row.as_u32() as i32,
            segment: placement.segment.as_u32() as i32,
            offset: placement.offset as i32,
            len: placement.len as i32,
        }
    }

    /// Encodes the record into its four stored integers.
    #[must_use]
    pub fn encode(&self) -> [i32; RECORD_WIDTH] {
        [self.row, self.segment, self.offset, self.len]
    }

    /// Decodes a record from its four stored integers.
    #[must_use]
    pub fn decode(raw: [i32; RECORD_WIDTH]) -> Self {
        Self {
            row: raw[0],
            segment: raw[1],
            offset: raw[2],
            len: raw[3],
        }
    }

    /// Returns true if the record was written for `row`.
    #[must_use]
    pub fn belongs_to(&self, row: RowNumber) -> bool {
        i64::from(self.row) == i64::from(row.as_u32())
    }

    /// Converts the stored fields into a placement.
    ///
    /// # Errors
    ///
    /// A negative segment id yields `InvalidSegment`; a negative offset or
    /// length yields `OutOfRange`. Either means the index is corrupt.
    pub fn placement(&self) -> CoreResult<Placement> {
        let segment = u32::try_from(self.segment).map_err(|_| CoreError::InvalidSegment {
            segment: i64::from(self.segment),
        })?;
        let segment = SegmentId::new(segment);

        match (u32::try_from(self.offset), u32::try_from(self.len)) {
            (Ok(offset), Ok(len)) => Ok(Placement::new(segment, offset, len)),
            _ => Err(CoreError::OutOfRange {
                segment,
                offset: i64::from(self.offset),
                len: i64::from(self.len),
                written: 0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_matches_disk_order() {
        let record = IndexRecord::new(
            RowNumber::new(7),
            Placement::new(SegmentId::new(2), 40, 3),
        );
        assert_eq!(record.encode(), [7, 2, 40, 3]);
        assert_eq!(IndexRecord::decode([7, 2, 40, 3]), record);
    }

    #[test]
    fn belongs_to_checks_echo() {
        let record = IndexRecord::decode([5, 0, 0, 1]);
        assert!(record.belongs_to(RowNumber::new(5)));
        assert!(!record.belongs_to(RowNumber::new(0)));
    }

    #[test]
    fn negative_segment_is_invalid() {
        let record = IndexRecord::decode([0, -1, 0, 1]);
        assert!(matches!(
            record.placement(),
            Err(CoreError::InvalidSegment { segment: -1 })
        ));
    }

    #[test]
    fn negative_window_is_out_of_range() {
        let record = IndexRecord::decode([0, 1, 4, -2]);
        assert!(matches!(
            record.placement(),
            Err(CoreError::OutOfRange { offset: 4, len: -2, .. })
        ));
    }
}
