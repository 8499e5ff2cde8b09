//! Segment store: packing, rotation and reads.

use crate::backing::Backing;
use crate::error::{CoreError, CoreResult};
use crate::segment::handle::{Segment, SegmentInfo};
use crate::stats::ArrayStats;
use crate::types::{Placement, SegmentId};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Owns every segment of an array and the cursor of the active one.
///
/// Segments live in an arena indexed by [`SegmentId`]; the store remembers
/// which entry is active instead of mutating a front collection. Frozen
/// segments stay mapped for reads until the store is dropped.
pub struct SegmentStore {
    /// Source of new segment buffers (holds the directory lock).
    backing: Backing,
    /// Integer slots per segment.
    segment_capacity: usize,
    /// Whether to msync segments on rotation.
    sync_on_rotate: bool,
    /// All segments ever created, by id.
    segments: Vec<Segment>,
    /// The segment receiving writes, if any.
    active: Option<SegmentId>,
    stats: Arc<ArrayStats>,
}

impl SegmentStore {
    /// Creates an empty store. The first segment is created by the first write.
    pub(crate) fn new(
        backing: Backing,
        segment_capacity: usize,
        sync_on_rotate: bool,
        stats: Arc<ArrayStats>,
    ) -> Self {
        Self {
            backing,
            segment_capacity,
            sync_on_rotate,
            segments: Vec::new(),
            active: None,
            stats,
        }
    }

    /// Writes a row payload and returns where it landed.
    ///
    /// If the active segment lacks room for the whole payload it is frozen
    /// and a fresh segment is created first. The check happens once, before
    /// any integer of the row is written, so a row is never split.
    ///
    /// # Errors
    ///
    /// Returns `RowTooLarge` if the payload exceeds the segment capacity, or
    /// a storage error if a segment cannot be created or written.
    pub fn write(&mut self, payload: &[i32]) -> CoreResult<Placement> {
        if payload.len() > self.segment_capacity {
            return Err(CoreError::RowTooLarge {
                len: payload.len(),
                max: self.segment_capacity,
            });
        }

        let fits = self
            .active
            .map(|id| self.segments[id.as_usize()].remaining() >= payload.len());
        let active = match (self.active, fits) {
            (Some(id), Some(true)) => id,
            _ => self.rotate()?,
        };

        let segment = &mut self.segments[active.as_usize()];
        let offset = segment.cursor;
        segment.buffer.write(offset, payload)?;
        segment.cursor += payload.len();

        // Config validation keeps both values within i32.
        Ok(Placement::new(active, offset as u32, payload.len() as u32))
    }

    /// Freezes the active segment (if any) and makes a new one active.
    fn rotate(&mut self) -> CoreResult<SegmentId> {
        if let Some(id) = self.active {
            let segment = &mut self.segments[id.as_usize()];
            if self.sync_on_rotate {
                segment.buffer.flush()?;
                self.stats.record_sync();
            }
            // Stays active if freezing fails, so no second writable segment appears.
            segment.buffer.freeze()?;
            self.active = None;
            self.stats.record_rotation();
            debug!(segment = %id, written = segment.cursor, "rotated segment out");
        }

        // Every segment holds at least one row, so ids stay below the row capacity.
        let id = SegmentId::new(self.segments.len() as u32);
        let buffer = self
            .backing
            .create_segment(id, self.segment_capacity, self.sync_on_rotate)?;
        self.segments.push(Segment::new(id, buffer));
        self.active = Some(id);
        debug!(segment = %id, capacity = self.segment_capacity, "created segment");

        Ok(id)
    }

    /// Reads `len` integers at `offset` of `segment` into a fresh vector.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSegment` if the segment does not exist, or
    /// `OutOfRange` if the window reaches past what was written.
    pub fn read(&self, segment: SegmentId, offset: usize, len: usize) -> CoreResult<Vec<i32>> {
        let mut out = Vec::new();
        self.read_into(segment, offset, len, &mut out)?;
        Ok(out)
    }

    /// Like [`SegmentStore::read`], reusing the allocation of `out`.
    ///
    /// `out` is cleared and resized to `len`.
    pub fn read_into(
        &self,
        segment: SegmentId,
        offset: usize,
        len: usize,
        out: &mut Vec<i32>,
    ) -> CoreResult<()> {
        let seg = self
            .segments
            .get(segment.as_usize())
            .ok_or(CoreError::InvalidSegment {
                segment: i64::from(segment.as_u32()),
            })?;

        match offset.checked_add(len) {
            Some(end) if end <= seg.cursor => {}
            _ => return Err(CoreError::out_of_range(segment, offset, len, seg.cursor)),
        }

        out.clear();
        out.resize(len, 0);
        seg.buffer.read_into(offset, out)?;
        Ok(())
    }

    /// Flushes the active segment.
    pub fn flush(&mut self) -> CoreResult<()> {
        if let Some(id) = self.active {
            self.segments[id.as_usize()].buffer.flush()?;
        }
        Ok(())
    }

    /// Flushes the active segment, then freezes every segment, releasing
    /// write mappings and file handles.
    ///
    /// Frozen segments stay readable. A later write starts a new segment.
    pub fn close(&mut self) -> CoreResult<()> {
        self.flush()?;
        self.active = None;
        for segment in &mut self.segments {
            segment.buffer.freeze()?;
        }
        Ok(())
    }

    /// Returns the number of segments created so far.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the segment currently receiving writes.
    #[must_use]
    pub fn active_segment(&self) -> Option<SegmentId> {
        self.active
    }

    /// Returns the integer slots per segment.
    #[must_use]
    pub fn segment_capacity(&self) -> usize {
        self.segment_capacity
    }

    /// Describes one segment.
    #[must_use]
    pub fn segment_info(&self, segment: SegmentId) -> Option<SegmentInfo> {
        self.segments.get(segment.as_usize()).map(Segment::info)
    }

    /// Describes every segment in id order.
    pub fn infos(&self) -> impl Iterator<Item = SegmentInfo> + '_ {
        self.segments.iter().map(Segment::info)
    }

    /// Returns the array directory, if file-backed.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.backing.path()
    }
}

impl std::fmt::Debug for SegmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentStore")
            .field("segment_capacity", &self.segment_capacity)
            .field("segment_count", &self.segments.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
