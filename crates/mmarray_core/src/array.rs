//! Array facade: append and get.

use crate::backing::Backing;
use crate::config::Config;
use crate::dir::ArrayDir;
use crate::error::{CoreError, CoreResult};
use crate::index::RowIndex;
use crate::segment::SegmentStore;
use crate::stats::{ArrayStats, StatsSnapshot};
use crate::types::{Placement, RowNumber};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// An append-only array of variable-length `i32` rows.
///
/// Row payloads are packed into fixed-capacity memory-mapped segments; a
/// mapped index records where each row lives. Rows are addressed by the
/// dense [`RowNumber`] returned from [`RowArray::append`].
///
/// # Opening an Array
///
/// ```rust,ignore
/// use mmarray_core::{Config, RowArray};
///
/// let config = Config::new(10_000_000).base_dir("/var/lib/rows");
/// let mut array = RowArray::open(config)?;
///
/// let row = array.append(&[4, 8, 15, 16, 23, 42])?;
/// assert_eq!(array.get(row)?, vec![4, 8, 15, 16, 23, 42]);
///
/// array.close()?;
/// ```
///
/// # Concurrency
///
/// `append` takes `&mut self`: there is exactly one writer. `get` takes
/// `&self` and the array is `Sync`, so once appends are done any number of
/// threads can read through a shared reference. [`crate::SharedRowArray`]
/// lets readers and a writer interleave.
///
/// # Commit Is Not Atomic
///
/// An append writes the payload to a segment first and the index record
/// second. If the second step fails the payload stays in the segment but no
/// row number reaches it. Nothing rolls the segment cursor back.
pub struct RowArray {
    config: Config,
    /// Row index. Declared before `segments` so it is unmapped first.
    index: RowIndex,
    /// Segment store (holds the directory lock).
    segments: SegmentStore,
    /// Row number the next append receives.
    next_row: RowNumber,
    stats: Arc<ArrayStats>,
}

impl RowArray {
    /// Opens a new file-backed array.
    ///
    /// Creates `<base_dir>/mappedIntBuffer`, locks it and maps a fresh row
    /// index sized for `config.capacity` rows. Existing files in the
    /// directory are overwritten as segments are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid (`InvalidConfig`)
    /// - Another handle has the directory locked (`ArrayLocked`)
    /// - The index file cannot be created or mapped
    pub fn open(config: Config) -> CoreResult<Self> {
        config.validate()?;
        let dir = ArrayDir::open(&config)?;
        Self::open_with_backing(config, Backing::Directory(dir))
    }

    /// Opens an array whose buffers live on the heap.
    ///
    /// Behaves exactly like a file-backed array but touches no files.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration is invalid.
    pub fn open_in_memory(config: Config) -> CoreResult<Self> {
        config.validate()?;
        Self::open_with_backing(config, Backing::Memory)
    }

    fn open_with_backing(config: Config, backing: Backing) -> CoreResult<Self> {
        let index_buffer = backing.create_index(config.index_len())?;
        let index = RowIndex::new(index_buffer, config.capacity)?;

        let stats = Arc::new(ArrayStats::new());
        let segments = SegmentStore::new(
            backing,
            config.segment_capacity(),
            config.sync_on_rotate,
            Arc::clone(&stats),
        );

        info!(
            capacity = config.capacity,
            segment_bytes = config.segment_bytes,
            path = ?segments.path(),
            "opened row array"
        );

        Ok(Self {
            config,
            index,
            segments,
            next_row: RowNumber::new(0),
            stats,
        })
    }

    /// Appends a row and returns its row number.
    ///
    /// # Errors
    ///
    /// - `RowTooLarge` if the row can never fit in a segment
    /// - `CapacityExceeded` if the declared row capacity is used up
    /// - storage errors from creating or writing a segment
    ///
    /// On any error the row counter is unchanged and no existing row is
    /// affected.
    pub fn append(&mut self, row: &[i32]) -> CoreResult<RowNumber> {
        let max = self.segments.segment_capacity();
        if row.len() > max {
            self.stats.record_rejected();
            warn!(len = row.len(), max, "row too large for a segment");
            return Err(CoreError::RowTooLarge {
                len: row.len(),
                max,
            });
        }
        if self.index.is_full() {
            return self.fail(CoreError::CapacityExceeded {
                capacity: self.index.capacity(),
            });
        }

        let row_number = self.next_row;
        let placement = match self.segments.write(row) {
            Ok(placement) => placement,
            Err(err) => return self.fail(err),
        };

        // Past this point a failure orphans the payload written above.
        if let Err(err) = self.index.append(row_number, placement) {
            return self.fail(err);
        }

        self.next_row = row_number.next();
        self.stats.record_append(row.len() as u64);
        Ok(row_number)
    }

    /// Returns a copy of the row stored under `row`.
    ///
    /// # Errors
    ///
    /// - `UnknownRow` / `IndexOutOfBounds` from the index
    /// - `InvalidSegment` / `OutOfRange` if the placement is inconsistent
    pub fn get(&self, row: RowNumber) -> CoreResult<Vec<i32>> {
        let mut out = Vec::new();
        self.get_into(row, &mut out)?;
        Ok(out)
    }

    /// Like [`RowArray::get`], reusing the allocation of `out`.
    pub fn get_into(&self, row: RowNumber, out: &mut Vec<i32>) -> CoreResult<()> {
        let result = self.index.resolve(row).and_then(|placement| {
            self.segments.read_into(
                placement.segment,
                placement.offset as usize,
                placement.len as usize,
                out,
            )
        });

        match result {
            Ok(()) => {
                self.stats.record_read(out.len() as u64);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Returns where the payload of `row` is stored.
    ///
    /// # Errors
    ///
    /// Same as [`RowIndex::resolve`].
    pub fn placement(&self, row: RowNumber) -> CoreResult<Placement> {
        self.index.resolve(row)
    }

    /// Iterates over every row in append order.
    pub fn iter(&self) -> Rows<'_> {
        Rows {
            array: self,
            next: 0,
        }
    }

    /// Returns the number of rows appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.next_row.as_usize()
    }

    /// Returns true if no row has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the declared row capacity.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.config.capacity
    }

    /// Returns the number of segments created so far.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.segment_count()
    }

    /// Returns the segment store.
    #[must_use]
    pub fn segments(&self) -> &SegmentStore {
        &self.segments
    }

    /// Returns the row index.
    #[must_use]
    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    /// Returns the configuration the array was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the array directory, or `None` for in-memory arrays.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.segments.path()
    }

    /// Returns a snapshot of the array statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Flushes the active segment and the index to durable storage.
    pub fn flush(&mut self) -> CoreResult<()> {
        self.segments.flush()?;
        self.index.flush()
    }

    /// Flushes, releases every write mapping and file handle, then drops
    /// the array and its directory lock.
    ///
    /// Dropping the array without calling `close` still unmaps everything;
    /// `close` additionally reports flush errors.
    pub fn close(mut self) -> CoreResult<()> {
        self.segments.close()?;
        self.index.flush()?;
        self.index.freeze()?;
        info!(
            rows = self.len(),
            segments = self.segment_count(),
            "closed row array"
        );
        Ok(())
    }

    fn fail<T>(&self, err: CoreError) -> CoreResult<T> {
        self.stats.record_error();
        Err(err)
    }
}

impl std::fmt::Debug for RowArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowArray")
            .field("capacity", &self.config.capacity)
            .field("len", &self.len())
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

/// Iterator over the rows of a [`RowArray`], see [`RowArray::iter`].
#[derive(Debug)]
pub struct Rows<'a> {
    array: &'a RowArray,
    next: u32,
}

impl Iterator for Rows<'_> {
    type Item = CoreResult<Vec<i32>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next as usize >= self.array.len() {
            return None;
        }
        let row = RowNumber::new(self.next);
        self.next += 1;
        Some(self.array.get(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len().saturating_sub(self.next as usize);
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a RowArray {
    type Item = CoreResult<Vec<i32>>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentState;
    use crate::types::SegmentId;
    use tempfile::tempdir;

    fn small_array(capacity: u32, segment_ints: u64) -> RowArray {
        RowArray::open_in_memory(Config::new(capacity).segment_ints(segment_ints)).unwrap()
    }

    #[test]
    fn concrete_rotation_scenario() {
        let mut array = small_array(3, 5);

        assert_eq!(array.append(&[1, 2]).unwrap(), RowNumber::new(0));
        assert_eq!(array.append(&[3, 4, 5]).unwrap(), RowNumber::new(1));
        assert_eq!(array.append(&[6]).unwrap(), RowNumber::new(2));

        let p0 = array.placement(RowNumber::new(0)).unwrap();
        let p1 = array.placement(RowNumber::new(1)).unwrap();
        let p2 = array.placement(RowNumber::new(2)).unwrap();
        assert_eq!(p0, Placement::new(SegmentId::new(0), 0, 2));
        assert_eq!(p1, Placement::new(SegmentId::new(0), 2, 3));
        assert_eq!(p2, Placement::new(SegmentId::new(1), 0, 1));

        assert_eq!(array.get(RowNumber::new(0)).unwrap(), vec![1, 2]);
        assert_eq!(array.get(RowNumber::new(1)).unwrap(), vec![3, 4, 5]);
        assert_eq!(array.get(RowNumber::new(2)).unwrap(), vec![6]);
        assert_eq!(array.segment_count(), 2);
    }

    #[test]
    fn zero_length_rows_round_trip() {
        let mut array = small_array(4, 4);

        let empty = array.append(&[]).unwrap();
        let full = array.append(&[1, 2, 3, 4]).unwrap();
        let empty_again = array.append(&[]).unwrap();

        assert!(array.get(empty).unwrap().is_empty());
        assert_eq!(array.get(full).unwrap(), vec![1, 2, 3, 4]);
        assert!(array.get(empty_again).unwrap().is_empty());
    }

    #[test]
    fn row_of_exactly_segment_capacity_is_accepted() {
        let mut array = small_array(2, 3);
        let row = array.append(&[7, 8, 9]).unwrap();
        assert_eq!(array.get(row).unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn oversized_row_rejected_without_state_change() {
        let mut array = small_array(3, 3);
        array.append(&[1]).unwrap();

        let result = array.append(&[1, 2, 3, 4]);
        assert!(matches!(
            result,
            Err(CoreError::RowTooLarge { len: 4, max: 3 })
        ));

        assert_eq!(array.len(), 1);
        assert_eq!(array.index().len(), 1);
        assert_eq!(array.stats().rejected, 1);

        // Next append still gets the next dense row number.
        assert_eq!(array.append(&[2]).unwrap(), RowNumber::new(1));
    }

    #[test]
    fn capacity_ceiling_enforced() {
        let mut array = small_array(2, 4);
        array.append(&[1, 2]).unwrap();
        array.append(&[3]).unwrap();

        let result = array.append(&[4]);
        assert!(matches!(result, Err(CoreError::CapacityExceeded { capacity: 2 })));

        // Nothing was written for the failed row.
        let info = array.segments().segment_info(SegmentId::new(0)).unwrap();
        assert_eq!(info.written, 3);
        assert_eq!(array.get(RowNumber::new(0)).unwrap(), vec![1, 2]);
        assert_eq!(array.get(RowNumber::new(1)).unwrap(), vec![3]);
    }

    #[test]
    fn lookups_beyond_appended_rows_fail() {
        let mut array = small_array(4, 8);
        array.append(&[1]).unwrap();
        array.append(&[2]).unwrap();

        assert!(matches!(
            array.get(RowNumber::new(2)),
            Err(CoreError::UnknownRow { .. })
        ));
        assert!(matches!(
            array.get(RowNumber::new(4)),
            Err(CoreError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            array.get(RowNumber::new(u32::MAX)),
            Err(CoreError::IndexOutOfBounds { .. })
        ));
        assert_eq!(array.stats().errors, 3);
    }

    #[test]
    fn get_on_empty_array_is_unknown() {
        let array = small_array(4, 8);
        assert!(matches!(
            array.get(RowNumber::new(0)),
            Err(CoreError::UnknownRow { .. })
        ));
    }

    #[test]
    fn index_failure_orphans_payload() {
        let mut array = small_array(4, 8);
        array.append(&[1, 2]).unwrap();

        // Drive the two halves of an append by hand with a wrong row number.
        let placement = array.segments.write(&[3, 4, 5]).unwrap();
        let result = array.index.append(RowNumber::new(5), placement);
        assert!(matches!(result, Err(CoreError::OutOfOrderAppend { .. })));

        // The payload occupies segment space but no row reaches it.
        let info = array.segments().segment_info(SegmentId::new(0)).unwrap();
        assert_eq!(info.written, 5);
        assert_eq!(array.len(), 1);
        assert!(array.get(RowNumber::new(1)).is_err());

        // The next append lands after the orphan.
        let row = array.append(&[6]).unwrap();
        assert_eq!(row, RowNumber::new(1));
        assert_eq!(array.placement(row).unwrap().offset, 5);
    }

    #[test]
    fn iter_yields_rows_in_order() {
        let mut array = small_array(5, 3);
        let rows: Vec<Vec<i32>> = vec![vec![1], vec![], vec![2, 3, 4], vec![5, 6]];
        for row in &rows {
            array.append(row).unwrap();
        }

        let read: Vec<Vec<i32>> = array.iter().collect::<CoreResult<_>>().unwrap();
        assert_eq!(read, rows);
        assert_eq!(array.iter().size_hint(), (4, Some(4)));
        assert_eq!((&array).into_iter().count(), 4);
    }

    #[test]
    fn get_into_reuses_buffer() {
        let mut array = small_array(2, 8);
        let row = array.append(&[10, 20, 30]).unwrap();

        let mut out = Vec::with_capacity(64);
        array.get_into(row, &mut out).unwrap();
        assert_eq!(out, vec![10, 20, 30]);
        assert!(out.capacity() >= 64);
    }

    #[test]
    fn invalid_config_rejected() {
        let result = RowArray::open_in_memory(Config::new(0));
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn stats_track_operations() {
        let mut array = small_array(4, 2);
        array.append(&[1, 2]).unwrap();
        array.append(&[3]).unwrap();
        array.get(RowNumber::new(0)).unwrap();

        let stats = array.stats();
        assert_eq!(stats.appends, 2);
        assert_eq!(stats.ints_written, 3);
        assert_eq!(stats.reads, 1);
        assert_eq!(stats.ints_read, 2);
        assert_eq!(stats.rotations, 1);
    }

    #[test]
    fn file_backed_layout() {
        let temp = tempdir().unwrap();
        let config = Config::new(3).base_dir(temp.path()).segment_ints(5);
        let mut array = RowArray::open(config).unwrap();

        array.append(&[1, 2]).unwrap();
        array.append(&[3, 4, 5]).unwrap();
        array.append(&[6]).unwrap();
        array.flush().unwrap();

        let root = temp.path().join("mappedIntBuffer");
        assert_eq!(array.path(), Some(root.as_path()));

        let mut names: Vec<String> = std::fs::read_dir(&root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["MAPPED_INTBUFFER0", "MAPPED_INTBUFFER1", "MAPPED_INTBUFFER_INDEX"]
        );

        // capacity * 4 records * 4 bytes
        assert_eq!(
            std::fs::metadata(root.join("MAPPED_INTBUFFER_INDEX")).unwrap().len(),
            48
        );

        // Raw index bytes hold the records in native order.
        let raw = std::fs::read(root.join("MAPPED_INTBUFFER_INDEX")).unwrap();
        let ints: Vec<i32> = raw
            .chunks_exact(4)
            .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(ints, vec![0, 0, 0, 2, 1, 0, 2, 3, 2, 1, 0, 1]);

        array.close().unwrap();
    }

    #[test]
    fn close_releases_lock() {
        let temp = tempdir().unwrap();
        let config = Config::new(2).base_dir(temp.path());

        let array = RowArray::open(config.clone()).unwrap();
        assert!(matches!(
            RowArray::open(config.clone()),
            Err(CoreError::ArrayLocked)
        ));

        array.close().unwrap();
        let reopened = RowArray::open(config).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn reopen_discards_previous_segments() {
        let temp = tempdir().unwrap();
        let config = Config::new(8).base_dir(temp.path()).segment_ints(2);

        let mut array = RowArray::open(config.clone()).unwrap();
        for i in 0..5 {
            array.append(&[i, i]).unwrap();
        }
        assert_eq!(array.segment_count(), 5);
        array.close().unwrap();

        let mut array = RowArray::open(config).unwrap();
        let row = array.append(&[9]).unwrap();
        assert_eq!(row, RowNumber::new(0));
        assert_eq!(array.segment_count(), 1);

        let root = temp.path().join("mappedIntBuffer");
        let files = std::fs::read_dir(&root).unwrap().count();
        assert_eq!(files, 2);
        assert!(matches!(
            array.get(RowNumber::new(1)),
            Err(CoreError::UnknownRow { .. })
        ));
    }

    #[test]
    fn frozen_segments_stay_readable_after_rotation() {
        let temp = tempdir().unwrap();
        let config = Config::new(10).base_dir(temp.path()).segment_ints(2);
        let mut array = RowArray::open(config).unwrap();

        for i in 0..5 {
            array.append(&[i, i + 1]).unwrap();
        }

        let states: Vec<SegmentState> = array.segments().infos().map(|i| i.state).collect();
        assert_eq!(states.len(), 5);
        assert!(states[..4].iter().all(|s| *s == SegmentState::Frozen));
        assert_eq!(states[4], SegmentState::Active);

        for i in 0..5 {
            assert_eq!(array.get(RowNumber::new(i as u32)).unwrap(), vec![i, i + 1]);
        }
    }

    #[test]
    fn concurrent_readers_after_append_phase() {
        let mut array = small_array(100, 16);
        for i in 0..100 {
            array.append(&vec![i; (i % 7) as usize]).unwrap();
        }

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for i in 0..100 {
                        let row = array.get(RowNumber::new(i)).unwrap();
                        assert_eq!(row, vec![i as i32; (i % 7) as usize]);
                    }
                });
            }
        });

        assert_eq!(array.stats().reads, 400);
    }
}
