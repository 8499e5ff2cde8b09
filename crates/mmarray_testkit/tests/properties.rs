//! Property tests for the row array: rows read back exactly as appended,
//! segments fill densely, and rotation happens only when a row does not fit.

use mmarray_core::{Config, CoreError, RowArray, RowNumber, SegmentId};
use mmarray_testkit::generators::{row_strategy, workload_strategy, PropTestConfig};
use mmarray_testkit::TestArray;
use proptest::prelude::*;

fn open(rows: usize, segment_ints: u64) -> RowArray {
    RowArray::open_in_memory(Config::new(rows.max(1) as u32).segment_ints(segment_ints)).unwrap()
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn rows_read_back_as_appended(workload in workload_strategy()) {
        let mut array = open(workload.rows.len(), workload.segment_ints);

        for (i, row) in workload.rows.iter().enumerate() {
            let number = array.append(row).unwrap();
            prop_assert_eq!(number, RowNumber::new(i as u32));
        }

        prop_assert_eq!(array.len(), workload.rows.len());
        for (i, row) in workload.rows.iter().enumerate() {
            prop_assert_eq!(&array.get(RowNumber::new(i as u32)).unwrap(), row);
        }
    }

    #[test]
    fn segments_fill_densely(workload in workload_strategy()) {
        let mut array = open(workload.rows.len(), workload.segment_ints);
        let capacity = workload.segment_ints as usize;

        let mut segment: Option<u32> = None;
        let mut used = 0usize;
        for row in &workload.rows {
            let number = array.append(row).unwrap();

            match segment {
                Some(_) if used + row.len() <= capacity => {}
                Some(id) => {
                    segment = Some(id + 1);
                    used = 0;
                }
                None => segment = Some(0),
            }

            let placement = array.placement(number).unwrap();
            prop_assert_eq!(placement.segment, SegmentId::new(segment.unwrap()));
            prop_assert_eq!(placement.offset as usize, used);
            prop_assert_eq!(placement.len as usize, row.len());
            used += row.len();
        }

        let expected_segments = segment.map_or(0, |id| id as usize + 1);
        prop_assert_eq!(array.segment_count(), expected_segments);
    }

    #[test]
    fn oversize_rows_are_rejected_without_side_effects(
        segment_ints in 1u64..16,
        extra in 1usize..8,
    ) {
        let mut array = open(4, segment_ints);
        array.append(&[7]).unwrap();

        let row = vec![1; segment_ints as usize + extra];
        let err = array.append(&row).unwrap_err();
        let is_too_large = matches!(err, CoreError::RowTooLarge { .. });
        prop_assert!(is_too_large);
        prop_assert_eq!(array.len(), 1);
        prop_assert_eq!(array.get(RowNumber::new(0)).unwrap(), vec![7]);
    }
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn file_backed_rows_read_back(rows in prop::collection::vec(row_strategy(12), 1..24)) {
        let mut array = TestArray::file(Config::new(rows.len() as u32).segment_ints(16));

        for row in &rows {
            array.append(row).unwrap();
        }

        let read: Vec<Vec<i32>> = array.iter().collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(read, rows);
    }
}
