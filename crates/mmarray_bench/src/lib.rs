//! Benchmark utilities.

use mmarray_core::{Config, RowArray};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Generates `count` rows of exactly `len` integers in `0..=100`.
pub fn fixed_rows(count: usize, len: usize, seed: u64) -> Vec<Vec<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..len).map(|_| rng.gen_range(0..=100)).collect())
        .collect()
}

/// Generates `count` rows of random length `0..=max_len`.
pub fn random_rows(count: usize, max_len: usize, seed: u64) -> Vec<Vec<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(0..=max_len);
            (0..len).map(|_| rng.gen_range(0..=100)).collect()
        })
        .collect()
}

/// Generates `count` uniformly random row numbers below `rows`.
pub fn random_lookups(count: usize, rows: u32, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..rows)).collect()
}

/// Opens an array for `rows`, file-backed in a fresh temp directory when
/// `mapped` is set.
pub fn open_array(rows: usize, segment_bytes: u64, mapped: bool) -> (RowArray, Option<TempDir>) {
    let config = Config::new(rows as u32).segment_bytes(segment_bytes);
    if mapped {
        let temp_dir = TempDir::new().unwrap();
        let array = RowArray::open(config.base_dir(temp_dir.path())).unwrap();
        (array, Some(temp_dir))
    } else {
        (RowArray::open_in_memory(config).unwrap(), None)
    }
}

/// Opens an array and appends every row in `rows`.
pub fn populated_array(
    rows: &[Vec<i32>],
    segment_bytes: u64,
    mapped: bool,
) -> (RowArray, Option<TempDir>) {
    let (mut array, temp_dir) = open_array(rows.len(), segment_bytes, mapped);
    for row in rows {
        array.append(row).unwrap();
    }
    (array, temp_dir)
}
