//! Verify command implementation.

use super::workload::{random_row, Workload};
use mmarray_core::{RowArray, RowNumber};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// A row that did not read back as appended.
#[derive(Debug, Error)]
#[error("{row} read back {actual_len} ints, expected {expected_len} (first difference at {first_diff})")]
pub struct Mismatch {
    /// Row number.
    pub row: RowNumber,
    /// Length that was appended.
    pub expected_len: usize,
    /// Length that was read.
    pub actual_len: usize,
    /// Position of the first differing integer.
    pub first_diff: usize,
}

/// Runs the verify command.
pub fn run(path: Option<&Path>, workload: &Workload) -> Result<(), Box<dyn std::error::Error>> {
    info!(rows = workload.rows, seed = workload.seed, "starting verification");

    let (mut array, _temp_dir) = workload.open(path)?;
    let mut rng = StdRng::seed_from_u64(workload.seed);

    let mut expected = Vec::with_capacity(workload.rows as usize);
    for _ in 0..workload.rows {
        let row = random_row(&mut rng, workload.max_len);
        array.append(&row)?;
        expected.push(row);
    }

    let mut checked = 0usize;
    for i in 0..workload.rows {
        check_row(&array, &expected, RowNumber::new(i))?;
        checked += 1;
    }
    for _ in 0..workload.rows {
        check_row(&array, &expected, RowNumber::new(rng.gen_range(0..workload.rows)))?;
        checked += 1;
    }

    let segments = array.segment_count();
    array.close()?;

    info!(checked, segments, "verification passed");
    println!(
        "OK: {} rows verified ({} reads across {} segments, seed {})",
        workload.rows, checked, segments, workload.seed
    );

    Ok(())
}

fn check_row(
    array: &RowArray,
    expected: &[Vec<i32>],
    row: RowNumber,
) -> Result<(), Box<dyn std::error::Error>> {
    let want = &expected[row.as_usize()];
    let got = array.get(row)?;
    if got == *want {
        return Ok(());
    }

    let first_diff = got
        .iter()
        .zip(want)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| got.len().min(want.len()));
    let mismatch = Mismatch {
        row,
        expected_len: want.len(),
        actual_len: got.len(),
        first_diff,
    };
    error!(%mismatch, "verification failed");
    Err(mismatch.into())
}
