//! Test fixtures and array helpers.
//!
//! Provides convenience functions for setting up test arrays
//! and common test scenarios.

use mmarray_core::{Config, RowArray};
use std::path::PathBuf;
use tempfile::TempDir;

/// A test array with automatic cleanup.
pub struct TestArray {
    /// The array instance.
    pub array: RowArray,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestArray {
    /// Creates a new in-memory test array.
    pub fn memory(config: Config) -> Self {
        Self {
            array: RowArray::open_in_memory(config).expect("Failed to open in-memory array"),
            _temp_dir: None,
        }
    }

    /// Creates a new file-backed test array in a temporary directory.
    ///
    /// Any `base_dir` already set on `config` is replaced.
    pub fn file(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let array = RowArray::open(config.base_dir(temp_dir.path()))
            .expect("Failed to open file array");

        Self {
            array,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the array directory if file-backed, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.array.path().map(|p| p.to_path_buf())
    }
}

impl std::ops::Deref for TestArray {
    type Target = RowArray;

    fn deref(&self) -> &Self::Target {
        &self.array
    }
}

impl std::ops::DerefMut for TestArray {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.array
    }
}

/// Runs a test with a temporary in-memory array.
///
/// # Example
///
/// ```rust,ignore
/// use mmarray_testkit::with_temp_array;
///
/// #[test]
/// fn my_test() {
///     with_temp_array(Config::new(10), |array| {
///         array.append(&[1]).unwrap();
///     });
/// }
/// ```
pub fn with_temp_array<F, R>(config: Config, f: F) -> R
where
    F: FnOnce(&mut RowArray) -> R,
{
    let mut test_array = TestArray::memory(config);
    f(&mut test_array.array)
}

/// Runs a test with a temporary file-backed array.
pub fn with_file_array<F, R>(config: Config, f: F) -> R
where
    F: FnOnce(&mut RowArray, &std::path::Path) -> R,
{
    let mut test_array = TestArray::file(config);
    let path = test_array.path().expect("File array should have a path");
    f(&mut test_array.array, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// The rows of the three-row rotation walkthrough:
    /// capacity 3, five integers per segment.
    pub fn rotation_rows() -> Vec<Vec<i32>> {
        vec![vec![1, 2], vec![3, 4, 5], vec![6]]
    }

    /// Creates an in-memory array holding `row_count` rows where row `i`
    /// is `[i; i % 8]`.
    pub fn populated_array(row_count: u32, segment_ints: u64) -> TestArray {
        let mut test_array =
            TestArray::memory(Config::new(row_count.max(1)).segment_ints(segment_ints));

        for i in 0..row_count {
            test_array
                .append(&expected_row(i))
                .expect("Failed to append row");
        }

        test_array
    }

    /// The row `populated_array` stores under row number `i`.
    pub fn expected_row(i: u32) -> Vec<i32> {
        vec![i as i32; (i % 8) as usize]
    }
}
