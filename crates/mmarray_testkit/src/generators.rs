//! Property-based test generators using proptest.
//!
//! Provides strategies for generating rows and whole append workloads.

use proptest::prelude::*;

/// Strategy for a single row of up to `max_len` integers (zero-length included).
pub fn row_strategy(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 0..=max_len)
}

/// Strategy for a sequence of up to `max_rows` rows.
pub fn rows_strategy(max_rows: usize, max_len: usize) -> impl Strategy<Value = Vec<Vec<i32>>> {
    prop::collection::vec(row_strategy(max_len), 0..=max_rows)
}

/// An append workload together with the segment size to run it against.
#[derive(Debug, Clone)]
pub struct Workload {
    /// Integers per segment.
    pub segment_ints: u64,
    /// Rows to append, in order. None is longer than `segment_ints`.
    pub rows: Vec<Vec<i32>>,
}

/// Strategy for workloads with small segments, so most runs rotate.
pub fn workload_strategy() -> impl Strategy<Value = Workload> {
    (1u64..16).prop_flat_map(|segment_ints| {
        rows_strategy(64, segment_ints as usize).prop_map(move |rows| Workload {
            segment_ints,
            rows,
        })
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn row_respects_max_len(row in row_strategy(10)) {
            prop_assert!(row.len() <= 10);
        }

        #[test]
        fn workload_rows_fit_segments(workload in workload_strategy()) {
            prop_assert!(workload.segment_ints >= 1);
            for row in &workload.rows {
                prop_assert!(row.len() as u64 <= workload.segment_ints);
            }
        }
    }
}
