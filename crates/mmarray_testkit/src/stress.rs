//! Stress tests for mmarray.
//!
//! These helpers drive an array under heavy load and concurrent access and
//! report throughput. Row contents are derived from a seed so every read can
//! be checked without keeping a copy of the data.

use mmarray_core::{RowArray, RowNumber, SharedRowArray};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations (errors or mismatched rows).
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of rows to append.
    pub rows: u32,
    /// Longest generated row, in integers.
    pub max_row_len: usize,
    /// Number of concurrent reader threads.
    pub threads: usize,
    /// Seed for row contents and random lookups.
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            rows: 10_000,
            max_row_len: 100,
            threads: 4,
            seed: 0x5eed,
        }
    }
}

/// Deterministic contents of row `row` for a given seed.
///
/// Lengths are uniform in `0..=max_len`, values in `0..=100`.
pub fn seeded_row(seed: u64, row: u32, max_len: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed ^ (u64::from(row) << 20));
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen_range(0..=100)).collect()
}

/// Appends `config.rows` seeded rows.
pub fn stress_appends(array: &mut RowArray, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.rows {
        match array.append(&seeded_row(config.seed, i, config.max_row_len)) {
            Ok(_) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Reads every row in order and checks its contents.
pub fn stress_sequential_reads(array: &RowArray, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;
    let mut buf = Vec::new();

    for i in 0..config.rows {
        match array.get_into(RowNumber::new(i), &mut buf) {
            Ok(()) if buf == seeded_row(config.seed, i, config.max_row_len) => successful += 1,
            _ => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Reads `config.rows` uniformly random rows and checks their contents.
pub fn stress_random_reads(array: &RowArray, config: &StressConfig) -> StressTestResult {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;
    let mut buf = Vec::new();

    for _ in 0..config.rows {
        let i = rng.gen_range(0..config.rows.max(1));
        match array.get_into(RowNumber::new(i), &mut buf) {
            Ok(()) if buf == seeded_row(config.seed, i, config.max_row_len) => successful += 1,
            _ => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Appends on the calling thread while `config.threads` readers re-read
/// every row already published.
///
/// Every published row is counted exactly once. Rows that no reader
/// verified, because the readers exited or panicked, count as failures.
pub fn stress_concurrent_reads(array: &SharedRowArray, config: &StressConfig) -> StressTestResult {
    let start = Instant::now();
    let (tx, rx) = mpsc::channel::<RowNumber>();
    let rx = Arc::new(Mutex::new(rx));

    let readers: Vec<_> = (0..config.threads)
        .map(|_| {
            let array = array.clone();
            let rx = Arc::clone(&rx);
            let config = config.clone();
            thread::spawn(move || {
                let mut ok = 0usize;
                let mut bad = 0usize;
                loop {
                    let Ok(row) = rx.lock().recv() else { break };
                    match array.get(row) {
                        Ok(values)
                            if values
                                == seeded_row(config.seed, row.as_u32(), config.max_row_len) =>
                        {
                            ok += 1
                        }
                        _ => bad += 1,
                    }
                }
                (ok, bad)
            })
        })
        .collect();

    let mut failed = 0usize;
    let mut published = 0usize;
    for i in 0..config.rows {
        match array.append(&seeded_row(config.seed, i, config.max_row_len)) {
            Ok(row) => match tx.send(row) {
                Ok(()) => published += 1,
                Err(_) => failed += 1,
            },
            Err(_) => failed += 1,
        }
    }
    drop(tx);

    let mut successful = 0usize;
    let mut checked = 0usize;
    for reader in readers {
        // A panicked reader's rows show up as unchecked below.
        if let Ok((ok, bad)) = reader.join() {
            successful += ok;
            checked += ok + bad;
            failed += bad;
        }
    }
    failed += published.saturating_sub(checked);

    StressTestResult::new(successful, failed, start.elapsed())
}
