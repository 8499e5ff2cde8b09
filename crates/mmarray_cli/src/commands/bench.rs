//! Bench command implementation.

use super::workload::{random_row, Workload};
use mmarray_core::{RowNumber, StatsSnapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Timing of one phase of the run.
#[derive(Debug, Serialize)]
pub struct Phase {
    /// Wall-clock seconds.
    pub seconds: f64,
    /// Rows per second, zero for phases that touch no rows.
    pub rows_per_second: f64,
}

impl Phase {
    fn new(elapsed: Duration, rows: u32) -> Self {
        let seconds = elapsed.as_secs_f64();
        let rows_per_second = if seconds > 0.0 {
            f64::from(rows) / seconds
        } else {
            0.0
        };
        Self {
            seconds,
            rows_per_second,
        }
    }
}

/// Benchmark result.
#[derive(Debug, Serialize)]
pub struct BenchResult {
    /// Array directory, absent for heap-backed runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Rows appended.
    pub rows: u32,
    /// Longest generated row.
    pub max_len: usize,
    /// Payload bytes per segment.
    pub segment_bytes: u64,
    /// Seed the workload ran with.
    pub seed: u64,
    /// Opening the array.
    pub init: Phase,
    /// Appending every row.
    pub append: Phase,
    /// Reading every row in order.
    pub get: Phase,
    /// Reading `rows` uniformly random rows.
    pub random_get: Phase,
    /// Segments created.
    pub segments: usize,
    /// Array counters at the end of the run.
    pub stats: StatsSnapshot,
}

/// Runs the bench command.
pub fn run(
    path: Option<&Path>,
    workload: &Workload,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        rows = workload.rows,
        max_len = workload.max_len,
        seed = workload.seed,
        "starting benchmark"
    );

    let start = Instant::now();
    let (mut array, _temp_dir) = workload.open(path)?;
    let init = Phase::new(start.elapsed(), 0);
    info!(seconds = init.seconds, "initialized");

    let mut rng = StdRng::seed_from_u64(workload.seed);
    let start = Instant::now();
    for _ in 0..workload.rows {
        array.append(&random_row(&mut rng, workload.max_len))?;
    }
    let append = Phase::new(start.elapsed(), workload.rows);
    info!(seconds = append.seconds, "appended");

    let mut buf = Vec::new();
    let start = Instant::now();
    for i in 0..workload.rows {
        array.get_into(RowNumber::new(i), &mut buf)?;
    }
    let get = Phase::new(start.elapsed(), workload.rows);
    info!(seconds = get.seconds, "retrieved");

    let start = Instant::now();
    for _ in 0..workload.rows {
        let i = rng.gen_range(0..workload.rows);
        array.get_into(RowNumber::new(i), &mut buf)?;
    }
    let random_get = Phase::new(start.elapsed(), workload.rows);
    info!(seconds = random_get.seconds, "randomly retrieved");

    let result = BenchResult {
        path: array.path().map(|p| p.display().to_string()),
        rows: workload.rows,
        max_len: workload.max_len,
        segment_bytes: workload.segment_bytes,
        seed: workload.seed,
        init,
        append,
        get,
        random_get,
        segments: array.segment_count(),
        stats: array.stats(),
    };
    array.close()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &BenchResult) {
    println!("mmarray Benchmark");
    println!("=================");
    if let Some(path) = &result.path {
        println!("Path:          {}", path);
    }
    println!("Rows:          {}", result.rows);
    println!("Max row len:   {}", result.max_len);
    println!("Segment size:  {}", format_size(result.segment_bytes));
    println!("Seed:          {}", result.seed);
    println!();
    println!("Timings:");
    println!("  Initialization: {:>10.3}s", result.init.seconds);
    print_phase("Append", &result.append);
    print_phase("Get", &result.get);
    print_phase("Random get", &result.random_get);
    println!();
    println!("Segments:      {}", result.segments);
    println!("Rotations:     {}", result.stats.rotations);
    println!("Syncs:         {}", result.stats.syncs);
    println!("Ints written:  {}", result.stats.ints_written);
    println!("Ints read:     {}", result.stats.ints_read);
}

fn print_phase(name: &str, phase: &Phase) {
    println!(
        "  {:<15} {:>10.3}s  ({:.0} rows/s)",
        format!("{}:", name),
        phase.seconds,
        phase.rows_per_second
    );
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
