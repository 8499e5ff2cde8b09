//! mmarray CLI
//!
//! Drives a row array with a random workload and reports how it performed.
//!
//! # Commands
//!
//! - `bench` - Time initialization, appends, sequential and random reads
//! - `verify` - Run the same workload and check every row read back
//! - `version` - Show version information

mod commands;

use clap::{Args, Parser, Subcommand};
use commands::workload::Workload;
use mmarray_core::DEFAULT_SEGMENT_BYTES;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// mmarray command-line driver.
#[derive(Parser)]
#[command(name = "mmarray")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Parent directory for the array files (a temp directory if omitted)
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Workload shape shared by `bench` and `verify`.
#[derive(Args)]
struct WorkloadArgs {
    /// Number of rows to append (also the declared capacity)
    #[arg(short, long, default_value = "1000000")]
    rows: u32,

    /// Longest generated row, in integers
    #[arg(short, long, default_value = "100")]
    max_len: usize,

    /// Payload bytes per segment file
    #[arg(short, long, default_value_t = DEFAULT_SEGMENT_BYTES)]
    segment_bytes: u64,

    /// Seed for row contents and random lookups (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Keep everything on the heap instead of mapping files
    #[arg(long)]
    memory: bool,
}

impl WorkloadArgs {
    fn into_workload(self) -> Workload {
        Workload {
            rows: self.rows,
            max_len: self.max_len,
            segment_bytes: self.segment_bytes,
            seed: self.seed.unwrap_or_else(rand::random),
            memory: self.memory,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Time appends, sequential reads and random reads
    Bench {
        #[command(flatten)]
        workload: WorkloadArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check that every row reads back exactly as appended
    Verify {
        #[command(flatten)]
        workload: WorkloadArgs,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Bench { workload, format } => {
            commands::bench::run(cli.path.as_deref(), &workload.into_workload(), &format)?;
        }
        Commands::Verify { workload } => {
            commands::verify::run(cli.path.as_deref(), &workload.into_workload())?;
        }
        Commands::Version => {
            println!("mmarray CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("mmarray Core v{}", mmarray_core::VERSION);
        }
    }

    Ok(())
}
