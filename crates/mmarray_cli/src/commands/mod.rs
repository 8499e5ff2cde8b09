//! CLI command implementations.

pub mod bench;
pub mod verify;
pub mod workload;
