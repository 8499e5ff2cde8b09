//! Workload shared by the bench and verify commands.

use mmarray_core::{Config, RowArray};
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// Shape of a generated workload.
#[derive(Debug, Clone)]
pub struct Workload {
    /// Rows to append. Also the declared capacity.
    pub rows: u32,
    /// Longest generated row, in integers.
    pub max_len: usize,
    /// Payload bytes per segment file.
    pub segment_bytes: u64,
    /// Seed for row contents and lookups.
    pub seed: u64,
    /// Use heap buffers instead of mapped files.
    pub memory: bool,
}

impl Workload {
    /// Builds the array configuration for this workload under `base`.
    pub fn config(&self, base: Option<&Path>) -> Config {
        let config = Config::new(self.rows).segment_bytes(self.segment_bytes);
        match base {
            Some(dir) => config.base_dir(dir),
            None => config,
        }
    }

    /// Opens the array the workload runs against.
    ///
    /// Without a `path` the files go to a fresh temp directory, returned
    /// alongside the array so it outlives the run.
    pub fn open(
        &self,
        path: Option<&Path>,
    ) -> Result<(RowArray, Option<TempDir>), Box<dyn std::error::Error>> {
        if self.memory {
            return Ok((RowArray::open_in_memory(self.config(None))?, None));
        }

        match path {
            Some(dir) => Ok((RowArray::open(self.config(Some(dir)))?, None)),
            None => {
                let temp_dir = TempDir::new()?;
                info!(path = %temp_dir.path().display(), "using temporary directory");
                let array = RowArray::open(self.config(Some(temp_dir.path())))?;
                Ok((array, Some(temp_dir)))
            }
        }
    }
}

/// Generates a row of random length `0..=max_len` with values in `0..=100`.
pub fn random_row(rng: &mut StdRng, max_len: usize) -> Vec<i32> {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen_range(0..=100)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn workload() -> Workload {
        Workload {
            rows: 10,
            max_len: 5,
            segment_bytes: 64,
            seed: 1,
            memory: false,
        }
    }

    #[test]
    fn test_random_row_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let row = random_row(&mut rng, 5);
            assert!(row.len() <= 5);
            assert!(row.iter().all(|v| (0..=100).contains(v)));
        }
    }

    #[test]
    fn test_open_in_temp_dir() {
        let (array, temp_dir) = workload().open(None).unwrap();
        let temp_dir = temp_dir.unwrap();
        assert_eq!(array.path(), Some(temp_dir.path().join("mappedIntBuffer").as_path()));
    }

    #[test]
    fn test_open_in_memory() {
        let workload = Workload {
            memory: true,
            ..workload()
        };
        let (array, temp_dir) = workload.open(None).unwrap();
        assert!(array.path().is_none());
        assert!(temp_dir.is_none());
    }
}
