//! Array configuration.

use crate::error::{CoreError, CoreResult};
use mmarray_storage::BYTES_PER_INT;
use std::path::{Path, PathBuf};

/// Default payload bytes per segment.
pub const DEFAULT_SEGMENT_BYTES: u64 = 128 * 1024 * 1024; // 128 MB

/// Integers per index record: row number, segment id, offset, length.
pub const RECORD_WIDTH: usize = 4;

/// Name of the directory holding the mapped files.
pub const DEFAULT_DIR_NAME: &str = "mappedIntBuffer";

/// Configuration for opening an array.
///
/// Every tuning knob lives here rather than in process-wide statics, so
/// arrays with different settings can coexist.
#[derive(Debug, Clone)]
pub struct Config {
    /// Declared upper bound on the number of rows. Fixes the index size.
    pub capacity: u32,

    /// Payload bytes per segment file.
    pub segment_bytes: u64,

    /// Parent of the array directory. `None` means the working directory.
    pub base_dir: Option<PathBuf>,

    /// Whether to create the array directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to msync a segment when it is rotated out, and fsync the
    /// directory after creating a segment file. When unset, rotation only
    /// drops write access and leaves write-back to the OS.
    pub sync_on_rotate: bool,
}

impl Config {
    /// Creates a configuration for `capacity` rows with default values.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            segment_bytes: DEFAULT_SEGMENT_BYTES,
            base_dir: None,
            create_if_missing: true,
            sync_on_rotate: false,
        }
    }

    /// Sets the declared row capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the payload bytes per segment.
    #[must_use]
    pub fn segment_bytes(mut self, bytes: u64) -> Self {
        self.segment_bytes = bytes;
        self
    }

    /// Sets the segment size in integers rather than bytes.
    #[must_use]
    pub fn segment_ints(mut self, ints: u64) -> Self {
        // Saturate so validate() reports the overflow instead of panicking.
        self.segment_bytes = ints.saturating_mul(BYTES_PER_INT as u64);
        self
    }

    /// Sets the parent directory of the array directory.
    #[must_use]
    pub fn base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets whether to create the array directory if missing.
    #[must_use]
    pub fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to msync segments on rotation.
    #[must_use]
    pub fn sync_on_rotate(mut self, value: bool) -> Self {
        self.sync_on_rotate = value;
        self
    }

    /// Returns the number of integers a segment holds.
    #[must_use]
    pub const fn segment_capacity(&self) -> usize {
        (self.segment_bytes / BYTES_PER_INT as u64) as usize
    }

    /// Returns the number of integers in the index buffer.
    #[must_use]
    pub const fn index_len(&self) -> usize {
        self.capacity as usize * RECORD_WIDTH
    }

    /// Returns the directory the mapped files live in.
    #[must_use]
    pub fn array_dir(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(DEFAULT_DIR_NAME),
            None => PathBuf::from(DEFAULT_DIR_NAME),
        }
    }

    /// Checks that every stored value fits the on-disk `i32` fields.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity == 0 {
            return Err(CoreError::invalid_config("capacity must be at least one row"));
        }
        if self.capacity > i32::MAX as u32 {
            return Err(CoreError::invalid_config(format!(
                "capacity {} exceeds {} rows",
                self.capacity,
                i32::MAX
            )));
        }
        if self.segment_bytes == 0 || self.segment_bytes % BYTES_PER_INT as u64 != 0 {
            return Err(CoreError::invalid_config(format!(
                "segment size {} is not a positive multiple of {BYTES_PER_INT} bytes",
                self.segment_bytes
            )));
        }
        if self.segment_bytes / BYTES_PER_INT as u64 > i32::MAX as u64 {
            return Err(CoreError::invalid_config(format!(
                "segment size {} exceeds {} integers",
                self.segment_bytes,
                i32::MAX
            )));
        }
        if (self.capacity as u64) * (RECORD_WIDTH * BYTES_PER_INT) as u64 > usize::MAX as u64 {
            return Err(CoreError::invalid_config(
                "index size overflows the address space",
            ));
        }
        Ok(())
    }
}
