//! Array directory management.
//!
//! This module handles the file system layout for an array:
//!
//! ```text
//! <base_dir>/mappedIntBuffer/
//! ├─ MAPPED_INTBUFFER_INDEX   # Row index, capacity * 16 bytes, locked
//! ├─ MAPPED_INTBUFFER0        # Segment 0
//! ├─ MAPPED_INTBUFFER1        # Segment 1
//! └─ ...
//! ```
//!
//! Every file holds raw native-endian `i32` values with no header. The index
//! file doubles as the advisory lock, so the directory contains exactly one
//! file per segment plus the index.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::types::SegmentId;
use fs2::FileExt;
use mmarray_storage::MappedIntBuffer;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix shared by every mapped file.
const BUFFER_FILE_PREFIX: &str = "MAPPED_INTBUFFER";
/// Row index file name.
const INDEX_FILE: &str = "MAPPED_INTBUFFER_INDEX";

/// Returns true for segment file names: the prefix followed by digits only.
fn is_segment_file(name: &str) -> bool {
    name.strip_prefix(BUFFER_FILE_PREFIX)
        .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

/// Manages the array directory and its exclusive lock.
///
/// # Thread Safety
///
/// The `ArrayDir` holds an exclusive lock on the index file.
/// Only one `ArrayDir` instance can exist per directory at a time.
///
/// # Example
///
/// ```rust,ignore
/// use mmarray_core::{dir::ArrayDir, Config};
///
/// let dir = ArrayDir::open(&Config::new(1_000))?;
/// println!("index path: {:?}", dir.index_path());
/// ```
#[derive(Debug)]
pub struct ArrayDir {
    /// Array directory path.
    path: PathBuf,
    /// Index file handle (held for exclusive access).
    _lock_file: File,
}

impl ArrayDir {
    /// Opens or creates the array directory described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - The path exists but is not a directory
    /// - Another handle holds the lock (returns `ArrayLocked`)
    /// - I/O errors occur
    pub fn open(config: &Config) -> CoreResult<Self> {
        let path = config.array_dir();

        if !path.exists() {
            if config.create_if_missing {
                fs::create_dir_all(&path)?;
            } else {
                return Err(CoreError::invalid_config(format!(
                    "array directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if !path.is_dir() {
            return Err(CoreError::invalid_config(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        // Lock before anything truncates the index.
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(INDEX_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(CoreError::ArrayLocked);
        }

        let dir = Self {
            path,
            _lock_file: lock_file,
        };
        dir.remove_stale_segments()?;
        Ok(dir)
    }

    /// Deletes segment files left behind by an earlier array.
    ///
    /// Only names of the form `MAPPED_INTBUFFER<digits>` are touched; the
    /// index and unrelated files stay.
    fn remove_stale_segments(&self) -> CoreResult<()> {
        let mut removed = 0usize;
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let name = entry.file_name();
            if is_segment_file(&name.to_string_lossy()) && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(path = %self.path.display(), removed, "removed stale segment files");
        }
        Ok(())
    }

    /// Returns the path to the array directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the row index file.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.path.join(INDEX_FILE)
    }

    /// Returns the path to a segment file.
    ///
    /// Segment 3 maps to `MAPPED_INTBUFFER3`.
    #[must_use]
    pub fn segment_path(&self, segment: SegmentId) -> PathBuf {
        self.path
            .join(format!("{BUFFER_FILE_PREFIX}{}", segment.as_u32()))
    }

    /// Creates and maps the row index file with `len` integer slots.
    pub fn create_index(&self, len: usize) -> CoreResult<MappedIntBuffer> {
        Ok(MappedIntBuffer::create(&self.index_path(), len)?)
    }

    /// Creates and maps a segment file with `capacity` integer slots.
    ///
    /// With `sync` set, the directory is fsynced so the new file's
    /// metadata survives a crash.
    pub fn create_segment(
        &self,
        segment: SegmentId,
        capacity: usize,
        sync: bool,
    ) -> CoreResult<MappedIntBuffer> {
        let buffer = MappedIntBuffer::create(&self.segment_path(segment), capacity)?;
        if sync {
            self.sync_directory()?;
        }
        Ok(buffer)
    }

    /// Syncs the array directory so created files are durable.
    #[cfg(unix)]
    pub fn sync_directory(&self) -> CoreResult<()> {
        let dir = File::open(&self.path)?;
        dir.sync_all()?;
        Ok(())
    }

    /// Syncs the array directory so created files are durable.
    #[cfg(not(unix))]
    pub fn sync_directory(&self) -> CoreResult<()> {
        // Directory fsync is not supported on Windows
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmarray_storage::IntBuffer;
    use tempfile::tempdir;

    #[test]
    fn open_creates_directory() {
        let temp = tempdir().unwrap();
        let config = Config::new(4).base_dir(temp.path());

        assert!(!config.array_dir().exists());

        let dir = ArrayDir::open(&config).unwrap();
        assert!(dir.path().is_dir());
        assert!(dir.index_path().exists());
    }

    #[test]
    fn open_fails_if_not_exists_and_no_create() {
        let temp = tempdir().unwrap();
        let config = Config::new(4)
            .base_dir(temp.path())
            .create_if_missing(false);

        let result = ArrayDir::open(&config);
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn open_fails_on_plain_file() {
        let temp = tempdir().unwrap();
        let config = Config::new(4).base_dir(temp.path());
        fs::write(config.array_dir(), b"not a directory").unwrap();

        let result = ArrayDir::open(&config);
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn lock_prevents_second_open() {
        let temp = tempdir().unwrap();
        let config = Config::new(4).base_dir(temp.path());

        let _dir1 = ArrayDir::open(&config).unwrap();

        let result = ArrayDir::open(&config);
        assert!(matches!(result, Err(CoreError::ArrayLocked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let temp = tempdir().unwrap();
        let config = Config::new(4).base_dir(temp.path());

        {
            let _dir = ArrayDir::open(&config).unwrap();
        }

        let _dir2 = ArrayDir::open(&config).unwrap();
    }

    #[test]
    fn segment_file_names() {
        assert!(is_segment_file("MAPPED_INTBUFFER0"));
        assert!(is_segment_file("MAPPED_INTBUFFER17"));
        assert!(!is_segment_file("MAPPED_INTBUFFER_INDEX"));
        assert!(!is_segment_file("MAPPED_INTBUFFER"));
        assert!(!is_segment_file("MAPPED_INTBUFFER3.bak"));
        assert!(!is_segment_file("notes.txt"));
    }

    #[test]
    fn open_removes_stale_segments() {
        let temp = tempdir().unwrap();
        let config = Config::new(4).base_dir(temp.path());
        let root = config.array_dir();
        fs::create_dir_all(&root).unwrap();
        for name in ["MAPPED_INTBUFFER0", "MAPPED_INTBUFFER7", "notes.txt"] {
            fs::write(root.join(name), b"old").unwrap();
        }

        let dir = ArrayDir::open(&config).unwrap();

        assert!(!dir.segment_path(SegmentId::new(0)).exists());
        assert!(!dir.segment_path(SegmentId::new(7)).exists());
        assert!(root.join("notes.txt").exists());
        assert!(dir.index_path().exists());
    }

    #[test]
    fn paths_are_correct() {
        let temp = tempdir().unwrap();
        let config = Config::new(4).base_dir(temp.path());
        let dir = ArrayDir::open(&config).unwrap();
        let root = temp.path().join("mappedIntBuffer");

        assert_eq!(dir.index_path(), root.join("MAPPED_INTBUFFER_INDEX"));
        assert_eq!(
            dir.segment_path(SegmentId::new(0)),
            root.join("MAPPED_INTBUFFER0")
        );
        assert_eq!(
            dir.segment_path(SegmentId::new(12)),
            root.join("MAPPED_INTBUFFER12")
        );
    }

    #[test]
    fn created_files_have_exact_sizes() {
        let temp = tempdir().unwrap();
        let config = Config::new(3).base_dir(temp.path());
        let dir = ArrayDir::open(&config).unwrap();

        let index = dir.create_index(config.index_len()).unwrap();
        let segment = dir.create_segment(SegmentId::new(0), 5, true).unwrap();

        assert_eq!(index.capacity(), 12);
        assert_eq!(fs::metadata(dir.index_path()).unwrap().len(), 48);
        assert_eq!(segment.capacity(), 5);
        assert_eq!(
            fs::metadata(dir.segment_path(SegmentId::new(0))).unwrap().len(),
            20
        );
    }
}
