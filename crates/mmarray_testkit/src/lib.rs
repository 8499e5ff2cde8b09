//! # mmarray Testkit
//!
//! Test utilities for mmarray.
//!
//! This crate provides:
//! - Test fixtures: in-memory and temp-dir arrays with automatic cleanup
//! - Property-based test generators using proptest
//! - Stress testing utilities for appends and concurrent reads
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mmarray_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_array() {
//!     with_temp_array(Config::new(100), |array| {
//!         let row = array.append(&[1, 2, 3]).unwrap();
//!         assert_eq!(array.get(row).unwrap(), vec![1, 2, 3]);
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use mmarray_core::{Config, CoreError, RowArray, RowNumber};
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
