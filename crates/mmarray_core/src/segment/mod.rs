//! Segment storage for row payloads.
//!
//! Segments are fixed-capacity integer buffers, one backing file each.
//! Row payloads are packed back to back into the active segment; when the
//! next row does not fit, the active segment is frozen and a new one is
//! created. A row never spans two segments.
//!
//! ## Segment Lifecycle
//!
//! ```text
//! create -> Active (cursor advancing) -> Frozen (read-only forever)
//! ```
//!
//! The last segment stays `Active` until the array is closed.

mod handle;
mod store;

pub use handle::{SegmentInfo, SegmentState};
pub use store::SegmentStore;
