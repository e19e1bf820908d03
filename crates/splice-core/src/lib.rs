//! Splice Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types used throughout Splice:
//! - Error taxonomy (reference, invariant, collaborator, persistence)
//! - Time constants and the shared seconds/pixels mapping
//! - The snap-to-candidate algorithm

pub mod error;
pub mod snap;
pub mod time;

pub use error::{ErrorKind, Result, SpliceError};
pub use snap::{snap_time, SnapKind, SnapPoint, SnapPoints, SnappingEngine, SNAP_THRESHOLD};
pub use time::{
    clamp_time, clamp_zoom, TimeRange, TimeScale, DEFAULT_BASE_SCALE, MAX_ZOOM,
    MIN_CLIP_DURATION, MIN_ZOOM, TIME_EPSILON,
};
