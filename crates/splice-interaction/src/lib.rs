//! Splice Interaction - drag and trim gestures
//!
//! Turns sampled pointer events into timeline edits:
//! - Drag sessions with snapping and neighbor clamps
//! - The gesture controller that commits samples to the store
//! - Track hit-testing for cross-track drops
//! - Playhead scrubbing and click-to-seek

pub mod controller;
pub mod drag;
pub mod scrub;

pub use controller::{GestureState, InteractionController};
pub use drag::{DragMode, DragProposal, DragSession};
pub use hit_test::{TrackHitTest, TrackLayout, RULER_HEIGHT, TRACK_BLOCK_HEIGHT};
pub use scrub::PlayheadScrub;
