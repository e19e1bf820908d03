//! Playhead scrubbing and click-to-seek.
//!
//! Pointer positions are viewport pixels; the horizontal scroll offset of
//! the track area is added before converting to seconds, so the ruler, the
//! playhead and clip drags share one mapping.

use splice_core::TimeScale;
use splice_timeline::{TimelineConfig, TimelineState};

/// Scale and scroll captured when the playhead is grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayheadScrub {
    scale: TimeScale,
    scroll_x: f64,
}

impl PlayheadScrub {
    pub fn new(scale: TimeScale, scroll_x: f64) -> Self {
        Self { scale, scroll_x }
    }

    /// Capture the current zoom for a scrub over a view scrolled by
    /// `scroll_x` pixels.
    pub fn begin(state: &TimelineState, config: &TimelineConfig, scroll_x: f64) -> Self {
        Self::new(config.time_scale(state.zoom_level()), scroll_x)
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    /// Timeline time under `pointer_x`. Never negative; the store clamps the
    /// upper end to the sequence duration.
    pub fn time_at(&self, pointer_x: f64) -> f64 {
        self.scale
            .pixels_to_time(pointer_x + self.scroll_x)
            .max(0.0)
    }
}
