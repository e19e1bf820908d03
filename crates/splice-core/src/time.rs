//! Time representation for the editing timeline.
//!
//! All timeline coordinates are seconds as `f64`, shared by every track.
//! Conversion between seconds and pixels goes through [`TimeScale`] so the
//! drag, ruler and playhead code all agree on one mapping.

use serde::{Deserialize, Serialize};

/// Shortest clip a user can produce by trimming, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.1;

/// Tolerance for comparing float time values produced by clamping arithmetic.
pub const TIME_EPSILON: f64 = 1e-9;

/// Default pixels per second at zoom 1.0.
pub const DEFAULT_BASE_SCALE: f64 = 100.0;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.25;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 4.0;

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]`.
#[inline]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Clamp a time value into `[0, max]`. NaN maps to zero.
#[inline]
pub fn clamp_time(time: f64, max: f64) -> f64 {
    if time.is_nan() {
        return 0.0;
    }
    time.max(0.0).min(max.max(0.0))
}

/// Mapping between timeline seconds and horizontal pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    /// Pixels per second at zoom 1.0
    pub base_scale: f64,
    /// Zoom factor
    pub zoom: f64,
}

impl TimeScale {
    /// Create a scale. The zoom is clamped into the allowed range.
    pub fn new(base_scale: f64, zoom: f64) -> Self {
        Self {
            base_scale,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Pixels covered by one second at the current zoom.
    #[inline]
    pub fn pixels_per_second(self) -> f64 {
        self.base_scale * self.zoom
    }

    /// `t × base_scale × zoom`
    #[inline]
    pub fn time_to_pixels(self, time: f64) -> f64 {
        time * self.pixels_per_second()
    }

    /// Inverse of [`TimeScale::time_to_pixels`].
    #[inline]
    pub fn pixels_to_time(self, pixels: f64) -> f64 {
        let pps = self.pixels_per_second();
        if pps <= 0.0 {
            return 0.0;
        }
        pixels / pps
    }

    /// Same scale with a different zoom.
    pub fn with_zoom(self, zoom: f64) -> Self {
        Self::new(self.base_scale, zoom)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_SCALE, 1.0)
    }
}

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: f64,
    /// End time (exclusive)
    pub end: f64,
}

impl TimeRange {
    /// Create a new time range.
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the range.
    #[inline]
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Check if a time lies strictly inside the range, excluding both edges.
    #[inline]
    pub fn strictly_contains(self, time: f64) -> bool {
        time > self.start && time < self.end
    }

    /// Check if two ranges overlap. Ranges that only touch do not overlap,
    /// and overlaps thinner than [`TIME_EPSILON`] are ignored.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end - TIME_EPSILON && other.start < self.end - TIME_EPSILON
    }

    /// Same range moved by `delta`.
    #[inline]
    pub fn shifted(self, delta: f64) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }
}
