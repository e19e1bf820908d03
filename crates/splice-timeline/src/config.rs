//! Timeline configuration and placement policy.

use serde::{Deserialize, Serialize};
use splice_core::{
    Result, SpliceError, TimeScale, DEFAULT_BASE_SCALE, MAX_ZOOM, MIN_CLIP_DURATION, MIN_ZOOM,
    SNAP_THRESHOLD,
};

/// Which track receives a newly imported clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAllocation {
    /// Every import creates its own track.
    NewTrackPerImport,
    /// Reuse the first track of the media's kind, creating one if none exists.
    ReuseFirstOfKind,
}

/// Where a newly imported clip starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// After the latest clip end across all tracks.
    GlobalTail,
    /// After the latest clip end on the receiving track.
    TrackTail,
}

/// How imports are laid out on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPolicy {
    pub track: TrackAllocation,
    pub position: Placement,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            track: TrackAllocation::NewTrackPerImport,
            position: Placement::GlobalTail,
        }
    }
}

/// Tunables for the editing core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Shortest clip allowed, in seconds (default: 0.1).
    pub min_clip_duration: f64,
    /// Snap capture distance in seconds (default: 0.15).
    pub snap_threshold: f64,
    /// Pixels per second at zoom 1.0 (default: 100).
    pub base_scale: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Sequence duration reported when there are no clips (default: 0).
    pub empty_duration_floor: f64,
    /// Maximum undo steps kept (default: 200).
    pub history_depth: usize,
    pub placement: PlacementPolicy,
}

impl TimelineConfig {
    /// Reject settings the editing core cannot work with.
    ///
    /// Lengths and scales must be finite and positive, and the zoom range
    /// must satisfy `0 < zoom_min <= zoom_max`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_clip_duration", self.min_clip_duration),
            ("snap_threshold", self.snap_threshold),
            ("base_scale", self.base_scale),
            ("zoom_min", self.zoom_min),
            ("zoom_max", self.zoom_max),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SpliceError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.zoom_min > self.zoom_max {
            return Err(SpliceError::InvalidConfig(format!(
                "zoom_min {} is above zoom_max {}",
                self.zoom_min, self.zoom_max
            )));
        }
        if !self.empty_duration_floor.is_finite() || self.empty_duration_floor < 0.0 {
            return Err(SpliceError::InvalidConfig(format!(
                "empty_duration_floor must be zero or more, got {}",
                self.empty_duration_floor
            )));
        }
        Ok(())
    }

    /// Clamp a zoom factor into the configured range. NaN maps to 1.0
    /// before clamping.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        zoom.max(self.zoom_min).min(self.zoom_max)
    }

    /// Seconds-to-pixels mapping at `zoom`, limited to the configured zoom
    /// range rather than the built-in one.
    pub fn time_scale(&self, zoom: f64) -> TimeScale {
        TimeScale {
            base_scale: self.base_scale,
            zoom: self.clamp_zoom(zoom),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_clip_duration: MIN_CLIP_DURATION,
            snap_threshold: SNAP_THRESHOLD,
            base_scale: DEFAULT_BASE_SCALE,
            zoom_min: MIN_ZOOM,
            zoom_max: MAX_ZOOM,
            empty_duration_floor: 0.0,
            history_depth: 200,
            placement: PlacementPolicy::default(),
        }
    }
}
