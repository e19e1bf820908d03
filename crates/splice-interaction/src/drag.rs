//! Drag and trim sessions for timeline clips.
//!
//! A [`DragSession`] freezes what a gesture needs at pointer-down (the clip's
//! original bounds, its track neighbors, the playhead and the scale) so that
//! every later pointer sample maps to a proposal without reading the store.

use splice_core::{SnapPoint, SnapPoints, SnappingEngine, TimeRange, TimeScale, TIME_EPSILON};
use splice_timeline::{ClipPatch, TimelineConfig, TimelineState};
use uuid::Uuid;

/// Which affordance of the clip the gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Clip body: start and end shift together.
    Move,
    /// Left edge: only the start changes.
    TrimStart,
    /// Right edge: only the end changes.
    TrimEnd,
}

/// Clip bounds proposed for one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProposal {
    pub start_time: f64,
    pub end_time: f64,
    /// Candidate the dragged edge landed on, if it survived clamping.
    pub snapped: Option<SnapPoint>,
}

impl DragProposal {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// State captured when a drag or trim gesture starts.
#[derive(Debug, Clone)]
pub struct DragSession {
    clip_id: Uuid,
    track_id: Uuid,
    mode: DragMode,
    anchor_x: f64,
    original: TimeRange,
    /// End of the previous clip on the track, or 0.
    min_start: f64,
    /// Start of the next clip on the track, or +inf.
    max_end: f64,
    min_duration: f64,
    scale: TimeScale,
    snapping: SnappingEngine,
    snap_points: SnapPoints,
}

impl DragSession {
    /// Start a gesture on `clip_id` at horizontal pointer position
    /// `pointer_x`. Returns `None` when the clip does not exist.
    pub fn begin(
        state: &TimelineState,
        config: &TimelineConfig,
        clip_id: Uuid,
        mode: DragMode,
        pointer_x: f64,
    ) -> Option<Self> {
        let clip = state.clip(clip_id)?;
        let neighbors = state.neighbors(clip_id);
        let previous_end = neighbors.previous_end();
        let next_start = neighbors.next_start();

        Some(Self {
            clip_id,
            track_id: clip.track_id,
            mode,
            anchor_x: pointer_x,
            original: clip.range(),
            min_start: previous_end.unwrap_or(0.0),
            max_end: next_start.unwrap_or(f64::INFINITY),
            min_duration: config.min_clip_duration,
            scale: config.time_scale(state.zoom_level()),
            snapping: SnappingEngine::new(config.snap_threshold),
            snap_points: SnappingEngine::collect_snap_points(
                state.current_time(),
                previous_end,
                next_start,
            ),
        })
    }

    /// Turn magnetic snapping on or off for the rest of the gesture.
    pub fn with_snapping(mut self, enabled: bool) -> Self {
        self.snapping.enabled = enabled;
        self
    }

    pub fn clip_id(&self) -> Uuid {
        self.clip_id
    }

    /// Track the clip was on when the gesture started.
    pub fn track_id(&self) -> Uuid {
        self.track_id
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Clip bounds at pointer-down.
    pub fn original(&self) -> TimeRange {
        self.original
    }

    /// Snap candidates in priority order.
    pub fn snap_points(&self) -> &[SnapPoint] {
        &self.snap_points
    }

    /// Pointer travel since pointer-down, in seconds.
    pub fn delta(&self, pointer_x: f64) -> f64 {
        self.scale.pixels_to_time(pointer_x - self.anchor_x)
    }

    /// Bounds for a pointer sample: shift the grabbed edge by the pointer
    /// delta, snap it, then clamp it between the track neighbors.
    ///
    /// Returns `None` when the neighbors leave no valid placement.
    pub fn propose(&self, pointer_x: f64) -> Option<DragProposal> {
        let delta = self.delta(pointer_x);
        let TimeRange { start, end } = self.original;
        let duration = end - start;

        let (start_time, end_time, snapped) = match self.mode {
            DragMode::Move => {
                let (value, snapped) = self.snap(start + delta);
                let value = value.max(self.min_start).min(self.max_end - duration);
                (value, value + duration, snapped.filter(|p| p.time == value))
            }
            DragMode::TrimStart => {
                let (value, snapped) = self.snap(start + delta);
                let value = value
                    .max(self.min_start)
                    .min(end - self.min_duration);
                (value, end, snapped.filter(|p| p.time == value))
            }
            DragMode::TrimEnd => {
                let (value, snapped) = self.snap(end + delta);
                let value = value
                    .max(start + self.min_duration)
                    .min(self.max_end);
                (start, value, snapped.filter(|p| p.time == value))
            }
        };

        let fits = start_time >= self.min_start - TIME_EPSILON
            && end_time <= self.max_end + TIME_EPSILON
            && end_time - start_time >= self.min_duration - TIME_EPSILON;
        fits.then_some(DragProposal {
            start_time,
            end_time,
            snapped,
        })
    }

    /// The patch committing a proposal. Trims only touch the dragged edge.
    pub fn patch(&self, proposal: &DragProposal) -> ClipPatch {
        match self.mode {
            DragMode::Move => ClipPatch::bounds(proposal.start_time, proposal.end_time),
            DragMode::TrimStart => ClipPatch::start(proposal.start_time),
            DragMode::TrimEnd => ClipPatch::end(proposal.end_time),
        }
    }

    /// Start time for a drop onto another track. Source track neighbors do
    /// not apply there; the store fits the clip into the destination.
    pub fn drop_start(&self, pointer_x: f64) -> f64 {
        (self.original.start + self.delta(pointer_x)).max(0.0)
    }

    fn snap(&self, time: f64) -> (f64, Option<SnapPoint>) {
        match self.snapping.find_snap(time, &self.snap_points) {
            Some(point) => (point.time, Some(point)),
            None => (time, None),
        }
    }
}
