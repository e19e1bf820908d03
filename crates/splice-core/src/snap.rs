//! Snapping for timeline interactions.
//!
//! Snapping is first-match, not nearest-match: candidates are checked in the
//! order they were collected and the first one within the threshold wins.

use smallvec::SmallVec;

/// Default snap distance in seconds.
pub const SNAP_THRESHOLD: f64 = 0.15;

/// A point on the timeline that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Playhead,
    PreviousClipEnd,
    NextClipStart,
}

/// Candidate list in priority order. Gestures collect at most three.
pub type SnapPoints = SmallVec<[SnapPoint; 4]>;

/// Substitute `time` with the first candidate lying within `threshold`.
pub fn snap_time(time: f64, candidates: &[f64], threshold: f64) -> f64 {
    candidates
        .iter()
        .copied()
        .find(|c| (time - c).abs() <= threshold)
        .unwrap_or(time)
}

/// Engine for computing snap targets.
#[derive(Debug, Clone, Copy)]
pub struct SnappingEngine {
    pub enabled: bool,
    /// Snap distance in seconds.
    pub threshold: f64,
}

impl SnappingEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            enabled: true,
            threshold,
        }
    }

    /// Collect snap points in priority order: playhead, previous neighbor's
    /// end, next neighbor's start.
    pub fn collect_snap_points(
        playhead: f64,
        previous_end: Option<f64>,
        next_start: Option<f64>,
    ) -> SnapPoints {
        let mut points = SnapPoints::new();
        points.push(SnapPoint {
            time: playhead,
            kind: SnapKind::Playhead,
        });
        if let Some(time) = previous_end {
            points.push(SnapPoint {
                time,
                kind: SnapKind::PreviousClipEnd,
            });
        }
        if let Some(time) = next_start {
            points.push(SnapPoint {
                time,
                kind: SnapKind::NextClipStart,
            });
        }
        points
    }

    /// Find the snap point that captures `time`, if any.
    pub fn find_snap(&self, time: f64, points: &[SnapPoint]) -> Option<SnapPoint> {
        if !self.enabled {
            return None;
        }
        points
            .iter()
            .copied()
            .find(|p| (time - p.time).abs() <= self.threshold)
    }

    /// Snapped value of `time`, or `time` itself when nothing is in range.
    pub fn snap(&self, time: f64, points: &[SnapPoint]) -> f64 {
        self.find_snap(time, points).map_or(time, |p| p.time)
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::new(SNAP_THRESHOLD)
    }
}
