//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use splice_core::{Result, SpliceError, TimeRange, TIME_EPSILON};
use uuid::Uuid;

/// A clip on the timeline: a bounded interval of a media source placed on a
/// track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Source media (non-owning)
    pub media_id: Uuid,
    /// Track the clip sits on (non-owning)
    pub track_id: Uuid,
    /// Timeline start in seconds (inclusive)
    pub start_time: f64,
    /// Timeline end in seconds (exclusive)
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub muted: bool,
}

impl Clip {
    /// Create a clip covering `[start_time, end_time)`.
    pub fn new(media_id: Uuid, track_id: Uuid, start_time: f64, end_time: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            media_id,
            track_id,
            start_time,
            end_time,
            playback_rate: None,
            opacity: None,
            muted: false,
        }
    }

    /// Length of the clip on the timeline.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Timeline interval occupied by the clip.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// Copy of this clip with a fresh identity.
    pub fn with_new_id(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Move the clip by `delta`, keeping its duration.
    pub fn shift(&mut self, delta: f64) {
        self.start_time += delta;
        self.end_time += delta;
    }

    /// Pull a start that sits left of zero only by rounding noise back onto
    /// zero, keeping the duration.
    pub fn settle_at_origin(&mut self) {
        if self.start_time < 0.0 && self.start_time >= -TIME_EPSILON {
            self.shift(-self.start_time);
        }
    }

    /// Check the clip's own numeric invariants. References are checked by the
    /// timeline state, which knows the registries.
    pub fn validate(&self, min_duration: f64) -> Result<()> {
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return Err(SpliceError::InvalidClip(format!(
                "clip {} has non-finite bounds",
                self.id
            )));
        }
        if self.start_time < 0.0 {
            return Err(SpliceError::InvalidClip(format!(
                "clip {} starts before zero ({})",
                self.id, self.start_time
            )));
        }
        if self.duration() < min_duration - TIME_EPSILON {
            return Err(SpliceError::InvalidClip(format!(
                "clip {} is shorter than {}s ({} .. {})",
                self.id, min_duration, self.start_time, self.end_time
            )));
        }
        if let Some(rate) = self.playback_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(SpliceError::InvalidClip(format!(
                    "clip {} has invalid playback rate {}",
                    self.id, rate
                )));
            }
        }
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(SpliceError::InvalidClip(format!(
                    "clip {} has opacity {} outside [0, 1]",
                    self.id, opacity
                )));
            }
        }
        Ok(())
    }
}

/// Partial update merged into a clip by `UpdateClipProps`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub track_id: Option<Uuid>,
    pub playback_rate: Option<f64>,
    pub opacity: Option<f64>,
    pub muted: Option<bool>,
}

impl ClipPatch {
    /// Patch that moves a clip to `[start, end)`.
    pub fn bounds(start: f64, end: f64) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
            ..Default::default()
        }
    }

    /// Patch that only changes the start.
    pub fn start(start: f64) -> Self {
        Self {
            start_time: Some(start),
            ..Default::default()
        }
    }

    /// Patch that only changes the end.
    pub fn end(end: f64) -> Self {
        Self {
            end_time: Some(end),
            ..Default::default()
        }
    }

    /// Return the merged clip. A start below zero by rounding noise lands
    /// on zero.
    pub fn merged_into(&self, clip: &Clip) -> Clip {
        let mut out = clip.clone();
        if let Some(v) = self.start_time {
            out.start_time = v;
        }
        if let Some(v) = self.end_time {
            out.end_time = v;
        }
        if let Some(v) = self.track_id {
            out.track_id = v;
        }
        if let Some(v) = self.playback_rate {
            out.playback_rate = Some(v);
        }
        if let Some(v) = self.opacity {
            out.opacity = Some(v);
        }
        if let Some(v) = self.muted {
            out.muted = v;
        }
        out.settle_at_origin();
        out
    }
}
