//! The authoritative timeline snapshot.
//!
//! A [`TimelineState`] is never mutated in place by callers. Edit commands
//! clone it, change the clone and hand back the new snapshot, so a reader
//! holding an older `Arc<TimelineState>` always sees a consistent picture.

use std::cmp::Ordering;

use splice_core::{clamp_time, Result, SpliceError, TimeRange, TIME_EPSILON};
use uuid::Uuid;

use crate::clip::Clip;
use crate::media::{MediaReference, MediaResolver, ResolvedMedia};
use crate::track::Track;

/// Clips directly before and after a clip on its track.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    /// Latest clip ending at or before the clip's start.
    pub previous: Option<&'a Clip>,
    /// Earliest clip starting at or after the clip's end.
    pub next: Option<&'a Clip>,
}

impl Neighbors<'_> {
    pub fn previous_end(&self) -> Option<f64> {
        self.previous.map(|c| c.end_time)
    }

    pub fn next_start(&self) -> Option<f64> {
        self.next.map(|c| c.start_time)
    }
}

/// Media registry, tracks, clips and the playback cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineState {
    pub(crate) media: Vec<MediaReference>,
    pub(crate) tracks: Vec<Track>,
    pub(crate) clips: Vec<Clip>,
    /// Cached `max(end_time)`, or `duration_floor` with no clips.
    pub(crate) duration: f64,
    pub(crate) duration_floor: f64,
    pub(crate) current_time: f64,
    pub(crate) zoom_level: f64,
    pub(crate) selected_clip_id: Option<Uuid>,
    pub(crate) dragging_clip_id: Option<Uuid>,
}

impl TimelineState {
    /// Empty timeline whose duration falls back to `duration_floor`.
    pub fn new(duration_floor: f64) -> Self {
        Self {
            media: Vec::new(),
            tracks: Vec::new(),
            clips: Vec::new(),
            duration: duration_floor,
            duration_floor,
            current_time: 0.0,
            zoom_level: 1.0,
            selected_clip_id: None,
            dragging_clip_id: None,
        }
    }

    // ── Reads ───────────────────────────────────────────────────

    pub fn media(&self) -> &[MediaReference] {
        &self.media
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Sequence duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playhead position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// The raw selection, which may name a clip that no longer exists.
    pub fn selected_clip_id(&self) -> Option<Uuid> {
        self.selected_clip_id
    }

    /// The selected clip, or `None` when the selection is empty or stale.
    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected_clip_id.and_then(|id| self.clip(id))
    }

    /// The clip being dragged, or `None` when no gesture is active or the
    /// clip was deleted mid-gesture.
    pub fn dragging_clip(&self) -> Option<&Clip> {
        self.dragging_clip_id.and_then(|id| self.clip(id))
    }

    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn media_ref(&self, id: Uuid) -> Option<&MediaReference> {
        self.media.iter().find(|m| m.id == id)
    }

    /// Clips on a track sorted by start time.
    pub fn track_clips(&self, track_id: Uuid) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self
            .clips
            .iter()
            .filter(|c| c.track_id == track_id)
            .collect();
        clips.sort_by(|a, b| by_start(a, b));
        clips
    }

    /// Track neighbors of a clip. Unknown ids have no neighbors.
    pub fn neighbors(&self, clip_id: Uuid) -> Neighbors<'_> {
        let Some(clip) = self.clip(clip_id) else {
            return Neighbors::default();
        };
        let siblings: Vec<&Clip> = self
            .track_clips(clip.track_id)
            .into_iter()
            .filter(|c| c.id != clip_id)
            .collect();
        Neighbors {
            previous: siblings
                .iter()
                .rev()
                .find(|c| c.end_time <= clip.start_time + TIME_EPSILON)
                .copied(),
            next: siblings
                .iter()
                .find(|c| c.start_time >= clip.end_time - TIME_EPSILON)
                .copied(),
        }
    }

    /// Latest clip end across every track, zero when empty.
    pub fn global_end(&self) -> f64 {
        self.clips.iter().map(|c| c.end_time).fold(0.0, f64::max)
    }

    /// Latest clip end on one track, zero when the track is empty.
    pub fn track_end(&self, track_id: Uuid) -> f64 {
        self.clips
            .iter()
            .filter(|c| c.track_id == track_id)
            .map(|c| c.end_time)
            .fold(0.0, f64::max)
    }

    // ── Derived values ──────────────────────────────────────────

    /// Re-derive the duration and keep the cursor inside `[0, duration]`.
    pub(crate) fn recompute(&mut self) {
        self.duration = if self.clips.is_empty() {
            self.duration_floor
        } else {
            self.global_end()
        };
        self.current_time = clamp_time(self.current_time, self.duration);
    }

    /// Replace media, tracks and clips with another snapshot's, keeping this
    /// snapshot's cursor, zoom and selection.
    pub(crate) fn with_edit_data_from(&self, other: &TimelineState) -> TimelineState {
        let mut next = self.clone();
        next.media = other.media.clone();
        next.tracks = other.tracks.clone();
        next.clips = other.clips.clone();
        next.recompute();
        next
    }

    // ── Validation ──────────────────────────────────────────────

    /// Check a clip's numeric invariants and that its references resolve.
    pub fn validate_clip(&self, clip: &Clip, min_duration: f64) -> Result<()> {
        clip.validate(min_duration)?;
        if self.media_ref(clip.media_id).is_none() {
            return Err(SpliceError::MediaNotFound(clip.media_id));
        }
        if self.track(clip.track_id).is_none() {
            return Err(SpliceError::TrackNotFound(clip.track_id));
        }
        Ok(())
    }

    /// Check that no two clips on a track overlap.
    pub fn check_track(&self, track_id: Uuid) -> Result<()> {
        let clips = self.track_clips(track_id);
        for pair in clips.windows(2) {
            if pair[0].range().overlaps(pair[1].range()) {
                return Err(SpliceError::Overlap {
                    clip: pair[1].id,
                    other: pair[0].id,
                    track: track_id,
                });
            }
        }
        Ok(())
    }

    /// Full consistency check, used when rebuilding a state from outside data.
    pub fn validate(&self, min_duration: f64) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        let ids = self
            .media
            .iter()
            .map(|m| m.id)
            .chain(self.tracks.iter().map(|t| t.id))
            .chain(self.clips.iter().map(|c| c.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(SpliceError::DuplicateId(id));
            }
        }
        for media in &self.media {
            media.validate()?;
        }
        for clip in &self.clips {
            self.validate_clip(clip, min_duration)?;
        }
        for track in &self.tracks {
            self.check_track(track.id)?;
        }
        Ok(())
    }

    /// Start time for a clip of `duration` on `track_id` closest to
    /// `requested` that fits in a free gap. `exclude` is ignored as an
    /// obstacle so a clip can be re-placed on its own track.
    pub fn nearest_free_start(
        &self,
        track_id: Uuid,
        exclude: Option<Uuid>,
        requested: f64,
        duration: f64,
    ) -> f64 {
        let requested = requested.max(0.0);
        let mut occupied: Vec<TimeRange> = self
            .clips
            .iter()
            .filter(|c| c.track_id == track_id && Some(c.id) != exclude)
            .map(Clip::range)
            .collect();
        occupied.sort_by(|a, b| a.start.total_cmp(&b.start));
        occupied.push(TimeRange::new(f64::INFINITY, f64::INFINITY));

        let mut best: Option<(f64, f64)> = None;
        let mut gap_start = 0.0_f64;
        for range in occupied {
            let gap_end = range.start;
            if gap_end - gap_start >= duration - TIME_EPSILON {
                let start = requested.min(gap_end - duration).max(gap_start);
                let distance = (start - requested).abs();
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, start));
                }
            }
            gap_start = gap_start.max(range.end);
        }
        best.map_or(requested, |(_, start)| start)
    }
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl MediaResolver for TimelineState {
    fn resolve(&self, media_id: Uuid) -> Option<ResolvedMedia> {
        self.media.as_slice().resolve(media_id)
    }
}

fn by_start(a: &Clip, b: &Clip) -> Ordering {
    a.start_time
        .total_cmp(&b.start_time)
        .then_with(|| a.end_time.total_cmp(&b.end_time))
}
