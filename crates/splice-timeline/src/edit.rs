//! Edit operations.
//!
//! Every mutation is an `EditCommand`. Applying a command reads one
//! [`TimelineState`] and yields a new one; the input is never touched, so a
//! failed or partial edit cannot leak into the committed timeline.

use splice_core::{clamp_time, Result, SpliceError, TIME_EPSILON};
use tracing::debug;
use uuid::Uuid;

use crate::clip::{Clip, ClipPatch};
use crate::config::{Placement, TimelineConfig, TrackAllocation};
use crate::media::MediaReference;
use crate::state::TimelineState;
use crate::track::Track;

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The command produced a different state.
    Changed(TimelineState),
    /// The command had no effect (including stale ids).
    Unchanged,
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// A timeline mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Register a media reference.
    AddMedia { media: MediaReference },
    /// Register a media reference and place a clip covering all of it.
    ImportMedia {
        media: MediaReference,
        /// Id given to the placed clip.
        clip_id: Uuid,
    },
    /// Place a clip for already registered media. Only the clip's id,
    /// media, duration and properties are used; track and start come from
    /// the placement policy.
    AddClip { clip: Clip },
    /// Merge fields into a clip, rippling same-track clips on end changes.
    UpdateClipProps { clip_id: Uuid, patch: ClipPatch },
    /// Remove a clip. The gap it leaves stays open.
    DeleteClip { clip_id: Uuid },
    /// Copy a clip to directly after itself.
    DuplicateClip { clip_id: Uuid, new_id: Uuid },
    /// Cut every clip under `time`, on all tracks.
    SplitAtTime { time: f64 },
    /// Flip a clip's muted flag.
    ToggleClipMute { clip_id: Uuid },
    /// Reassign a clip to a track and start time, keeping its duration.
    MoveClipToTrack {
        clip_id: Uuid,
        track_id: Uuid,
        start_time: f64,
    },
    /// Set or clear the selection. Not validated.
    SelectClip { clip_id: Option<Uuid> },
    /// Set or clear the clip under an active drag gesture. Not validated.
    SetDragging { clip_id: Option<Uuid> },
    /// Remove a track together with its clips.
    RemoveTrack { track_id: Uuid },
    /// Remove a media reference no clip uses any more.
    RemoveMedia { media_id: Uuid },
    /// Seek the playhead.
    SetCurrentTime { time: f64 },
    /// Change the zoom factor.
    SetZoomLevel { zoom: f64 },
    /// A batch of commands applied atomically.
    Batch(Vec<EditCommand>),
}

impl EditCommand {
    /// Import command with a fresh clip id.
    pub fn import(media: MediaReference) -> Self {
        Self::ImportMedia {
            media,
            clip_id: Uuid::new_v4(),
        }
    }

    /// Duplicate command with a fresh id for the copy.
    pub fn duplicate(clip_id: Uuid) -> Self {
        Self::DuplicateClip {
            clip_id,
            new_id: Uuid::new_v4(),
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddMedia { .. } => "add_media",
            Self::ImportMedia { .. } => "import_media",
            Self::AddClip { .. } => "add_clip",
            Self::UpdateClipProps { .. } => "update_clip_props",
            Self::DeleteClip { .. } => "delete_clip",
            Self::DuplicateClip { .. } => "duplicate_clip",
            Self::SplitAtTime { .. } => "split_at_time",
            Self::ToggleClipMute { .. } => "toggle_clip_mute",
            Self::MoveClipToTrack { .. } => "move_clip_to_track",
            Self::SelectClip { .. } => "select_clip",
            Self::SetDragging { .. } => "set_dragging",
            Self::RemoveTrack { .. } => "remove_track",
            Self::RemoveMedia { .. } => "remove_media",
            Self::SetCurrentTime { .. } => "set_current_time",
            Self::SetZoomLevel { .. } => "set_zoom_level",
            Self::Batch(_) => "batch",
        }
    }

    /// Whether the command changes edit data and belongs in undo history.
    pub fn is_undoable(&self) -> bool {
        match self {
            Self::SelectClip { .. }
            | Self::SetDragging { .. }
            | Self::SetCurrentTime { .. }
            | Self::SetZoomLevel { .. } => false,
            Self::Batch(commands) => commands.iter().any(Self::is_undoable),
            _ => true,
        }
    }

    /// Apply this command to a snapshot.
    ///
    /// Stale ids give [`EditOutcome::Unchanged`]. Edits that would break an
    /// invariant give an error and the input state remains authoritative.
    pub fn apply(&self, state: &TimelineState, config: &TimelineConfig) -> Result<EditOutcome> {
        match self.try_apply(state, config) {
            Ok(next) if next == *state => Ok(EditOutcome::Unchanged),
            Ok(next) => Ok(EditOutcome::Changed(next)),
            Err(err) if err.is_reference() => {
                debug!(command = self.label(), %err, "ignoring edit on stale reference");
                Ok(EditOutcome::Unchanged)
            }
            Err(err) => Err(err),
        }
    }

    fn try_apply(&self, state: &TimelineState, config: &TimelineConfig) -> Result<TimelineState> {
        let mut next = state.clone();
        match self {
            Self::AddMedia { media } => {
                register_media(&mut next, media)?;
            }
            Self::ImportMedia { media, clip_id } => {
                register_media(&mut next, media)?;
                let mut clip = Clip::new(media.id, Uuid::nil(), 0.0, media.duration);
                clip.id = *clip_id;
                place_clip(&mut next, clip, config)?;
            }
            Self::AddClip { clip } => {
                place_clip(&mut next, clip.clone(), config)?;
            }
            Self::UpdateClipProps { clip_id, patch } => {
                update_clip(&mut next, *clip_id, patch, config)?;
            }
            Self::DeleteClip { clip_id } => {
                let before = next.clips.len();
                next.clips.retain(|c| c.id != *clip_id);
                if next.clips.len() == before {
                    return Err(SpliceError::ClipNotFound(*clip_id));
                }
            }
            Self::DuplicateClip { clip_id, new_id } => {
                duplicate_clip(&mut next, *clip_id, *new_id)?;
            }
            Self::SplitAtTime { time } => {
                split_at(&mut next, *time, config.min_clip_duration);
            }
            Self::ToggleClipMute { clip_id } => {
                let clip = next
                    .clips
                    .iter_mut()
                    .find(|c| c.id == *clip_id)
                    .ok_or(SpliceError::ClipNotFound(*clip_id))?;
                clip.muted = !clip.muted;
            }
            Self::MoveClipToTrack {
                clip_id,
                track_id,
                start_time,
            } => {
                move_to_track(&mut next, *clip_id, *track_id, *start_time, config)?;
            }
            Self::SelectClip { clip_id } => {
                next.selected_clip_id = *clip_id;
            }
            Self::SetDragging { clip_id } => {
                next.dragging_clip_id = *clip_id;
            }
            Self::RemoveTrack { track_id } => {
                if next.track(*track_id).is_none() {
                    return Err(SpliceError::TrackNotFound(*track_id));
                }
                next.tracks.retain(|t| t.id != *track_id);
                next.clips.retain(|c| c.track_id != *track_id);
            }
            Self::RemoveMedia { media_id } => {
                if next.media_ref(*media_id).is_none() {
                    return Err(SpliceError::MediaNotFound(*media_id));
                }
                if next.clips.iter().any(|c| c.media_id == *media_id) {
                    return Err(SpliceError::MediaInUse(*media_id));
                }
                next.media.retain(|m| m.id != *media_id);
            }
            Self::SetCurrentTime { time } => {
                next.current_time = clamp_time(*time, next.duration);
            }
            Self::SetZoomLevel { zoom } => {
                next.zoom_level = config.clamp_zoom(*zoom);
            }
            Self::Batch(commands) => {
                for command in commands {
                    if let EditOutcome::Changed(state) = command.apply(&next, config)? {
                        next = state;
                    }
                }
            }
        }
        next.recompute();
        Ok(next)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn register_media(state: &mut TimelineState, media: &MediaReference) -> Result<()> {
    media.validate()?;
    if state.media_ref(media.id).is_some() {
        return Err(SpliceError::DuplicateId(media.id));
    }
    state.media.push(media.clone());
    Ok(())
}

/// Put a clip on the track and at the start chosen by the placement policy.
fn place_clip(state: &mut TimelineState, mut clip: Clip, config: &TimelineConfig) -> Result<()> {
    let kind = state
        .media_ref(clip.media_id)
        .map(|m| m.kind)
        .ok_or(SpliceError::MediaNotFound(clip.media_id))?;
    if state.clip(clip.id).is_some() {
        return Err(SpliceError::DuplicateId(clip.id));
    }
    let duration = clip.duration();

    let existing = match config.placement.track {
        TrackAllocation::NewTrackPerImport => None,
        TrackAllocation::ReuseFirstOfKind => {
            state.tracks.iter().find(|t| t.kind == kind).map(|t| t.id)
        }
    };
    let track_id = match existing {
        Some(id) => id,
        None => {
            let track = Track::new(kind);
            let id = track.id;
            state.tracks.push(track);
            id
        }
    };

    let start = match config.placement.position {
        Placement::GlobalTail => state.global_end(),
        Placement::TrackTail => state.track_end(track_id),
    };
    clip.track_id = track_id;
    clip.start_time = start;
    clip.end_time = start + duration;

    state.validate_clip(&clip, config.min_clip_duration)?;
    debug!(clip = %clip.id, track = %track_id, start, duration, "placed clip");
    state.clips.push(clip);
    state.check_track(track_id)
}

fn update_clip(
    state: &mut TimelineState,
    clip_id: Uuid,
    patch: &ClipPatch,
    config: &TimelineConfig,
) -> Result<()> {
    let target = state
        .clip(clip_id)
        .ok_or(SpliceError::ClipNotFound(clip_id))?
        .clone();
    if let Some(track_id) = patch.track_id {
        if state.track(track_id).is_none() {
            return Err(SpliceError::TrackNotFound(track_id));
        }
    }
    let updated = patch.merged_into(&target);
    state.validate_clip(&updated, config.min_clip_duration)?;

    let ripple = patch.end_time.map(|_| updated.end_time - target.end_time);
    for clip in state.clips.iter_mut() {
        if clip.id == clip_id {
            *clip = updated.clone();
        } else if let Some(delta) = ripple {
            if clip.track_id == target.track_id
                && clip.start_time >= target.end_time - TIME_EPSILON
            {
                clip.shift(delta);
            }
        }
    }
    if let Some(delta) = ripple.filter(|d| *d != 0.0) {
        debug!(clip = %clip_id, delta, "rippled downstream clips");
    }

    state.check_track(target.track_id)?;
    if updated.track_id != target.track_id {
        state.check_track(updated.track_id)?;
    }
    Ok(())
}

fn duplicate_clip(state: &mut TimelineState, clip_id: Uuid, new_id: Uuid) -> Result<()> {
    let source = state
        .clip(clip_id)
        .ok_or(SpliceError::ClipNotFound(clip_id))?
        .clone();
    if state.clip(new_id).is_some() {
        return Err(SpliceError::DuplicateId(new_id));
    }
    let duration = source.duration();
    let copy = Clip {
        id: new_id,
        start_time: source.end_time,
        end_time: source.end_time + duration,
        ..source.clone()
    };

    // Make room when the copy lands on the next clip.
    let downstream = |c: &Clip| {
        c.id != source.id
            && c.track_id == source.track_id
            && c.start_time >= source.end_time - TIME_EPSILON
    };
    let first_downstream = state
        .clips
        .iter()
        .filter(|c| downstream(c))
        .map(|c| c.start_time)
        .fold(f64::INFINITY, f64::min);
    let push = copy.end_time - first_downstream;
    if push > 0.0 {
        for clip in state.clips.iter_mut().filter(|c| downstream(c)) {
            clip.shift(push);
        }
        debug!(clip = %clip_id, push, "shifted clips to fit duplicate");
    }

    state.clips.push(copy);
    state.check_track(source.track_id)
}

/// Cut clips strictly containing `time`. A clip is left whole when either
/// half would fall under the minimum duration.
fn split_at(state: &mut TimelineState, time: f64, min_duration: f64) {
    let mut result = Vec::with_capacity(state.clips.len() + 2);
    for clip in state.clips.drain(..) {
        let splittable = clip.range().strictly_contains(time)
            && time - clip.start_time >= min_duration - TIME_EPSILON
            && clip.end_time - time >= min_duration - TIME_EPSILON;
        if splittable {
            let mut left = clip.with_new_id();
            left.end_time = time;
            let mut right = clip.with_new_id();
            right.start_time = time;
            result.push(left);
            result.push(right);
        } else {
            result.push(clip);
        }
    }
    state.clips = result;
}

fn move_to_track(
    state: &mut TimelineState,
    clip_id: Uuid,
    track_id: Uuid,
    start_time: f64,
    config: &TimelineConfig,
) -> Result<()> {
    let duration = state
        .clip(clip_id)
        .ok_or(SpliceError::ClipNotFound(clip_id))?
        .duration();
    if state.track(track_id).is_none() {
        return Err(SpliceError::TrackNotFound(track_id));
    }
    let start = state.nearest_free_start(track_id, Some(clip_id), start_time, duration);
    if (start - start_time).abs() > TIME_EPSILON {
        debug!(clip = %clip_id, requested = start_time, start, "moved clip into free slot");
    }

    let clip = state
        .clips
        .iter_mut()
        .find(|c| c.id == clip_id)
        .ok_or(SpliceError::ClipNotFound(clip_id))?;
    clip.track_id = track_id;
    clip.start_time = start;
    clip.end_time = start + duration;
    let moved = clip.clone();

    state.validate_clip(&moved, config.min_clip_duration)?;
    state.check_track(track_id)
}

// ── Tests ───────────────────────────────────────────────────────
