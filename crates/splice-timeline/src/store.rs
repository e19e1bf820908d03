//! The timeline store: single source of truth for the editing session.
//!
//! Owns the current snapshot, the undo history and the playback clock. Every
//! write goes through [`TimelineStore::execute`], which applies a command to
//! the current snapshot and swaps in the result in one step.

use std::sync::Arc;
use std::time::Instant;

use splice_core::{Result, SpliceError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clip::{Clip, ClipPatch};
use crate::config::TimelineConfig;
use crate::edit::{EditCommand, EditOutcome};
use crate::history::UndoStack;
use crate::media::{MediaKind, MediaReference, MediaResolver};
use crate::playback::{FrameTicket, PlaybackClock, Tick};
use crate::render::SequenceRenderer;
use crate::serialization::ProjectSnapshot;
use crate::state::TimelineState;

/// Mutable owner of the authoritative timeline state.
#[derive(Debug)]
pub struct TimelineStore {
    state: Arc<TimelineState>,
    config: TimelineConfig,
    history: UndoStack,
    playback: PlaybackClock,
}

impl TimelineStore {
    /// Create an empty store. Fails when the config is unusable.
    pub fn new(config: TimelineConfig) -> Result<Self> {
        config.validate()?;
        let state = TimelineState::new(config.empty_duration_floor);
        Ok(Self::assemble(state, config))
    }

    fn assemble(state: TimelineState, config: TimelineConfig) -> Self {
        Self {
            state: Arc::new(state),
            history: UndoStack::new(config.history_depth),
            config,
            playback: PlaybackClock::new(),
        }
    }

    /// Load persisted edit data, validating it first.
    pub fn from_snapshot(snapshot: ProjectSnapshot, config: TimelineConfig) -> Result<Self> {
        config.validate()?;
        let state = TimelineState::from_snapshot(snapshot, &config)?;
        info!(
            clips = state.clips().len(),
            tracks = state.tracks().len(),
            "loaded timeline"
        );
        Ok(Self::assemble(state, config))
    }

    /// Current snapshot. Cheap; later edits do not affect it.
    pub fn snapshot(&self) -> Arc<TimelineState> {
        Arc::clone(&self.state)
    }

    /// Borrow the current state.
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Apply a command and publish the result.
    ///
    /// Returns `Ok(true)` when the state changed, `Ok(false)` for a no-op
    /// (including stale ids) and `Err` when the edit would break an
    /// invariant. On `Err` the previous state stays current.
    pub fn execute(&mut self, command: EditCommand) -> Result<bool> {
        match command.apply(&self.state, &self.config) {
            Ok(EditOutcome::Changed(next)) => {
                if command.is_undoable() {
                    self.history.push(Arc::clone(&self.state));
                }
                debug!(command = command.label(), duration = next.duration(), "edit applied");
                self.state = Arc::new(next);
                Ok(true)
            }
            Ok(EditOutcome::Unchanged) => Ok(false),
            Err(err) => {
                warn!(command = command.label(), %err, "edit rejected");
                Err(err)
            }
        }
    }

    // ── Media & import ─────────────────────────────────────────

    /// Register a media reference without placing it.
    pub fn add_media(&mut self, media: MediaReference) -> Result<bool> {
        self.execute(EditCommand::AddMedia { media })
    }

    /// Register media and place a clip for it. Returns the new clip's id.
    pub fn import_media(&mut self, media: MediaReference) -> Result<Uuid> {
        let clip_id = Uuid::new_v4();
        info!(media = %media.id, name = %media.name, duration = media.duration, "importing media");
        self.execute(EditCommand::ImportMedia { media, clip_id })?;
        Ok(clip_id)
    }

    /// Import media whose duration comes from an external resolver.
    ///
    /// A resolver that cannot find the media is reported as
    /// [`SpliceError::MediaUnavailable`] rather than ignored.
    pub fn import_resolved<R: MediaResolver + ?Sized>(
        &mut self,
        resolver: &R,
        media_id: Uuid,
        name: impl Into<String>,
        kind: MediaKind,
    ) -> Result<Uuid> {
        let resolved = resolver.resolve(media_id).ok_or_else(|| {
            SpliceError::MediaUnavailable(format!("resolver has no media {}", media_id))
        })?;
        let media = MediaReference {
            id: media_id,
            name: name.into(),
            kind,
            duration: resolved.duration,
        };
        self.import_media(media)
    }

    /// Place a clip for registered media using the placement policy.
    pub fn add_clip(&mut self, clip: Clip) -> Result<bool> {
        self.execute(EditCommand::AddClip { clip })
    }

    pub fn remove_media(&mut self, media_id: Uuid) -> Result<bool> {
        self.execute(EditCommand::RemoveMedia { media_id })
    }

    // ── Clip edits ─────────────────────────────────────────────

    pub fn update_clip_props(&mut self, clip_id: Uuid, patch: ClipPatch) -> Result<bool> {
        self.execute(EditCommand::UpdateClipProps { clip_id, patch })
    }

    pub fn delete_clip(&mut self, clip_id: Uuid) -> Result<bool> {
        self.execute(EditCommand::DeleteClip { clip_id })
    }

    /// Duplicate a clip. Returns the copy's id, or `None` if the source is
    /// gone.
    pub fn duplicate_clip(&mut self, clip_id: Uuid) -> Result<Option<Uuid>> {
        let new_id = Uuid::new_v4();
        let changed = self.execute(EditCommand::DuplicateClip { clip_id, new_id })?;
        Ok(changed.then_some(new_id))
    }

    pub fn split_clip_at_time(&mut self, time: f64) -> Result<bool> {
        self.execute(EditCommand::SplitAtTime { time })
    }

    pub fn toggle_clip_mute(&mut self, clip_id: Uuid) -> Result<bool> {
        self.execute(EditCommand::ToggleClipMute { clip_id })
    }

    pub fn move_clip_to_track(
        &mut self,
        clip_id: Uuid,
        track_id: Uuid,
        start_time: f64,
    ) -> Result<bool> {
        self.execute(EditCommand::MoveClipToTrack {
            clip_id,
            track_id,
            start_time,
        })
    }

    pub fn remove_track(&mut self, track_id: Uuid) -> Result<bool> {
        self.execute(EditCommand::RemoveTrack { track_id })
    }

    // ── Selection & view ───────────────────────────────────────

    pub fn select_clip(&mut self, clip_id: Option<Uuid>) -> bool {
        self.execute_infallible(EditCommand::SelectClip { clip_id })
    }

    pub fn set_dragging(&mut self, clip_id: Option<Uuid>) -> bool {
        self.execute_infallible(EditCommand::SetDragging { clip_id })
    }

    /// Seek. Legal while playing; does not change the play state.
    pub fn set_current_time(&mut self, time: f64) -> bool {
        self.execute_infallible(EditCommand::SetCurrentTime { time })
    }

    pub fn set_zoom_level(&mut self, zoom: f64) -> bool {
        self.execute_infallible(EditCommand::SetZoomLevel { zoom })
    }

    fn execute_infallible(&mut self, command: EditCommand) -> bool {
        // These commands only touch plain fields and cannot fail validation.
        self.execute(command).unwrap_or(false)
    }

    // ── History ────────────────────────────────────────────────

    /// Restore the edit data before the last recorded edit. Cursor, zoom and
    /// selection stay where they are.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(Arc::clone(&self.state)) else {
            return false;
        };
        self.state = Arc::new(self.state.with_edit_data_from(&previous));
        debug!(remaining = self.history.undo_count(), "undo");
        true
    }

    /// Re-apply the last undone edit.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(Arc::clone(&self.state)) else {
            return false;
        };
        self.state = Arc::new(self.state.with_edit_data_from(&next));
        debug!(remaining = self.history.redo_count(), "redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Playback ───────────────────────────────────────────────

    /// Check if playback is running.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Start playback. Returns the ticket for the new callback chain, or
    /// `None` when already playing.
    pub fn play(&mut self, now: Instant) -> Option<FrameTicket> {
        let ticket = self.playback.start(now)?;
        info!(at = self.state.current_time(), "playback started");
        Some(ticket)
    }

    /// Ticket of the running callback chain, so a host that did not start
    /// playback can take over driving it.
    pub fn playback_ticket(&self) -> Option<FrameTicket> {
        self.playback.current_ticket()
    }

    /// Stop playback, keeping the cursor where it is.
    pub fn pause(&mut self) {
        if self.playback.stop() {
            info!(at = self.state.current_time(), "playback paused");
        }
    }

    /// Frame callback: advance the cursor by the time measured since the
    /// previous callback of this chain.
    pub fn advance(&mut self, ticket: FrameTicket, now: Instant) -> Tick {
        let Some(delta) = self.playback.elapsed(ticket, now) else {
            return Tick::Stale;
        };
        let duration = self.state.duration();
        let target = self.state.current_time() + delta;
        if target >= duration {
            self.playback.stop();
            self.write_cursor(duration);
            info!(at = duration, "playback reached end");
            return Tick::Ended;
        }
        self.write_cursor(target);
        Tick::Continue(ticket)
    }

    fn write_cursor(&mut self, time: f64) {
        if self.state.current_time() != time {
            Arc::make_mut(&mut self.state).current_time = time;
        }
    }

    // ── Export ─────────────────────────────────────────────────

    /// Copy of the current edit data for persistence or rendering.
    pub fn export_snapshot(&self) -> ProjectSnapshot {
        self.state.to_snapshot()
    }

    /// Hand the current snapshot to a renderer. The timeline is not changed
    /// whether or not rendering succeeds.
    pub fn export_with<R: SequenceRenderer>(&self, renderer: &R) -> Result<R::Output> {
        let snapshot = self.export_snapshot();
        if snapshot.clips.is_empty() {
            return Err(SpliceError::NothingToExport);
        }
        renderer.render(&snapshot).map_err(|e| {
            warn!(error = %e, "export failed");
            SpliceError::Export(e.to_string())
        })
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        let config = TimelineConfig::default();
        Self::assemble(TimelineState::new(config.empty_duration_floor), config)
    }
}
