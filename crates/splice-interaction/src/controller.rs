//! Gesture controller.
//!
//! `Idle -> Dragging | Scrubbing -> Idle`, driven by discrete pointer
//! samples. The controller owns no timeline data: it reads the store at
//! pointer-down and commits each sample back through the store's edit
//! operations.

use splice_core::Result;
use splice_timeline::TimelineStore;
use tracing::debug;
use uuid::Uuid;

use crate::drag::{DragMode, DragSession};
use crate::hit_test::TrackHitTest;
use crate::scrub::PlayheadScrub;

/// Where the gesture state machine is.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragSession),
    Scrubbing(PlayheadScrub),
}

/// Translates pointer events on clips into store edits.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: GestureState,
    snapping: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            snapping: true,
        }
    }

    /// Enable or disable snapping for gestures started from now on.
    pub fn set_snapping(&mut self, enabled: bool) {
        self.snapping = enabled;
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub fn is_scrubbing(&self) -> bool {
        matches!(self.state, GestureState::Scrubbing(_))
    }

    /// The active drag session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            GestureState::Dragging(session) => Some(session),
            GestureState::Idle | GestureState::Scrubbing(_) => None,
        }
    }

    /// Click on the ruler or empty track area: move the playhead there.
    ///
    /// Playback keeps running or stays paused. Ignored while a gesture is in
    /// progress.
    pub fn seek_at(
        &mut self,
        store: &mut TimelineStore,
        pointer_x: f64,
        scroll_x: f64,
    ) -> bool {
        if !matches!(self.state, GestureState::Idle) {
            return false;
        }
        let scrub = PlayheadScrub::begin(store.state(), store.config(), scroll_x);
        let time = scrub.time_at(pointer_x);
        debug!(time, "seek");
        store.set_current_time(time)
    }

    /// Pointer pressed on the playhead. Starts a scrub and seeks to the
    /// pointer; later samples keep seeking until release.
    pub fn scrub_down(
        &mut self,
        store: &mut TimelineStore,
        pointer_x: f64,
        scroll_x: f64,
    ) -> bool {
        self.cancel(store);
        let scrub = PlayheadScrub::begin(store.state(), store.config(), scroll_x);
        debug!(scroll_x = scrub.scroll_x(), "scrub started");
        self.state = GestureState::Scrubbing(scrub);
        store.set_current_time(scrub.time_at(pointer_x))
    }

    /// Pointer pressed on a clip. Selects it and starts a gesture.
    ///
    /// Returns `false` when the clip no longer exists. A gesture already in
    /// progress is abandoned.
    pub fn pointer_down(
        &mut self,
        store: &mut TimelineStore,
        clip_id: Uuid,
        mode: DragMode,
        pointer_x: f64,
    ) -> bool {
        self.cancel(store);
        let Some(session) =
            DragSession::begin(store.state(), store.config(), clip_id, mode, pointer_x)
        else {
            debug!(clip = %clip_id, "pointer down on missing clip");
            return false;
        };
        let session = session.with_snapping(self.snapping);

        store.select_clip(Some(clip_id));
        store.set_dragging(Some(clip_id));
        debug!(clip = %clip_id, ?mode, "gesture started");
        self.state = GestureState::Dragging(session);
        true
    }

    /// Pointer moved during a gesture: commit the clamped proposal, or move
    /// the playhead while scrubbing.
    ///
    /// Returns `Ok(false)` when idle, when nothing changed, or when the clip
    /// vanished mid-gesture.
    pub fn pointer_move(&mut self, store: &mut TimelineStore, pointer_x: f64) -> Result<bool> {
        let session = match &self.state {
            GestureState::Idle => return Ok(false),
            GestureState::Scrubbing(scrub) => {
                return Ok(store.set_current_time(scrub.time_at(pointer_x)));
            }
            GestureState::Dragging(session) => session,
        };
        let Some(proposal) = session.propose(pointer_x) else {
            return Ok(false);
        };
        store.update_clip_props(session.clip_id(), session.patch(&proposal))
    }

    /// Pointer released. A body drag dropped over another track moves the
    /// clip there; anything else ends with a same-track update. A scrub
    /// ends with a last seek.
    ///
    /// The gesture is over afterwards even if the final edit is rejected.
    pub fn pointer_up<H>(
        &mut self,
        store: &mut TimelineStore,
        hit_test: &H,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Result<bool>
    where
        H: TrackHitTest + ?Sized,
    {
        let session = match std::mem::take(&mut self.state) {
            GestureState::Idle => return Ok(false),
            GestureState::Scrubbing(scrub) => {
                debug!("scrub ended");
                return Ok(store.set_current_time(scrub.time_at(pointer_x)));
            }
            GestureState::Dragging(session) => session,
        };
        store.set_dragging(None);

        let clip_id = session.clip_id();
        let destination = match session.mode() {
            DragMode::Move => hit_test
                .track_at(store.state(), pointer_x, pointer_y)
                .filter(|track| *track != session.track_id()),
            DragMode::TrimStart | DragMode::TrimEnd => None,
        };

        if let Some(track_id) = destination {
            let start = session.drop_start(pointer_x);
            debug!(clip = %clip_id, track = %track_id, start, "dropped on another track");
            return store.move_clip_to_track(clip_id, track_id, start);
        }

        debug!(clip = %clip_id, "gesture ended");
        match session.propose(pointer_x) {
            Some(proposal) => store.update_clip_props(clip_id, session.patch(&proposal)),
            None => Ok(false),
        }
    }

    /// Abandon the gesture without a final edit. Samples already committed
    /// stay committed.
    pub fn cancel(&mut self, store: &mut TimelineStore) {
        match std::mem::take(&mut self.state) {
            GestureState::Dragging(session) => {
                debug!(clip = %session.clip_id(), "gesture cancelled");
                store.set_dragging(None);
            }
            GestureState::Scrubbing(_) | GestureState::Idle => {}
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
