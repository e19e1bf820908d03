//! Async host for the playback clock.
//!
//! Runs one frame-callback chain on a tokio interval against a shared store.
//! The store lock is taken once per frame and never held across an await.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::playback::{FrameTicket, Tick};
use crate::store::TimelineStore;

/// Store handle shared between the edit layer and the playback task.
pub type SharedStore = Arc<Mutex<TimelineStore>>;

/// Default callback interval, roughly one display frame.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Schedules frame callbacks while the store is playing.
pub struct PlaybackDriver {
    store: SharedStore,
    frame_interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl PlaybackDriver {
    pub fn new(store: SharedStore) -> Self {
        Self::with_interval(store, DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_interval(store: SharedStore, frame_interval: Duration) -> Self {
        Self {
            store,
            frame_interval,
            task: None,
        }
    }

    /// Start playback and its callback chain. Must be called inside a tokio
    /// runtime.
    ///
    /// Returns `false` when this driver already runs a chain. A store put
    /// into playback without the driver is adopted: the chain is driven with
    /// the store's live ticket instead of starting a second one.
    pub fn play(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let now = time::Instant::now().into_std();
        let ticket = {
            let mut store = self.store.lock();
            match store.play(now) {
                Some(ticket) => ticket,
                None => match store.playback_ticket() {
                    Some(ticket) => {
                        debug!("adopting playback started outside the driver");
                        ticket
                    }
                    None => return false,
                },
            }
        };
        self.cancel_task();
        let store = Arc::clone(&self.store);
        let interval = self.frame_interval;
        self.task = Some(tokio::spawn(run_chain(store, ticket, interval)));
        true
    }

    /// Pause playback and cancel the pending callback. Safe to call when
    /// nothing is playing.
    pub fn pause(&mut self) {
        self.store.lock().pause();
        self.cancel_task();
    }

    /// Check if a callback chain task is still alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

async fn run_chain(store: SharedStore, ticket: FrameTicket, frame_interval: Duration) {
    let mut ticker = time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        let now = ticker.tick().await.into_std();
        let tick = store.lock().advance(ticket, now);
        match tick {
            Tick::Continue(_) => {}
            Tick::Ended | Tick::Stale => {
                debug!(?tick, "playback chain finished");
                break;
            }
        }
    }
}
