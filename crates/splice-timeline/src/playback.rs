//! Playback clock state machine.
//!
//! `Paused ↔ Playing`. Each `play` opens a new callback chain identified by a
//! [`FrameTicket`]; the host schedules a callback per frame and hands the
//! ticket back with the current monotonic time. Pausing bumps the
//! generation, so a callback already in flight for an old chain is rejected
//! instead of moving the cursor after the pause.

use std::time::Instant;

/// Identifies one play/pause callback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket {
    generation: u64,
}

/// What a frame callback should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule another callback with this ticket.
    Continue(FrameTicket),
    /// Playback reached the end of the sequence and paused itself.
    Ended,
    /// The chain was cancelled; drop the callback.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct Running {
    ticket: FrameTicket,
    last_tick: Instant,
}

/// Tracks whether playback runs and measures time between callbacks.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    generation: u64,
    running: Option<Running>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if playback is running.
    pub fn is_playing(&self) -> bool {
        self.running.is_some()
    }

    /// Open a new callback chain. Returns `None` when already playing, so a
    /// second `play` never creates a second chain.
    pub fn start(&mut self, now: Instant) -> Option<FrameTicket> {
        if self.running.is_some() {
            return None;
        }
        self.generation += 1;
        let ticket = FrameTicket {
            generation: self.generation,
        };
        self.running = Some(Running {
            ticket,
            last_tick: now,
        });
        Some(ticket)
    }

    /// Cancel the pending chain. Returns whether anything was running;
    /// stopping a stopped clock does nothing.
    pub fn stop(&mut self) -> bool {
        if self.running.take().is_some() {
            self.generation += 1;
            true
        } else {
            false
        }
    }

    /// Seconds since the previous callback of `ticket`'s chain, or `None`
    /// when the ticket is stale.
    pub fn elapsed(&mut self, ticket: FrameTicket, now: Instant) -> Option<f64> {
        let running = self.running.as_mut().filter(|r| r.ticket == ticket)?;
        let delta = now.saturating_duration_since(running.last_tick).as_secs_f64();
        running.last_tick = now;
        Some(delta)
    }

    /// Ticket of the live chain, if any.
    pub fn current_ticket(&self) -> Option<FrameTicket> {
        self.running.map(|r| r.ticket)
    }
}
