//! Undo/redo history.
//!
//! Holds whole snapshots rather than inverse commands: snapshots are cheap
//! `Arc` clones and restoring one can never drift from the state it captured.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::state::TimelineState;

/// Undo/redo history stack.
#[derive(Debug)]
pub struct UndoStack {
    /// States before each recorded edit (most recent last).
    undo: VecDeque<Arc<TimelineState>>,
    /// States undone (most recent last).
    redo: Vec<Arc<TimelineState>>,
    /// Maximum history depth.
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Record the state that an edit is about to replace.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, previous: Arc<TimelineState>) {
        self.redo.clear();
        if self.max_depth == 0 {
            return;
        }
        self.undo.push_back(previous);
        if self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    /// Step back. `current` goes onto the redo stack; returns the state to
    /// restore.
    pub fn undo(&mut self, current: Arc<TimelineState>) -> Option<Arc<TimelineState>> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Arc<TimelineState>) -> Option<Arc<TimelineState>> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(200)
    }
}
