//! Snapshot undo/redo for loadout editing
//!
//! The editing UI calls `record_state` immediately before every mutation.
//! Snapshots are deep copies of the plain configuration data; derived state
//! (inventory stats, safety warnings) is recomputed from data and never
//! captured. Linear history: a new edit invalidates the redo stack.

use std::collections::VecDeque;

use crate::spec::LoadoutSpec;

/// Oldest snapshots are evicted past this depth
pub const MAX_HISTORY_DEPTH: usize = 40;

/// One captured editing state
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    /// Monotonic capture order, for display and debugging
    pub sequence: u64,
    state: LoadoutSpec,
}

/// Bounded undo/redo stacks for one edited spec
#[derive(Debug, Default)]
pub struct EditHistoryManager {
    undo: VecDeque<HistorySnapshot>,
    redo: VecDeque<HistorySnapshot>,
    next_sequence: u64,
}

impl EditHistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Capture the pre-mutation state. Clears the redo stack; any new edit
    /// forks away from previously undone states.
    pub fn record_state(&mut self, spec: &LoadoutSpec) {
        self.redo.clear();
        if self.undo.len() >= MAX_HISTORY_DEPTH {
            self.undo.pop_front();
        }
        let snapshot = self.snapshot(spec);
        self.undo.push_back(snapshot);
    }

    /// Restore the most recent snapshot into `spec`, in place.
    ///
    /// The current state moves to the redo stack. No-op on an empty stack;
    /// never fails.
    pub fn undo(&mut self, spec: &mut LoadoutSpec) -> bool {
        let Some(snapshot) = self.undo.pop_back() else {
            return false;
        };
        let current = self.snapshot(spec);
        self.redo.push_back(current);
        *spec = snapshot.state;
        true
    }

    /// Mirror of `undo`
    pub fn redo(&mut self, spec: &mut LoadoutSpec) -> bool {
        let Some(snapshot) = self.redo.pop_back() else {
            return false;
        };
        if self.undo.len() >= MAX_HISTORY_DEPTH {
            self.undo.pop_front();
        }
        let current = self.snapshot(spec);
        self.undo.push_back(current);
        *spec = snapshot.state;
        true
    }

    fn snapshot(&mut self, spec: &LoadoutSpec) -> HistorySnapshot {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        HistorySnapshot {
            sequence,
            state: spec.clone(),
        }
    }
}
