//! Snapshot-based undo/redo.
//!
//! Each entry is the serialized list of user elements after one committed
//! mutation; the top of the undo stack is always the current state.

use std::collections::VecDeque;

use stampkit_core::Result;

use crate::model::Element;

/// One committed document state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn capture(elements: &[Element]) -> Result<Self> {
        Ok(Self(serde_json::to_string(elements)?))
    }

    pub fn elements(&self) -> Result<Vec<Element>> {
        Ok(serde_json::from_str(&self.0)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    max_depth: usize,
    restoring: bool,
}

impl HistoryManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(2),
            restoring: false,
        }
    }

    /// Pushes a new state and clears the redo stack. Ignored while restoring.
    pub fn save(&mut self, snapshot: Snapshot) {
        if self.restoring {
            return;
        }
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Moves the current state to the redo stack and returns the state to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        while self.redo_stack.len() > self.max_depth {
            self.redo_stack.pop_front();
        }
        self.undo_stack.back().cloned()
    }

    /// Returns the most recently undone state, which becomes current again.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let state = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(state.clone());
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}
