//! Snapshot commits, undo and redo.

use super::StampSession;
use crate::history::Snapshot;

impl StampSession {
    /// Records the current elements as a new history entry.
    ///
    /// Does nothing while a snapshot is being restored.
    pub fn save_state(&mut self) {
        if self.history.is_restoring() {
            return;
        }
        match Snapshot::capture(self.scene.elements()) {
            Ok(snapshot) => self.history.save(snapshot),
            Err(e) => tracing::warn!(error = %e, "could not capture history snapshot"),
        }
    }

    /// Saves a snapshot after a successful mutation.
    pub(crate) fn commit(&mut self) {
        self.save_state();
        self.is_modified = true;
    }

    /// Commits when `changed` and passes it through.
    pub(crate) fn commit_if(&mut self, changed: bool) -> bool {
        if changed {
            self.commit();
        }
        changed
    }

    /// Returns to the previous state. Needs at least two entries.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drops all history and starts again from the current elements.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.save_state();
    }

    /// Replaces every user element with the snapshot's elements, keeping their ids.
    fn restore(&mut self, snapshot: &Snapshot) {
        self.history.set_restoring(true);
        match snapshot.elements() {
            Ok(elements) => {
                tracing::debug!(elements = elements.len(), "restoring snapshot");
                self.scene.replace_elements(elements);
                self.is_modified = true;
            }
            Err(e) => tracing::warn!(error = %e, "history snapshot could not be restored"),
        }
        self.history.set_restoring(false);
    }
}
