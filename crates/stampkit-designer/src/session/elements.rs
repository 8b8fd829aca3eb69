//! Creation, deletion and layer operations.

use super::StampSession;
use crate::model::ElementId;
use crate::registry::RegistryRecord;
use crate::scene::{FrameOptions, TextOptions};

impl StampSession {
    pub fn add_text(&mut self, options: TextOptions) -> ElementId {
        let id = self.scene.add_text(options);
        self.commit();
        id
    }

    pub fn add_frame(&mut self, options: FrameOptions) -> ElementId {
        let id = self.scene.add_frame(options);
        self.commit();
        id
    }

    /// Adds a formatted business-registry record as one text element.
    pub fn add_registry_text(&mut self, record: &RegistryRecord) -> ElementId {
        let id = self.scene.add_registry_text(record);
        self.commit();
        id
    }

    pub fn delete(&mut self, ids: &[ElementId]) -> usize {
        let removed = self.scene.delete(ids);
        self.commit_if(removed > 0);
        removed
    }

    /// Deletes everything currently selected.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.scene.selection().ids().to_vec();
        self.delete(&ids)
    }

    pub fn duplicate(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let copies = self.scene.duplicate(ids);
        self.commit_if(!copies.is_empty());
        copies
    }

    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let ids = self.scene.selection().ids().to_vec();
        self.duplicate(&ids)
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let changed = self.scene.bring_to_front(id);
        self.commit_if(changed)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let changed = self.scene.send_to_back(id);
        self.commit_if(changed)
    }

    pub fn move_up(&mut self, id: ElementId) -> bool {
        let changed = self.scene.move_up(id);
        self.commit_if(changed)
    }

    pub fn move_down(&mut self, id: ElementId) -> bool {
        let changed = self.scene.move_down(id);
        self.commit_if(changed)
    }

    pub fn move_to_index(&mut self, id: ElementId, z_index: usize) -> bool {
        let changed = self.scene.move_to_index(id, z_index);
        self.commit_if(changed)
    }

    pub fn toggle_lock(&mut self, id: ElementId) -> Option<bool> {
        let locked = self.scene.toggle_lock(id);
        self.commit_if(locked.is_some());
        locked
    }

    pub fn toggle_visibility(&mut self, id: ElementId) -> Option<bool> {
        let visible = self.scene.toggle_visibility(id);
        self.commit_if(visible.is_some());
        visible
    }

    pub fn rename(&mut self, id: ElementId, name: &str) -> bool {
        let changed = self.scene.rename(id, name);
        self.commit_if(changed)
    }

    /// Selection is view state and is not recorded in history.
    pub fn select(&mut self, id: ElementId) -> bool {
        self.scene.select(id)
    }

    pub fn select_many(&mut self, ids: &[ElementId]) {
        self.scene.select_many(ids);
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }
}

#[cfg(test)]
mod tests {
    use crate::document::StampSize;
    use crate::scene::{FrameOptions, TextOptions};
    use crate::session::StampSession;
    use stampkit_settings::EditorConfig;

    #[test]
    fn test_refused_operations_do_not_commit() {
        let mut session = StampSession::new(StampSize::default(), EditorConfig::default());
        let id = session.add_frame(FrameOptions::default());
        let depth = session.history().undo_depth();
        assert!(!session.bring_to_front(id));
        assert!(!session.move_down(id));
        assert_eq!(session.history().undo_depth(), depth);
    }

    #[test]
    fn test_delete_selected_is_undoable() {
        let mut session = StampSession::new(StampSize::default(), EditorConfig::default());
        let a = session.add_text(TextOptions::default());
        let b = session.add_text(TextOptions::default());
        session.select_many(&[a, b]);
        assert_eq!(session.delete_selected(), 2);
        assert!(session.scene().elements().is_empty());
        assert!(session.undo());
        let ids: Vec<_> = session.scene().elements().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
