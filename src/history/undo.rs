//! Linear undo/redo stacks.

use super::Change;
use crate::tree::IdeaStore;

/// The changes produced by one user action.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoGroup {
    changes: Vec<Change>,
}

impl UndoGroup {
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Undo and redo stacks of change groups.
#[derive(Debug, Default)]
pub struct UndoHistory {
    undo: Vec<UndoGroup>,
    redo: Vec<UndoGroup>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a group of changes.
    ///
    /// An empty group is dropped and leaves both stacks untouched. Otherwise
    /// the redo stack is cleared. Returns whether a group was pushed.
    pub fn record(&mut self, changes: Vec<Change>) -> bool {
        if changes.is_empty() {
            return false;
        }
        self.undo.push(UndoGroup { changes });
        self.redo.clear();
        true
    }

    /// Revert the most recent group. Returns the number of changes reverted,
    /// or None if there was nothing to undo.
    pub fn undo(&mut self, store: &mut IdeaStore) -> Option<usize> {
        let group = self.undo.pop()?;
        for change in &group.changes {
            change.revert(store);
        }
        let count = group.len();
        self.redo.push(group);
        Some(count)
    }

    /// Re-apply the most recently undone group. Returns the number of changes
    /// applied, or None if there was nothing to redo.
    pub fn redo(&mut self, store: &mut IdeaStore) -> Option<usize> {
        let group = self.redo.pop()?;
        for change in &group.changes {
            change.apply(store);
        }
        let count = group.len();
        self.undo.push(group);
        Some(count)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// The group `undo` would revert next.
    pub fn peek_undo(&self) -> Option<&UndoGroup> {
        self.undo.last()
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{IdeaId, IdeaRecord};

    fn add(id: u32) -> Change {
        Change::Added(IdeaRecord::root(IdeaId(id)))
    }

    #[test]
    fn test_empty_group_is_not_recorded() {
        let mut history = UndoHistory::new();
        assert!(!history.record(Vec::new()));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_move_groups_between_stacks() {
        let mut store = IdeaStore::new();
        let mut history = UndoHistory::new();

        add(1).apply(&mut store);
        assert!(history.record(vec![add(1)]));
        assert!(history.can_undo());

        assert_eq!(history.undo(&mut store), Some(1));
        assert!(store.is_empty());
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut store), Some(1));
        assert!(store.contains(IdeaId(1)));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut store = IdeaStore::new();
        let mut history = UndoHistory::new();
        assert_eq!(history.undo(&mut store), None);
        assert_eq!(history.redo(&mut store), None);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut store = IdeaStore::new();
        let mut history = UndoHistory::new();
        add(1).apply(&mut store);
        history.record(vec![add(1)]);
        history.undo(&mut store);
        assert!(history.can_redo());

        add(2).apply(&mut store);
        history.record(vec![add(2)]);
        assert!(!history.can_redo());
        assert_eq!(history.peek_undo().map(UndoGroup::len), Some(1));
    }

    #[test]
    fn test_undo_reattaches_child_removed_with_parent() {
        // Removal group lists the child before the parent id-wise
        let mut store = IdeaStore::new();
        let parent = IdeaRecord::new(IdeaId(5), IdeaId(1));
        let child = IdeaRecord::new(IdeaId(2), IdeaId(5));
        store.add(&IdeaRecord::root(IdeaId(1)));
        store.add(&parent);
        store.add(&child);

        let group = vec![Change::Removed(child), Change::Removed(parent)];
        for change in &group {
            change.apply(&mut store);
        }
        let mut history = UndoHistory::new();
        history.record(group);
        history.undo(&mut store);

        assert_eq!(store.children(IdeaId(5)), vec![IdeaId(2)]);
        assert_eq!(store.level(IdeaId(2)), Some(3));
    }

    #[test]
    fn test_clear() {
        let mut history = UndoHistory::new();
        history.record(vec![add(1)]);
        history.clear();
        assert!(!history.can_undo());
    }
}
