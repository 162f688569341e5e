//! Editing commands.
//!
//! Each command runs as one transaction and therefore produces at most one
//! undo group. The matching `can_*` predicates tell a toolbar whether the
//! command would do anything right now.

use super::MindMap;
use crate::geometry::Point;
use crate::layout::TreeLayout;
use crate::tree::{IdeaId, IdeaRecord};

impl MindMap {
    /// One more than the largest id in use (1 for an empty map).
    pub fn next_id(&self) -> IdeaId {
        self.store.next_id()
    }

    fn can_collapse_idea(&self, id: IdeaId) -> bool {
        self.store
            .get(id)
            .is_some_and(|idea| !idea.collapsed && self.store.has_children(id))
    }

    fn can_expand_idea(&self, id: IdeaId) -> bool {
        self.store
            .get(id)
            .is_some_and(|idea| idea.collapsed && self.store.has_children(id))
    }

    pub fn can_collapse(&self) -> bool {
        self.selected().into_iter().any(|id| self.can_collapse_idea(id))
    }

    /// Collapse every selected idea that has visible children.
    pub fn collapse(&mut self) {
        if !self.can_collapse() {
            return;
        }
        self.commit_edit();
        self.transact(|map| {
            for id in map.selected() {
                if map.can_collapse_idea(id) {
                    if let Some(idea) = map.store.get_mut(id) {
                        idea.collapsed = true;
                    }
                }
            }
        });
    }

    pub fn can_expand(&self) -> bool {
        self.selected().into_iter().any(|id| self.can_expand_idea(id))
    }

    /// Expand every selected collapsed idea.
    pub fn expand(&mut self) {
        if !self.can_expand() {
            return;
        }
        self.commit_edit();
        self.transact(|map| {
            for id in map.selected() {
                if map.can_expand_idea(id) {
                    if let Some(idea) = map.store.get_mut(id) {
                        idea.collapsed = false;
                    }
                }
            }
        });
    }

    pub fn can_mark(&self) -> bool {
        self.config.marking && self.has_selected()
    }

    /// Toggle the mark of every selected idea.
    pub fn mark(&mut self) {
        if !self.can_mark() {
            return;
        }
        self.commit_edit();
        self.transact(|map| {
            for id in map.selected() {
                if let Some(idea) = map.store.get_mut(id) {
                    idea.marked = !idea.marked;
                }
            }
        });
    }

    pub fn can_layout(&self) -> bool {
        !self.store.is_empty()
    }

    /// Lay out the selected subtrees, or everything if nothing is selected.
    pub fn layout(&mut self, force: bool) {
        if !self.can_layout() {
            return;
        }
        self.commit_edit();
        self.transact(|map| {
            let selected = map.selected();
            let mut layout = TreeLayout::new(&mut map.store, force);
            if selected.is_empty() {
                layout.layout_all();
            } else {
                layout.layout_many(&selected);
            }
        });
    }

    pub fn can_remove(&self) -> bool {
        self.config.editing && self.has_selected()
    }

    /// Remove the selected ideas with all their descendants.
    ///
    /// If exactly one idea was selected, its parent becomes selected.
    pub fn remove_selected(&mut self) {
        if !self.can_remove() {
            return;
        }
        self.commit_edit();
        self.transact(|map| {
            let selected = map.selected();
            let follow = match selected.as_slice() {
                [only] => map.store.parent(*only),
                _ => None,
            };
            for id in selected {
                for doomed in map.store.this_and_descendants(id) {
                    map.store.remove(doomed);
                }
            }
            if let Some(parent) = follow {
                if let Some(idea) = map.store.get_mut(parent) {
                    idea.selected = true;
                }
                map.scroll_into_view(parent);
            }
        });
    }

    pub fn can_add_sibling(&self) -> bool {
        self.config.editing
            && self
                .single_selected()
                .is_some_and(|id| self.store.level(id).is_some_and(|level| level > 1))
    }

    /// Add a selected sibling directly below the selected idea.
    pub fn add_sibling(&mut self) -> Option<IdeaId> {
        if !self.can_add_sibling() {
            return None;
        }
        self.commit_edit();
        let current = self.single_selected()?;
        let record = self.store.get(current)?.to_record();
        Some(self.transact(|map| {
            let id = map.next_id();
            map.deselect_all();
            map.store.add(
                &IdeaRecord::new(id, record.parent_id)
                    .with_pos(Point::new(record.x, record.y + 1.0))
                    .with_selected(true),
            );
            id
        }))
    }

    pub fn can_add_child(&self) -> bool {
        self.config.editing && (self.is_one_selected() || self.store.is_empty())
    }

    /// Add a selected child to the selected idea, or a root to an empty map.
    pub fn add_child(&mut self) -> Option<IdeaId> {
        if !self.can_add_child() {
            return None;
        }
        self.commit_edit();
        Some(self.transact(|map| {
            let id = map.next_id();
            match map.single_selected() {
                Some(parent) => {
                    if let Some(idea) = map.store.get_mut(parent) {
                        idea.collapsed = false;
                    }
                    map.deselect_all();
                    map.store
                        .add(&IdeaRecord::new(id, parent).with_selected(true));
                }
                None => {
                    map.store.add(&IdeaRecord::root(id).with_selected(true));
                }
            }
            id
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::MindMapConfig;
    use crate::geometry::Point;
    use crate::history::Change;
    use crate::mind_map::tests::{id, map_with, sample};
    use crate::mind_map::{MindMap, Viewport};
    use crate::tree::IdeaRecord;

    #[test]
    fn test_remove_selected_subtree_in_one_group() {
        // A(2) -> B(5) -> C(6)
        let mut map = map_with(vec![
            IdeaRecord::root(id(1)),
            IdeaRecord::new(id(2), id(1)).with_pos(Point::new(150.0, 0.0)),
            IdeaRecord::new(id(5), id(2)).with_pos(Point::new(150.0, 0.0)),
            IdeaRecord::new(id(6), id(5)).with_pos(Point::new(150.0, 0.0)),
            IdeaRecord::new(id(7), id(1)).with_pos(Point::new(-150.0, 0.0)),
        ]);
        map.select_only(id(2));
        map.remove_selected();

        assert_eq!(map.store().ids(), vec![id(1), id(7)]);
        assert_eq!(map.selected(), vec![id(1)]);

        let group = map.history.peek_undo().unwrap();
        let removed: Vec<u32> = group
            .changes()
            .iter()
            .filter_map(|change| match change {
                Change::Removed(record) => Some(record.id.raw()),
                _ => None,
            })
            .collect();
        assert_eq!(removed, vec![2, 5, 6]);

        assert!(map.undo());
        assert_eq!(map.store().ids(), vec![id(1), id(2), id(5), id(6), id(7)]);
        assert_eq!(map.store().level(id(6)), Some(4));
        assert_eq!(map.selected(), vec![id(2)]);
    }

    #[test]
    fn test_remove_multiple_keeps_selection_empty() {
        let mut map = sample();
        map.click_idea(id(3), true);
        map.click_idea(id(4), true);
        map.remove_selected();
        assert_eq!(map.store().ids(), vec![id(1), id(2)]);
        assert!(!map.has_selected());
    }

    #[test]
    fn test_add_child_to_empty_map_creates_root() {
        let mut map = MindMap::new(Viewport::new(800.0, 600.0), MindMapConfig::default());
        assert!(map.can_add_child());
        let root = map.add_child().unwrap();
        assert_eq!(root, id(1));
        assert_eq!(map.store().parent(root), None);
        assert_eq!(map.selected(), vec![root]);

        let child = map.add_child().unwrap();
        assert_eq!(child, id(2));
        assert_eq!(map.store().parent(child), Some(root));
        assert_eq!(map.selected(), vec![child]);
        // New child lands on the right, clear of its parent
        let parent_rect = map.store().rect(root).unwrap();
        assert!(map.store().rect(child).unwrap().left >= parent_rect.right());
    }

    #[test]
    fn test_add_child_expands_collapsed_parent() {
        let mut map = sample();
        map.select_only(id(2));
        map.collapse();
        assert!(map.store().get(id(2)).unwrap().collapsed);

        map.select_only(id(2));
        let child = map.add_child().unwrap();
        assert!(!map.store().get(id(2)).unwrap().collapsed);
        assert_eq!(map.store().parent(child), Some(id(2)));
    }

    #[test]
    fn test_add_sibling_sorts_below() {
        let mut map = sample();
        map.select_only(id(3));
        let sibling = map.add_sibling().unwrap();
        assert_eq!(sibling, id(5));
        assert_eq!(map.store().parent(sibling), Some(id(1)));
        let own = map.store().get(id(3)).unwrap().pos.y;
        assert!(map.store().get(sibling).unwrap().pos.y > own);
        assert!(!map.store().is_left(sibling));
    }

    #[test]
    fn test_add_sibling_needs_non_root() {
        let mut map = sample();
        map.select_only(id(1));
        assert!(!map.can_add_sibling());
        assert_eq!(map.add_sibling(), None);
    }

    #[test]
    fn test_collapse_expand_mark() {
        let mut map = sample();
        map.select_only(id(3));
        // Leaf can't collapse
        assert!(!map.can_collapse());
        map.mark();
        assert!(map.store().get(id(3)).unwrap().marked);

        map.select_only(id(2));
        assert!(map.can_collapse());
        map.collapse();
        assert!(map.store().is_hidden(id(4)));
        assert!(map.can_expand());
        map.expand();
        assert!(!map.store().is_hidden(id(4)));
        assert!(map.undo());
        assert!(map.store().is_hidden(id(4)));
    }

    #[test]
    fn test_editing_disabled_blocks_structure_changes() {
        let mut map = sample();
        map.set_config(MindMapConfig {
            editing: false,
            marking: false,
            ..MindMapConfig::default()
        });
        map.select_only(id(3));
        assert_eq!(map.add_child(), None);
        assert!(!map.can_remove());
        assert!(!map.can_mark());
        map.remove_selected();
        assert_eq!(map.store().len(), 4);
    }

    #[test]
    fn test_forced_layout_survives_parent_cycle() {
        let mut map = map_with(vec![
            IdeaRecord::new(id(1), id(2)).with_selected(true),
            IdeaRecord::new(id(2), id(1)).with_pos(Point::new(150.0, 0.0)),
        ]);
        assert_eq!(map.selected(), vec![id(1)]);
        map.layout(true);
        map.layout(false);
        assert_eq!(map.store().len(), 2);
    }

    #[test]
    fn test_forced_layout_of_selection_is_undoable() {
        let mut map = sample();
        map.transact(|map| {
            map.store.move_by(id(3), Point::new(400.0, 90.0));
        });
        map.select_only(id(1));
        map.layout(true);
        assert_eq!(map.store().get(id(3)).unwrap().pos, Point::new(110.0, 0.0));
        assert!(map.undo());
        assert_eq!(map.store().get(id(3)).unwrap().pos, Point::new(550.0, 90.0));
    }
}
