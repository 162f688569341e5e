//! Title editing sessions.
//!
//! While a title is edited every keystroke updates the idea live, but only
//! the finished edit becomes undoable: the session remembers the records at
//! its start and records one group against them when it is committed.

use tracing::debug;

use super::MindMap;
use crate::tree::{IdeaId, IdeaRecord};

/// An open title edit.
#[derive(Debug, Clone)]
pub(crate) struct EditSession {
    id: IdeaId,
    original_title: String,
    snapshot: Vec<IdeaRecord>,
}

impl MindMap {
    /// The idea whose title is being edited, if any.
    pub fn editing_idea(&self) -> Option<IdeaId> {
        self.edit.as_ref().map(|session| session.id)
    }

    /// Start editing the title of `id`. Commits any other open edit first.
    pub fn begin_edit(&mut self, id: IdeaId) -> bool {
        if !self.config.editing || self.editing_idea() == Some(id) {
            return false;
        }
        self.commit_edit();
        let Some(original_title) = self.store.get(id).map(|idea| idea.title.clone()) else {
            return false;
        };
        self.scroll_into_view(id);
        self.edit = Some(EditSession {
            id,
            original_title,
            snapshot: self.store.records(),
        });
        self.redraw();
        true
    }

    /// Replace the title being edited. Not recorded until committed.
    pub fn edit_title(&mut self, title: &str) {
        let Some(id) = self.editing_idea() else {
            return;
        };
        if let Some(idea) = self.store.get_mut(id) {
            idea.title = title.to_owned();
        }
        self.redraw();
    }

    /// Finish the edit. Returns whether the title changed.
    ///
    /// A changed title is recorded as one undo group against the records at
    /// the start of the edit. Every undoable action commits an open edit
    /// before it runs, so that group only ever holds the edit.
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        let changed = self
            .store
            .get(session.id)
            .is_some_and(|idea| idea.title != session.original_title);

        if changed {
            debug!(idea = %session.id, "title edited");
            self.record_since(&session.snapshot);
        } else if let Some(idea) = self.store.get_mut(session.id) {
            idea.title = session.original_title;
        }
        self.changed(true);
        changed
    }

    /// Abandon the edit, restoring the original title.
    pub fn cancel_edit(&mut self) {
        if let Some(session) = self.edit.as_ref() {
            let (id, title) = (session.id, session.original_title.clone());
            if let Some(idea) = self.store.get_mut(id) {
                idea.title = title;
            }
        }
        self.commit_edit();
    }
}

#[cfg(test)]
mod tests {
    use crate::mind_map::tests::{id, sample};
    use crate::mind_map::MindMap;

    fn title(map: &MindMap, raw: u32) -> String {
        map.store().get(id(raw)).unwrap().title.clone()
    }

    #[test]
    fn test_commit_records_one_group() {
        let mut map = sample();
        assert!(map.begin_edit(id(3)));
        map.edit_title("h");
        map.edit_title("hello");
        assert!(!map.can_undo());
        assert!(map.commit_edit());

        assert_eq!(title(&map, 3), "hello");
        assert!(map.can_undo());
        assert!(map.undo());
        assert_eq!(title(&map, 3), "");
        assert!(!map.can_undo());
    }

    #[test]
    fn test_unchanged_title_records_nothing() {
        let mut map = sample();
        let before = map.to_records();
        map.begin_edit(id(1));
        map.edit_title("other");
        map.edit_title("root");
        assert!(!map.commit_edit());
        assert!(!map.can_undo());
        assert_eq!(map.to_records(), before);
    }

    #[test]
    fn test_cancel_restores_title() {
        let mut map = sample();
        map.begin_edit(id(1));
        map.edit_title("scrapped");
        map.cancel_edit();
        assert_eq!(title(&map, 1), "root");
        assert!(map.editing_idea().is_none());
        assert!(!map.can_undo());
    }

    #[test]
    fn test_undo_commits_open_edit() {
        let mut map = sample();
        map.begin_edit(id(2));
        map.edit_title("two");
        assert!(map.undo());
        assert_eq!(title(&map, 2), "");
        assert!(map.can_redo());
        assert!(map.redo());
        assert_eq!(title(&map, 2), "two");
    }

    #[test]
    fn test_mark_during_unchanged_edit_is_kept() {
        let mut map = sample();
        map.select_only(id(3));
        map.begin_edit(id(3));
        map.mark();
        assert!(map.editing_idea().is_none());
        assert!(!map.commit_edit());

        assert!(map.store().get(id(3)).unwrap().marked);
        assert!(map.undo());
        assert!(!map.store().get(id(3)).unwrap().marked);
        assert!(!map.can_undo());
    }

    #[test]
    fn test_mark_during_edit_is_its_own_group() {
        let mut map = sample();
        map.select_only(id(3));
        map.begin_edit(id(3));
        map.edit_title("hello");
        map.mark();
        map.commit_edit();

        assert!(map.undo());
        assert_eq!(title(&map, 3), "hello");
        assert!(!map.store().get(id(3)).unwrap().marked);
        assert!(map.undo());
        assert_eq!(title(&map, 3), "");
        assert!(!map.can_undo());
    }

    #[test]
    fn test_edit_title_remeasures() {
        let mut map = sample();
        map.set_measurer(|idea: &crate::tree::Idea, _level: u32| {
            Some(crate::tree::Measure::boxed(10.0 * idea.title.len() as f64, 20.0, 5.0))
        });
        map.begin_edit(id(1));
        map.edit_title("abcdefghijklmnop");
        assert_eq!(map.store().get(id(1)).unwrap().width(), 160.0);
        map.commit_edit();
    }
}
