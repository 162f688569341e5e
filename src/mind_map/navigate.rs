//! Selection and keyboard navigation.
//!
//! Selection changes are not undoable. Navigation moves the selection of a
//! single selected idea to a neighbour: siblings first, then the parent or
//! children, and finally the nearest visible idea in the arrow's direction.

use super::MindMap;
use crate::geometry::Point;
use crate::tree::IdeaId;

impl MindMap {
    /// Selected ideas that are not hidden, in ascending id order.
    pub fn selected(&self) -> Vec<IdeaId> {
        self.store.selected()
    }

    pub fn has_selected(&self) -> bool {
        !self.store.selected().is_empty()
    }

    /// The selected idea if exactly one is selected.
    pub fn single_selected(&self) -> Option<IdeaId> {
        match self.store.selected().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn is_one_selected(&self) -> bool {
        self.single_selected().is_some()
    }

    /// Deselect every visible idea.
    pub fn deselect_all(&mut self) {
        for id in self.store.selected() {
            if let Some(idea) = self.store.get_mut(id) {
                idea.selected = false;
            }
        }
    }

    /// Make `id` the only selected idea and scroll to it.
    pub fn select_only(&mut self, id: IdeaId) {
        if !self.store.contains(id) {
            return;
        }
        self.deselect_all();
        if let Some(idea) = self.store.get_mut(id) {
            idea.selected = true;
        }
        self.scroll_into_view(id);
        self.changed(true);
    }

    /// Click on an idea; `toggle` adds it to or removes it from the selection.
    pub fn click_idea(&mut self, id: IdeaId, toggle: bool) {
        if !toggle {
            self.select_only(id);
            return;
        }
        if let Some(idea) = self.store.get_mut(id) {
            idea.selected = !idea.selected;
            self.changed(true);
        }
    }

    /// Click on empty space.
    pub fn click_background(&mut self) {
        self.deselect_all();
        self.changed(false);
    }

    // =========================================================================
    // Arrows
    // =========================================================================

    /// Select the sibling above, else the nearest idea above.
    pub fn arrow_up(&mut self) -> Option<IdeaId> {
        let current = self.single_selected()?;
        let target = self
            .sibling_on_side(current, |sibling, own| sibling < own, true)
            .or_else(|| self.nearest_where(current, |idea, own| idea.y < own.y))?;
        self.select_only(target);
        Some(target)
    }

    /// Select the sibling below, else the nearest idea below.
    pub fn arrow_down(&mut self) -> Option<IdeaId> {
        let current = self.single_selected()?;
        let target = self
            .sibling_on_side(current, |sibling, own| sibling > own, false)
            .or_else(|| self.nearest_where(current, |idea, own| idea.y > own.y))?;
        self.select_only(target);
        Some(target)
    }

    /// Move left: a right-side idea goes to its parent, everything else to
    /// its nearest left child or the nearest idea to the left.
    pub fn arrow_left(&mut self) -> Option<IdeaId> {
        self.arrow_horizontal(true)
    }

    /// Mirror image of [`arrow_left`](Self::arrow_left).
    pub fn arrow_right(&mut self) -> Option<IdeaId> {
        self.arrow_horizontal(false)
    }

    fn arrow_horizontal(&mut self, left: bool) -> Option<IdeaId> {
        let current = self.single_selected()?;
        let parent = self.store.parent(current);

        let target = match parent {
            Some(parent) if self.store.is_left(current) != left => Some(parent),
            _ => self.nearest_child(current, left).or_else(|| {
                if left {
                    self.nearest_where(current, |idea, own| idea.x < own.x)
                } else {
                    self.nearest_where(current, |idea, own| idea.x > own.x)
                }
            }),
        }?;
        self.select_only(target);
        Some(target)
    }

    /// The closest sibling on the same side whose vertical offset satisfies
    /// `accept(sibling_y, own_y)`.
    fn sibling_on_side(
        &self,
        id: IdeaId,
        accept: impl Fn(f64, f64) -> bool,
        above: bool,
    ) -> Option<IdeaId> {
        let own_y = self.store.get(id)?.pos.y;
        let side = self.store.is_left(id);
        let mut candidates = self.store.siblings(id).into_iter().filter(|&sibling| {
            self.store.is_left(sibling) == side
                && self
                    .store
                    .get(sibling)
                    .is_some_and(|idea| accept(idea.pos.y, own_y))
        });
        // Siblings come ordered top to bottom
        if above {
            candidates.last()
        } else {
            candidates.next()
        }
    }

    /// The visible child nearest to `id` on the given side.
    fn nearest_child(&self, id: IdeaId, left: bool) -> Option<IdeaId> {
        let own = self.store.abs_pos(id)?;
        self.store
            .children(id)
            .into_iter()
            .filter(|&child| !self.store.is_hidden(child))
            .filter_map(|child| Some((child, self.store.abs_pos(child)?)))
            .filter(|(_, pos)| if left { pos.x < own.x } else { pos.x > own.x })
            .min_by(|a, b| a.1.distance(own).total_cmp(&b.1.distance(own)))
            .map(|(child, _)| child)
    }

    /// The visible idea nearest to `id` whose position satisfies
    /// `accept(position, own_position)`.
    fn nearest_where(&self, id: IdeaId, accept: impl Fn(Point, Point) -> bool) -> Option<IdeaId> {
        let own = self.store.abs_pos(id)?;
        self.spatial
            .nearest_matching(own, |candidate| accept(candidate.center, own))
    }
}
