//! Radial mind-map tree layout.
//!
//! Every subtree is laid out bottom-up: children first, then the children are
//! pulled horizontally against the parent's edge and arranged vertically.
//! A root splits its children into a left and a right half which are laid
//! out independently; any deeper idea places all its children on its own side.
//!
//! # Modes
//!
//! - **Forced:** children touch the parent's edge and are stacked without
//!   gaps, centered on the parent. Manual offsets are discarded.
//! - **Soft:** a child is only pulled in when it overlaps the parent, and
//!   vertical overlaps are resolved by [`negotiate`], keeping manual
//!   positions wherever they don't collide.
//!
//! Positions are updated in place as relative translations of `Idea::pos`.

use std::collections::HashSet;

use super::negotiate::{negotiate, required_space, stack, Slot};
use crate::geometry::{Point, Rect};
use crate::tree::{IdeaId, IdeaStore};

/// Layout pass over an idea store.
pub struct TreeLayout<'a> {
    store: &'a mut IdeaStore,
    force: bool,
    /// Ideas on the path from the current subtree root down to the idea
    /// being placed. A parent cycle in loaded data stops here.
    path: HashSet<IdeaId>,
}

impl<'a> TreeLayout<'a> {
    /// Create a layout pass. `force` selects forced instead of soft mode.
    pub fn new(store: &'a mut IdeaStore, force: bool) -> Self {
        Self {
            store,
            force,
            path: HashSet::new(),
        }
    }

    /// Lay out every tree in the store.
    ///
    /// Returns the union of all subtree bounds, or None for an empty store.
    pub fn layout_all(&mut self) -> Option<Rect> {
        let roots = self.store.roots();
        self.layout_many(&roots)
    }

    /// Lay out the subtrees rooted at `ids`.
    pub fn layout_many(&mut self, ids: &[IdeaId]) -> Option<Rect> {
        ids.iter()
            .filter_map(|&id| self.layout(id))
            .reduce(|bounds, rect| bounds.union(&rect))
    }

    /// Lay out the subtree rooted at `id` and return its bounds.
    ///
    /// Returns None if the idea does not exist or is already being laid out
    /// further up the same subtree.
    pub fn layout(&mut self, id: IdeaId) -> Option<Rect> {
        if !self.store.contains(id) || !self.path.insert(id) {
            return None;
        }
        let bounds = self.layout_subtree(id);
        self.path.remove(&id);
        bounds
    }

    fn layout_subtree(&mut self, id: IdeaId) -> Option<Rect> {
        let children = self.store.children(id);

        if self.store.parent(id).is_none() {
            let (left, right): (Vec<IdeaId>, Vec<IdeaId>) = children
                .into_iter()
                .partition(|&child| self.store.is_left(child));
            let left_bounds = self.place(id, &left, true)?;
            let right_bounds = self.place(id, &right, false)?;
            Some(left_bounds.union(&right_bounds))
        } else {
            let left = self.store.is_left(id);
            self.place(id, &children, left)
        }
    }

    /// Place `children` of `id` on one side and return the bounds of `id`
    /// together with the placed children.
    fn place(&mut self, id: IdeaId, children: &[IdeaId], left: bool) -> Option<Rect> {
        let idea = self.store.get(id)?;
        let margins = idea.margins();
        let collapsed = idea.collapsed;
        let rect = self.store.rect(id)?;

        let mut bounds = if left {
            Rect::new(
                rect.left,
                rect.top - margins.top,
                rect.width + margins.right,
                rect.height + margins.top,
            )
        } else {
            Rect::new(
                rect.left - margins.left,
                rect.top - margins.top,
                rect.width + margins.left,
                rect.height + margins.top,
            )
        };
        if collapsed || children.is_empty() {
            return Some(bounds);
        }

        let mut slots: Vec<(f64, Slot)> = Vec::with_capacity(children.len());
        for &child in children {
            let Some(child_bounds) = self.layout(child) else {
                continue;
            };
            let dx = if left {
                if self.force || rect.left < child_bounds.right() {
                    rect.left - child_bounds.right()
                } else {
                    0.0
                }
            } else if self.force || rect.right() > child_bounds.left {
                rect.right() - child_bounds.left
            } else {
                0.0
            };
            self.store.move_by(child, Point::new(dx, 0.0));

            let Some(child_idea) = self.store.get(child) else {
                continue;
            };
            let slot = Slot::new(
                child,
                child_bounds.plus(Point::new(dx, 0.0)),
                child_idea.margins().top,
            );
            slots.push((child_idea.pos.y, slot));
        }
        if slots.is_empty() {
            return Some(bounds);
        }

        // Sibling order is the order of the relative vertical offsets
        slots.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut slots: Vec<Slot> = slots.into_iter().map(|(_, slot)| slot).collect();

        if self.force {
            stack(&mut slots, rect.center().y);
        } else {
            let upper = slots[0].top();
            let lower = slots[slots.len() - 1].bottom();
            let required = required_space(&slots);
            negotiate(&mut slots, upper, lower, required);
        }

        for slot in &slots {
            if slot.shift != 0.0 {
                self.store.move_by(slot.id, Point::new(0.0, slot.shift));
            }
            bounds = bounds.union(&slot.rect);
        }
        Some(bounds)
    }
}
