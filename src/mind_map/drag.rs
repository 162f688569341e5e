//! Pointer drag sessions.
//!
//! A press starts a [`DragSession`]. It only turns into a drag once the
//! pointer has travelled further than the configured threshold; releasing
//! before that is a plain click. A session ends exactly once, either by
//! release or by cancel.
//!
//! Panning moves the whole map on every pointer move and is not undoable.
//! Dragging an idea only moves a ghost image until it is dropped; the drop
//! is one transaction.

use tracing::debug;

use super::MindMap;
use crate::geometry::Point;
use crate::tree::IdeaId;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// The map itself.
    Pan,
    /// One idea with its subtree.
    Idea(IdeaId),
}

/// Lifecycle of a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed, still within the threshold.
    Pending,
    /// Moved past the threshold.
    Dragging,
    /// Released or cancelled.
    Finished,
}

/// Pointer state of one press-move-release gesture, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    kind: DragKind,
    phase: DragPhase,
    start: Point,
    last: Point,
    threshold: f64,
}

impl DragSession {
    pub fn new(kind: DragKind, start: Point, threshold: f64) -> Self {
        Self {
            kind,
            phase: DragPhase::Pending,
            start,
            last: start,
            threshold,
        }
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// Feed a pointer move.
    ///
    /// Returns the distance since the previous drag position once the
    /// session is dragging, None while it is pending or finished.
    pub fn move_to(&mut self, pos: Point) -> Option<Point> {
        match self.phase {
            DragPhase::Finished => None,
            DragPhase::Pending if pos.distance(self.start) <= self.threshold => None,
            DragPhase::Pending | DragPhase::Dragging => {
                self.phase = DragPhase::Dragging;
                let delta = pos.minus(self.last);
                self.last = pos;
                Some(delta)
            }
        }
    }

    /// Release the pointer. Returns true if the gesture was a drag.
    pub fn finish(&mut self) -> bool {
        let dragged = self.phase == DragPhase::Dragging;
        self.phase = DragPhase::Finished;
        dragged
    }

    /// Abort the gesture. Returns true if it was dragging.
    pub fn cancel(&mut self) -> bool {
        self.finish()
    }
}

impl MindMap {
    /// The gesture in progress, if any.
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Press at `pointer`. Starts an idea drag if an idea is under the
    /// pointer and editing is allowed, a pan otherwise.
    pub fn pointer_down(&mut self, pointer: Point) -> DragKind {
        let hit = self.spatial.idea_at(self.pointer_to_model(pointer), None);
        let kind = match hit {
            Some(id) if self.config.editing => DragKind::Idea(id),
            _ => DragKind::Pan,
        };
        self.drag = Some(DragSession::new(kind, pointer, self.config.drag_threshold));
        kind
    }

    /// Move the pointer.
    ///
    /// For an idea drag returns where the dragged idea's ghost should be
    /// drawn, in display coordinates.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let session = self.drag.as_mut()?;
        let delta = session.move_to(pointer)?;
        let (kind, start) = (session.kind(), session.start());

        match kind {
            DragKind::Pan => {
                self.move_root_ideas(delta.divide(self.scale));
                self.redraw();
                None
            }
            DragKind::Idea(id) => {
                let origin = self.element_pos(id)?;
                Some(origin.plus(pointer.minus(start).divide(self.scale)))
            }
        }
    }

    /// Release the pointer. Returns true if the press was a drag, in which
    /// case the host should swallow the click that follows.
    pub fn pointer_up(&mut self, pointer: Point) -> bool {
        let Some(mut session) = self.drag.take() else {
            return false;
        };
        if !session.finish() {
            return false;
        }
        match session.kind() {
            DragKind::Pan => self.changed(false),
            DragKind::Idea(id) => self.drop_idea(id, session.start(), pointer),
        }
        true
    }

    /// Abort the gesture. A pan is rolled back; an idea drag never touched
    /// the model.
    pub fn cancel_drag(&mut self) {
        let Some(mut session) = self.drag.take() else {
            return;
        };
        if session.cancel() && session.kind() == DragKind::Pan {
            let travelled = session.last.minus(session.start);
            self.move_root_ideas(-travelled.divide(self.scale));
            self.changed(false);
        }
    }

    fn drop_idea(&mut self, id: IdeaId, start: Point, pointer: Point) {
        self.commit_edit();
        let model_pointer = self.pointer_to_model(pointer);
        let target = self.spatial.idea_at(model_pointer, Some(id));
        let distance = pointer.minus(start).divide(self.scale);
        debug!(idea = %id, target = ?target, "drop");

        self.transact(|map| {
            let was_left = map.store.is_left(id);
            match target {
                Some(target) => {
                    let crosses = match map.store.parent(target) {
                        None => map
                            .store
                            .abs_pos(target)
                            .is_some_and(|center| was_left != (center.x > model_pointer.x)),
                        Some(_) => map.store.is_left(target) != was_left,
                    };
                    if crosses {
                        let subtree = map.store.this_and_descendants(id);
                        map.mirror(&subtree);
                    }
                    map.reparent(id, target);
                }
                None => {
                    map.store.move_by(id, distance);
                    if map.store.is_left(id) != was_left {
                        let descendants = map.store.descendants(id);
                        map.mirror(&descendants);
                    }
                }
            }
        });
    }

    /// Attach `id` to `target`. If `target` lies inside the subtree of `id`,
    /// the child of `id` on the path to `target` first takes the place of
    /// `id`, so no cycle can form.
    fn reparent(&mut self, id: IdeaId, target: IdeaId) {
        let path = self.store.this_and_ancestors(target);
        if let Some(index) = path.iter().position(|&ancestor| ancestor == id) {
            if index > 0 {
                let follower = path[index - 1];
                let new_parent = match self.store.parent(id) {
                    Some(parent) => parent,
                    None => follower,
                };
                self.store.set_parent(follower, new_parent);
            }
        }
        self.store.set_parent(id, target);
    }

    fn mirror(&mut self, ids: &[IdeaId]) {
        for &id in ids {
            if let Some(idea) = self.store.get_mut(id) {
                idea.pos = idea.pos.mirrored();
            }
        }
    }
}
