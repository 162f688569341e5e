//! IdeaStore - the id-indexed arena holding every idea.
//!
//! Ideas live as node weights of a petgraph `StableGraph`. Each idea links to
//! its parent through its `parent_id`; the graph's parent→child edges are the
//! children index derived from those links and kept up to date on every
//! structural change, so `children()` never scans the whole map.
//!
//! Parent ids may dangle for a while (an undo can re-add a child before its
//! parent). Such children are parked in `waiting`, keyed by the missing
//! parent id, and get linked the moment that parent is added.

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};

use super::idea::{Idea, IdeaId, IdeaRecord};
use crate::geometry::{Point, Rect};

/// The idea arena plus its parent→children index.
pub struct IdeaStore {
    /// Ideas as node weights, parent→child edges.
    graph: StableGraph<Idea, (), Directed>,

    /// Map from stable IdeaId to petgraph NodeIndex
    id_to_index: HashMap<IdeaId, NodeIndex>,

    /// Children whose parent id does not resolve (yet), keyed by that id
    waiting: HashMap<IdeaId, Vec<IdeaId>>,
}

impl IdeaStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            id_to_index: HashMap::new(),
            waiting: HashMap::new(),
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add an idea, or replace the existing idea with the same id.
    pub fn add(&mut self, record: &IdeaRecord) -> IdeaId {
        if self.update(record) {
            return record.id;
        }

        let id = record.id;
        let index = self.graph.add_node(Idea::from_record(record));
        self.id_to_index.insert(id, index);
        self.link(id, record.parent_id);

        // Adopt children that were added before this idea
        if let Some(children) = self.waiting.remove(&id) {
            for child in children {
                if let Some(&child_index) = self.id_to_index.get(&child) {
                    self.graph.add_edge(index, child_index, ());
                }
            }
        }

        id
    }

    /// Remove an idea by id. Its children stay in the store and wait for a
    /// parent with this id to come back.
    pub fn remove(&mut self, id: IdeaId) -> Option<Idea> {
        let index = self.id_to_index.get(&id).copied()?;
        let parent_id = self.graph[index].parent_id();
        self.unlink(id, parent_id);

        let orphans: Vec<IdeaId> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|child| self.graph[child].id())
            .collect();
        if !orphans.is_empty() {
            self.waiting.entry(id).or_default().extend(orphans);
        }

        self.id_to_index.remove(&id);
        self.graph.remove_node(index)
    }

    /// Replace every persisted field of an existing idea.
    ///
    /// Returns false (and does nothing) if no idea has the record's id.
    pub fn update(&mut self, record: &IdeaRecord) -> bool {
        let Some(&index) = self.id_to_index.get(&record.id) else {
            return false;
        };
        self.relink(record.id, index, record.parent_id);
        self.graph[index].apply_content(record);
        true
    }

    /// Point an idea at a new parent.
    pub fn set_parent(&mut self, id: IdeaId, parent_id: IdeaId) -> bool {
        let Some(&index) = self.id_to_index.get(&id) else {
            return false;
        };
        self.relink(id, index, parent_id);
        true
    }

    /// Translate an idea relative to its parent.
    pub fn move_by(&mut self, id: IdeaId, distance: Point) {
        if let Some(idea) = self.get_mut(id) {
            idea.move_by(distance);
        }
    }

    /// Remove every idea.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.id_to_index.clear();
        self.waiting.clear();
    }

    fn relink(&mut self, id: IdeaId, index: NodeIndex, parent_id: IdeaId) {
        let old_parent = self.graph[index].parent_id();
        if old_parent != parent_id {
            self.unlink(id, old_parent);
            self.graph[index].set_parent_id(parent_id);
            self.link(id, parent_id);
        }
    }

    fn link(&mut self, child: IdeaId, parent: IdeaId) {
        if child == parent {
            return;
        }
        let Some(&child_index) = self.id_to_index.get(&child) else {
            return;
        };
        match self.id_to_index.get(&parent) {
            Some(&parent_index) => {
                self.graph.add_edge(parent_index, child_index, ());
            }
            None => self.waiting.entry(parent).or_default().push(child),
        }
    }

    fn unlink(&mut self, child: IdeaId, parent: IdeaId) {
        if child == parent {
            return;
        }
        match (self.id_to_index.get(&parent), self.id_to_index.get(&child)) {
            (Some(&parent_index), Some(&child_index)) => {
                if let Some(edge) = self.graph.find_edge(parent_index, child_index) {
                    self.graph.remove_edge(edge);
                }
            }
            _ => {
                if let Some(list) = self.waiting.get_mut(&parent) {
                    list.retain(|&waiting| waiting != child);
                    if list.is_empty() {
                        self.waiting.remove(&parent);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Get the number of ideas.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: IdeaId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    pub fn get(&self, id: IdeaId) -> Option<&Idea> {
        self.id_to_index.get(&id).map(|&index| &self.graph[index])
    }

    pub fn get_mut(&mut self, id: IdeaId) -> Option<&mut Idea> {
        let index = *self.id_to_index.get(&id)?;
        self.graph.node_weight_mut(index)
    }

    /// All ideas, in no particular order.
    pub fn ideas(&self) -> impl Iterator<Item = &Idea> {
        self.graph.node_weights()
    }

    /// All ideas, mutably, in no particular order.
    pub fn ideas_mut(&mut self) -> impl Iterator<Item = &mut Idea> {
        self.graph.node_weights_mut()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> Vec<IdeaId> {
        let mut ids: Vec<IdeaId> = self.id_to_index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Persisted records of every idea, ordered by id.
    pub fn records(&self) -> Vec<IdeaRecord> {
        let mut records: Vec<IdeaRecord> = self.ideas().map(Idea::to_record).collect();
        records.sort_unstable_by_key(|record| record.id);
        records
    }

    /// One more than the largest id in use (1 for an empty store).
    pub fn next_id(&self) -> IdeaId {
        self.id_to_index
            .keys()
            .map(|id| id.0)
            .max()
            .map_or(IdeaId(1), |max| IdeaId(max + 1))
    }

    // =========================================================================
    // Tree queries
    // =========================================================================

    /// The parent of an idea; None for roots and for dangling parent ids.
    pub fn parent(&self, id: IdeaId) -> Option<IdeaId> {
        let idea = self.get(id)?;
        self.parent_of(idea).map(Idea::id)
    }

    fn parent_of(&self, idea: &Idea) -> Option<&Idea> {
        if idea.is_self_parented() {
            None
        } else {
            self.get(idea.parent_id())
        }
    }

    /// The idea followed by its ancestors up to the root.
    ///
    /// Stops early on a parent cycle, which only corrupt input can create.
    fn chain(&self, id: IdeaId) -> Vec<&Idea> {
        let mut chain: Vec<&Idea> = Vec::new();
        let mut current = self.get(id);
        while let Some(idea) = current {
            if chain.iter().any(|seen| seen.id() == idea.id()) {
                break;
            }
            chain.push(idea);
            current = self.parent_of(idea);
        }
        chain
    }

    /// Depth from the root (root = 1). None if the idea does not exist.
    pub fn level(&self, id: IdeaId) -> Option<u32> {
        match self.chain(id).len() {
            0 => None,
            depth => Some(depth as u32),
        }
    }

    /// Ideas without a resolvable parent, in ascending id order.
    pub fn roots(&self) -> Vec<IdeaId> {
        let mut roots: Vec<IdeaId> = self
            .ideas()
            .filter(|idea| self.parent_of(idea).is_none())
            .map(Idea::id)
            .collect();
        roots.sort_unstable();
        roots
    }

    /// Whether any ancestor is collapsed.
    pub fn is_hidden(&self, id: IdeaId) -> bool {
        self.chain(id).iter().skip(1).any(|ancestor| ancestor.collapsed)
    }

    /// Whether the idea sits on the left half of its tree.
    ///
    /// Decided by the sign of the level-2 ancestor's offset; false for roots.
    pub fn is_left(&self, id: IdeaId) -> bool {
        let chain = self.chain(id);
        chain.len() >= 2 && chain[chain.len() - 2].pos.x < 0.0
    }

    /// Direct children in ascending id order.
    pub fn children(&self, id: IdeaId) -> Vec<IdeaId> {
        let Some(&index) = self.id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut children: Vec<IdeaId> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|child| self.graph[child].id())
            .collect();
        children.sort_unstable();
        children
    }

    pub fn has_children(&self, id: IdeaId) -> bool {
        self.id_to_index.get(&id).is_some_and(|&index| {
            self.graph
                .neighbors_directed(index, Direction::Outgoing)
                .next()
                .is_some()
        })
    }

    /// Other children of the same parent, ordered by vertical offset.
    pub fn siblings(&self, id: IdeaId) -> Vec<IdeaId> {
        let Some(parent) = self.parent(id) else {
            return Vec::new();
        };
        let mut siblings: Vec<&Idea> = self
            .children(parent)
            .into_iter()
            .filter(|&sibling| sibling != id)
            .filter_map(|sibling| self.get(sibling))
            .collect();
        siblings.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        siblings.into_iter().map(Idea::id).collect()
    }

    /// The idea followed by all its descendants, pre-order.
    pub fn this_and_descendants(&self, id: IdeaId) -> Vec<IdeaId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        result
    }

    /// All descendants, pre-order, without the idea itself.
    pub fn descendants(&self, id: IdeaId) -> Vec<IdeaId> {
        let mut all = self.this_and_descendants(id);
        if !all.is_empty() {
            all.remove(0);
        }
        all
    }

    /// The idea followed by its ancestors up to the root.
    pub fn this_and_ancestors(&self, id: IdeaId) -> Vec<IdeaId> {
        self.chain(id).into_iter().map(Idea::id).collect()
    }

    /// Absolute position of the idea's center.
    ///
    /// Hidden ideas contribute no offset of their own, so they collapse onto
    /// the position of their nearest visible ancestor.
    pub fn abs_pos(&self, id: IdeaId) -> Option<Point> {
        let chain = self.chain(id);
        let (root, rest) = chain.split_last()?;
        let mut pos = root.pos;
        let mut collapsed_above = root.collapsed;
        for idea in rest.iter().rev() {
            if !collapsed_above {
                pos = pos.plus(idea.pos);
            }
            collapsed_above |= idea.collapsed;
        }
        Some(pos)
    }

    /// The idea's box in model space.
    pub fn rect(&self, id: IdeaId) -> Option<Rect> {
        let idea = self.get(id)?;
        let center = self.abs_pos(id)?;
        Some(Rect::centered(center, idea.width(), idea.height()))
    }

    /// Connection anchors in model space.
    pub fn connection_points(&self, id: IdeaId) -> Vec<Point> {
        match (self.get(id), self.abs_pos(id)) {
            (Some(idea), Some(center)) => idea
                .measure()
                .connection_offsets
                .iter()
                .map(|offset| center.plus(*offset))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Selected ideas that are not hidden, in ascending id order.
    pub fn selected(&self) -> Vec<IdeaId> {
        let mut selected: Vec<IdeaId> = self
            .ideas()
            .filter(|idea| idea.selected)
            .map(Idea::id)
            .filter(|&id| !self.is_hidden(id))
            .collect();
        selected.sort_unstable();
        selected
    }
}

impl Default for IdeaStore {
    fn default() -> Self {
        Self::new()
    }
}
