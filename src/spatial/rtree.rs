//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Nearest idea (by center distance) matching a predicate
//! - Point-in-rectangle hit testing

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::{Point, Rect};
use crate::tree::IdeaId;

/// An idea's box in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdeaBox {
    /// The idea identifier.
    pub id: IdeaId,
    /// Box in model space.
    pub rect: Rect,
    /// Absolute position of the idea (its box center).
    pub center: Point,
}

impl IdeaBox {
    /// Create a new IdeaBox.
    pub fn new(id: IdeaId, rect: Rect, center: Point) -> Self {
        Self { id, rect, center }
    }
}

impl RTreeObject for IdeaBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.left, self.rect.top],
            [self.rect.right(), self.rect.bottom()],
        )
    }
}

impl PointDistance for IdeaBox {
    // Distance to the center is never below the distance to the envelope,
    // which keeps nearest-neighbor iteration ordered.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.center.distance_2(Point::new(point[0], point[1]))
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.rect.contains(Point::new(point[0], point[1]))
    }
}

/// Spatial index for visible ideas.
///
/// Uses an R*-tree for efficient spatial queries.
pub struct SpatialIndex {
    tree: RTree<IdeaBox>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Find the idea nearest to `from` among those accepted by `accept`.
    pub fn nearest_matching(
        &self,
        from: Point,
        mut accept: impl FnMut(&IdeaBox) -> bool,
    ) -> Option<IdeaId> {
        self.tree
            .nearest_neighbor_iter(&[from.x, from.y])
            .find(|idea| accept(idea))
            .map(|idea| idea.id)
    }

    /// Find the idea whose box contains `point`, skipping `exclude`.
    ///
    /// When boxes overlap, the one whose center is closest wins.
    pub fn idea_at(&self, point: Point, exclude: Option<IdeaId>) -> Option<IdeaId> {
        self.tree
            .locate_all_at_point(&[point.x, point.y])
            .filter(|idea| Some(idea.id) != exclude)
            .min_by(|a, b| {
                a.center
                    .distance_2(point)
                    .total_cmp(&b.center.distance_2(point))
            })
            .map(|idea| idea.id)
    }

    /// Replace the contents of the index with `boxes`.
    pub fn rebuild(&mut self, boxes: Vec<IdeaBox>) {
        self.tree = RTree::bulk_load(boxes);
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
