//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based spatial index over the boxes of
//! visible ideas, used for drop-target hit testing and for finding the
//! nearest idea during keyboard navigation.

mod rtree;

pub use rtree::{IdeaBox, SpatialIndex};
