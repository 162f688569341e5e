//! Layout algorithms for the mind map.
//!
//! Layout works directly on the idea store: it reads the measured sizes and
//! margins of each idea and rewrites the relative positions of children so
//! that sibling subtrees don't overlap.

mod negotiate;
mod tree_layout;

pub use negotiate::{negotiate, required_space, stack, Slot};
pub use tree_layout::TreeLayout;
