//! Geometry primitives shared by the tree model and the layout engine.
//!
//! Both types are small `Copy` values. Every operation returns a new value;
//! nothing is mutated in place.

mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;
