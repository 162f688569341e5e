//! Undo/redo history.
//!
//! Mutations are not recorded one by one. Instead the caller snapshots all
//! idea records before and after an action and [`diff`] turns the two
//! snapshots into per-idea [`Change`]s, which [`UndoHistory`] keeps as one
//! undoable group.

mod change;
mod diff;
mod undo;

pub use change::Change;
pub use diff::diff;
pub use undo::{UndoGroup, UndoHistory};
