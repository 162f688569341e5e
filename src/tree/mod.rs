//! Tree module - ideas and the store that links them into a forest.

mod idea;
mod store;

pub use idea::{Idea, IdeaId, IdeaRecord, Margins, Measure};
pub use store::IdeaStore;
