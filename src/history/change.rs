//! Reversible per-idea changes.

use serde::{Deserialize, Serialize};

use crate::tree::{IdeaId, IdeaRecord, IdeaStore};

/// One atomic change to one idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Change {
    /// The idea did not exist before.
    Added(IdeaRecord),
    /// The idea existed with this record and is gone now.
    Removed(IdeaRecord),
    /// The idea's record changed.
    Updated {
        before: IdeaRecord,
        after: IdeaRecord,
    },
}

impl Change {
    /// Id of the idea this change touches.
    pub fn id(&self) -> IdeaId {
        match self {
            Change::Added(record) | Change::Removed(record) => record.id,
            Change::Updated { after, .. } => after.id,
        }
    }

    /// Replay the change forwards.
    pub fn apply(&self, store: &mut IdeaStore) {
        match self {
            Change::Added(record) => {
                store.add(record);
            }
            Change::Removed(record) => {
                store.remove(record.id);
            }
            Change::Updated { after, .. } => {
                store.update(after);
            }
        }
    }

    /// Replay the change backwards.
    pub fn revert(&self, store: &mut IdeaStore) {
        match self {
            Change::Added(record) => {
                store.remove(record.id);
            }
            Change::Removed(record) => {
                store.add(record);
            }
            Change::Updated { before, .. } => {
                store.update(before);
            }
        }
    }
}
