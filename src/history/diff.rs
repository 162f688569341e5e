//! Snapshot diffing.

use std::cmp::Ordering;

use super::Change;
use crate::tree::IdeaRecord;

/// Compute the changes turning `before` into `after`.
///
/// Both snapshots are merge-joined by ascending id; the result is ordered by
/// id as well. Ideas whose record is identical in both snapshots produce no
/// change, so an unchanged snapshot yields an empty list.
pub fn diff(before: &[IdeaRecord], after: &[IdeaRecord]) -> Vec<Change> {
    let before = sorted(before);
    let after = sorted(after);

    let mut changes = Vec::new();
    let mut old = before.into_iter().peekable();
    let mut new = after.into_iter().peekable();

    loop {
        let order = match (old.peek(), new.peek()) {
            (Some(o), Some(n)) => o.id.cmp(&n.id),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => {
                if let Some(o) = old.next() {
                    changes.push(Change::Removed(o.clone()));
                }
            }
            Ordering::Greater => {
                if let Some(n) = new.next() {
                    changes.push(Change::Added(n.clone()));
                }
            }
            Ordering::Equal => {
                if let (Some(o), Some(n)) = (old.next(), new.next()) {
                    if o != n {
                        changes.push(Change::Updated {
                            before: o.clone(),
                            after: n.clone(),
                        });
                    }
                }
            }
        }
    }

    changes
}

fn sorted(records: &[IdeaRecord]) -> Vec<&IdeaRecord> {
    let mut refs: Vec<&IdeaRecord> = records.iter().collect();
    refs.sort_by_key(|record| record.id);
    refs
}
