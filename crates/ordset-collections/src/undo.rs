//! Undo list for multi-step edits of the [`UniqueSet`](crate::UniqueSet)
//! key indices.
//!
//! Every edit applied to an index during a mutation is recorded here as it
//! happens. If a later step fails, [`UndoLog::rollback`] walks the log
//! backwards and applies the inverse of each edit, leaving both indices
//! exactly as they were before the mutation started. On success the log is
//! dropped with [`UndoLog::commit`].

use std::{collections::HashMap, hash::Hash};

/// A reversible edit of one of the key indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IndexEdit<A, B> {
    /// `A` was inserted into the A index.
    ClaimedA(A),
    /// `B` was inserted into the B index.
    ClaimedB(B),
    /// `A` was removed from the A index; it pointed at the given position.
    ReleasedA(A, usize),
    /// `B` was removed from the B index; it pointed at the given position.
    ReleasedB(B, usize),
}

/// LIFO log of index edits belonging to one mutation.
#[derive(Debug)]
#[must_use = "an undo log must be committed or rolled back"]
pub(crate) struct UndoLog<A, B> {
    edits: Vec<IndexEdit<A, B>>,
}

impl<A, B> UndoLog<A, B>
where
    A: Eq + Hash,
    B: Eq + Hash,
{
    pub(crate) fn new() -> Self {
        Self {
            edits: Vec::with_capacity(4),
        }
    }

    pub(crate) fn push(&mut self, edit: IndexEdit<A, B>) {
        self.edits.push(edit);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.edits.len()
    }

    /// Keeps every recorded edit.
    pub(crate) fn commit(self) {}

    /// Reverts every recorded edit, newest first.
    pub(crate) fn rollback(
        self,
        index_a: &mut HashMap<A, usize>,
        index_b: &mut HashMap<B, usize>,
    ) {
        if !self.edits.is_empty() {
            log::debug!("rolling back {} index edit(s)", self.edits.len());
        }
        for edit in self.edits.into_iter().rev() {
            match edit {
                IndexEdit::ClaimedA(a) => {
                    index_a.remove(&a);
                }
                IndexEdit::ClaimedB(b) => {
                    index_b.remove(&b);
                }
                IndexEdit::ReleasedA(a, position) => {
                    index_a.insert(a, position);
                }
                IndexEdit::ReleasedB(b, position) => {
                    index_b.insert(b, position);
                }
            }
        }
    }
}
