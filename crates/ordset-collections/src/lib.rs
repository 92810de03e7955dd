//! Ordered hash-indexed collections.
//!
//! - [`IndexedSet`]: an ordered set of unique items with O(1) membership and
//!   position lookup, plus set algebra.
//! - [`UniqueSet`]: an ordered list of [`ItemPair`]s forming a one-to-one
//!   mapping between two key spaces, with O(1) lookup from either side.
//!   Insertions are two-phase: a failure while updating the second key index
//!   rolls back the first, so a rejected pair never leaves partial state.
//!
//! Both collections keep their items in a vector and maintain hash indices
//! from keys to positions. Edits in the middle of the sequence re-index the
//! affected tail, so they cost O(n).
//!
//! Keys must not change their `Hash`/`Eq` while stored. If an index is found
//! out of sync with the item list, [`IndexedSet`] reports
//! [`IndexedSetError::IndexCorrupted`] and leaves itself unchanged, while
//! [`UniqueSet`] clears itself and reports [`UniqueSetError::Corrupted`].

pub mod indexed_set;
pub mod item_pair;
pub mod unique_set;

mod undo;

pub use self::{
    indexed_set::{IndexedSet, IndexedSetError},
    item_pair::ItemPair,
    unique_set::{UniqueSet, UniqueSetError},
};
