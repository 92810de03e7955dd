//! A bidirectional one-to-one mapping stored as an ordered list of pairs.
//!
//! [`UniqueSet`] keeps [`ItemPair`]s in order and maintains two hash indices,
//! one per key space, mapping each key to the position of its pair. Both `A`
//! keys and `B` keys are unique across the set, so every pair can be reached
//! in O(1) from either side.
//!
//! # Examples
//!
//! ```
//! use ordset_collections::UniqueSet;
//!
//! let mut ports = UniqueSet::new();
//! ports.add(80, "http")?;
//! ports.add(443, "https")?;
//!
//! assert_eq!(ports.b_for_a(&443), Some(&"https"));
//! assert_eq!(ports.a_for_b(&"http"), Some(&80));
//!
//! // `B` keys are unique too: the failed add leaves the set untouched.
//! assert!(ports.add(8080, "http").unwrap_err().is_duplicate_b());
//! assert_eq!(ports.len(), 2);
//! assert!(!ports.contains_a(&8080));
//! # Ok::<(), ordset_collections::UniqueSetError>(())
//! ```

use std::{
    borrow::Borrow,
    collections::{HashMap, hash_map::Entry},
    hash::Hash,
    ops::Index,
    slice, vec,
};

use crate::{
    ItemPair,
    undo::{IndexEdit, UndoLog},
};

/// Errors returned by [`UniqueSet`] operations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum UniqueSetError {
    /// The `A` key is already used by another pair.
    #[display("key A is already used at position {position}")]
    DuplicateA {
        /// Position of the pair using the key.
        position: usize,
    },
    /// The `B` key is already used by another pair.
    #[display("key B is already used at position {position}")]
    DuplicateB {
        /// Position of the pair using the key.
        position: usize,
    },
    /// The index is outside of the set.
    #[display("index {index} is out of bounds for length {len}")]
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// Length of the set.
        len: usize,
    },
    /// No pair uses the `A` key.
    #[display("key A not found")]
    MissingA,
    /// No pair uses the `B` key.
    #[display("key B not found")]
    MissingB,
    /// A key index disagreed with the pair list; the set has been cleared.
    ///
    /// This only happens when a key's `Hash`/`Eq` changed after insertion.
    #[display("key index out of sync with the pair list at position {position}; set cleared")]
    Corrupted {
        /// Position at which the desync was detected.
        position: usize,
    },
}

/// An ordered collection of unique key pairs with O(1) lookup from either key.
///
/// # Invariants
///
/// - No two pairs share an `A` key, and no two pairs share a `B` key.
/// - Both indices hold exactly one entry per pair, mapping the key to the
///   position of its pair.
///
/// # Failure policy
///
/// - Inserting or replacing is a two-phase operation: both indices are
///   updated first, and if the second update fails every index edit already
///   made is rolled back. A failed call leaves the set exactly as it was.
/// - If a removal finds an index out of sync with the pair list, the set is
///   cleared and [`UniqueSetError::Corrupted`] is returned rather than
///   leaving a set that lies about its contents.
///
/// # Complexity
///
/// Lookups by key are O(1). Appending is O(1); inserting or removing in the
/// middle is O(n) because later positions are re-indexed. [`reverse`]
/// rebuilds both indices in O(n).
///
/// [`reverse`]: Self::reverse
#[derive(Debug, Clone)]
pub struct UniqueSet<A, B> {
    pairs: Vec<ItemPair<A, B>>,
    index_a: HashMap<A, usize>,
    index_b: HashMap<B, usize>,
}

impl<A, B> Default for UniqueSet<A, B> {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            index_a: HashMap::new(),
            index_b: HashMap::new(),
        }
    }
}

impl<A, B> UniqueSet<A, B> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `capacity` pairs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
            index_a: HashMap::with_capacity(capacity),
            index_b: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the set holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the pair at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemPair<A, B>> {
        self.pairs.get(index)
    }

    /// Returns the pairs in order.
    #[must_use]
    pub fn as_slice(&self) -> &[ItemPair<A, B>] {
        &self.pairs
    }

    /// Returns an iterator over the pairs in order.
    pub fn iter(&self) -> slice::Iter<'_, ItemPair<A, B>> {
        self.pairs.iter()
    }

    /// Returns an iterator over the `A` keys in pair order.
    pub fn keys_a(&self) -> impl DoubleEndedIterator<Item = &A> + ExactSizeIterator {
        self.pairs.iter().map(|pair| &pair.a)
    }

    /// Returns an iterator over the `B` keys in pair order.
    pub fn keys_b(&self) -> impl DoubleEndedIterator<Item = &B> + ExactSizeIterator {
        self.pairs.iter().map(|pair| &pair.b)
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.index_a.clear();
        self.index_b.clear();
        self.pairs.clear();
    }
}

impl<A, B> UniqueSet<A, B>
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
{
    /// Returns `true` if a pair uses the `A` key.
    #[must_use]
    pub fn contains_a<Q>(&self, a: &Q) -> bool
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_a.contains_key(a)
    }

    /// Returns `true` if a pair uses the `B` key.
    #[must_use]
    pub fn contains_b<Q>(&self, b: &Q) -> bool
    where
        B: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_b.contains_key(b)
    }

    /// Returns `true` if the set holds exactly the pair `(a, b)`.
    #[must_use]
    pub fn contains(&self, a: &A, b: &B) -> bool {
        self.index_of(a, b).is_some()
    }

    /// Returns the position of the pair using the `A` key.
    #[must_use]
    pub fn index_of_a<Q>(&self, a: &Q) -> Option<usize>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_a.get(a).copied()
    }

    /// Returns the position of the pair using the `B` key.
    #[must_use]
    pub fn index_of_b<Q>(&self, b: &Q) -> Option<usize>
    where
        B: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_b.get(b).copied()
    }

    /// Returns the position of the pair `(a, b)`.
    #[must_use]
    pub fn index_of(&self, a: &A, b: &B) -> Option<usize> {
        let position = self.index_of_a(a)?;
        (self.pairs[position].b == *b).then_some(position)
    }

    /// Returns the pair using the `A` key.
    #[must_use]
    pub fn get_a<Q>(&self, a: &Q) -> Option<&ItemPair<A, B>>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of_a(a).map(|position| &self.pairs[position])
    }

    /// Returns the pair using the `B` key.
    #[must_use]
    pub fn get_b<Q>(&self, b: &Q) -> Option<&ItemPair<A, B>>
    where
        B: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of_b(b).map(|position| &self.pairs[position])
    }

    /// Returns the `B` key paired with the `A` key.
    #[must_use]
    pub fn b_for_a<Q>(&self, a: &Q) -> Option<&B>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_a(a).map(|pair| &pair.b)
    }

    /// Returns the `A` key paired with the `B` key.
    #[must_use]
    pub fn a_for_b<Q>(&self, b: &Q) -> Option<&A>
    where
        B: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_b(b).map(|pair| &pair.a)
    }

    /// Appends the pair `(a, b)` and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::DuplicateA`] or [`UniqueSetError::DuplicateB`]
    /// if either key is already used. The set is left unchanged.
    pub fn add(&mut self, a: A, b: B) -> Result<usize, UniqueSetError> {
        let position = self.pairs.len();
        self.insert(position, a, b)?;
        Ok(position)
    }

    /// Appends `pair` and returns its position.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn add_pair(&mut self, pair: ItemPair<A, B>) -> Result<usize, UniqueSetError> {
        let ItemPair { a, b } = pair;
        self.add(a, b)
    }

    /// Inserts the pair `(a, b)` at `index`, shifting later pairs back.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::OutOfBounds`] if `index > len`, and
    /// [`UniqueSetError::DuplicateA`] or [`UniqueSetError::DuplicateB`] if
    /// either key is already used. The set is left unchanged on these
    /// errors.
    pub fn insert(&mut self, index: usize, a: A, b: B) -> Result<(), UniqueSetError> {
        if index > self.pairs.len() {
            return Err(UniqueSetError::OutOfBounds {
                index,
                len: self.pairs.len(),
            });
        }

        let mut undo = UndoLog::new();
        if let Err(err) = self.claim(a.clone(), b.clone(), index, &mut undo) {
            undo.rollback(&mut self.index_a, &mut self.index_b);
            return Err(err);
        }
        undo.commit();

        self.pairs.insert(index, ItemPair::new(a, b));
        self.reindex_from(index + 1)
    }

    /// Replaces the pair at `index` with `(a, b)` and returns the old pair.
    ///
    /// The new keys may reuse the old pair's keys.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::OutOfBounds`] if `index >= len`, and
    /// [`UniqueSetError::DuplicateA`] or [`UniqueSetError::DuplicateB`] if a
    /// key is used by another pair; the set is left unchanged on these
    /// errors. Returns [`UniqueSetError::Corrupted`] (and clears the set) if
    /// the old pair is missing from an index.
    pub fn replace(&mut self, index: usize, a: A, b: B) -> Result<ItemPair<A, B>, UniqueSetError> {
        let Some(old) = self.pairs.get(index) else {
            return Err(UniqueSetError::OutOfBounds {
                index,
                len: self.pairs.len(),
            });
        };
        let (old_a, old_b) = (old.a.clone(), old.b.clone());

        let released_a = self.index_a.remove(&old_a);
        let released_b = self.index_b.remove(&old_b);
        if released_a != Some(index) || released_b != Some(index) {
            return Err(self.clear_corrupted(index));
        }

        let mut undo = UndoLog::new();
        undo.push(IndexEdit::ReleasedA(old_a, index));
        undo.push(IndexEdit::ReleasedB(old_b, index));
        if let Err(err) = self.claim(a.clone(), b.clone(), index, &mut undo) {
            undo.rollback(&mut self.index_a, &mut self.index_b);
            return Err(err);
        }
        undo.commit();

        Ok(std::mem::replace(&mut self.pairs[index], ItemPair::new(a, b)))
    }

    /// Removes and returns the pair at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::OutOfBounds`] if `index >= len`, and
    /// [`UniqueSetError::Corrupted`] (after clearing the set) if the pair is
    /// missing from an index.
    pub fn remove_at(&mut self, index: usize) -> Result<ItemPair<A, B>, UniqueSetError> {
        let Some(pair) = self.pairs.get(index) else {
            return Err(UniqueSetError::OutOfBounds {
                index,
                len: self.pairs.len(),
            });
        };

        let removed_a = self.index_a.remove(&pair.a);
        let removed_b = self.index_b.remove(&pair.b);
        if removed_a != Some(index) || removed_b != Some(index) {
            return Err(self.clear_corrupted(index));
        }

        let pair = self.pairs.remove(index);
        self.reindex_from(index)?;
        Ok(pair)
    }

    /// Removes and returns the pair using the `A` key.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::MissingA`] if no pair uses the key, and
    /// [`UniqueSetError::Corrupted`] as described for
    /// [`remove_at`](Self::remove_at).
    pub fn remove_a<Q>(&mut self, a: &Q) -> Result<ItemPair<A, B>, UniqueSetError>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.index_of_a(a).ok_or(UniqueSetError::MissingA)?;
        self.remove_at(index)
    }

    /// Removes and returns the pair using the `B` key.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::MissingB`] if no pair uses the key, and
    /// [`UniqueSetError::Corrupted`] as described for
    /// [`remove_at`](Self::remove_at).
    pub fn remove_b<Q>(&mut self, b: &Q) -> Result<ItemPair<A, B>, UniqueSetError>
    where
        B: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.index_of_b(b).ok_or(UniqueSetError::MissingB)?;
        self.remove_at(index)
    }

    /// Removes the pair `(a, b)` if present.
    ///
    /// Returns `false` if the set does not hold exactly this pair.
    ///
    /// # Errors
    ///
    /// Returns [`UniqueSetError::Corrupted`] as described for
    /// [`remove_at`](Self::remove_at).
    pub fn remove(&mut self, a: &A, b: &B) -> Result<bool, UniqueSetError> {
        match self.index_of(a, b) {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Reverses the order of the pairs.
    ///
    /// Every position changes, so both indices are rebuilt from scratch.
    pub fn reverse(&mut self) {
        self.pairs.reverse();
        self.rebuild_indices();
    }

    /// Inserts both keys into the indices, recording each edit in `undo`.
    fn claim(
        &mut self,
        a: A,
        b: B,
        position: usize,
        undo: &mut UndoLog<A, B>,
    ) -> Result<(), UniqueSetError> {
        match self.index_a.entry(a) {
            Entry::Occupied(entry) => {
                return Err(UniqueSetError::DuplicateA {
                    position: *entry.get(),
                });
            }
            Entry::Vacant(entry) => {
                undo.push(IndexEdit::ClaimedA(entry.key().clone()));
                entry.insert(position);
            }
        }
        match self.index_b.entry(b) {
            Entry::Occupied(entry) => {
                return Err(UniqueSetError::DuplicateB {
                    position: *entry.get(),
                });
            }
            Entry::Vacant(entry) => {
                undo.push(IndexEdit::ClaimedB(entry.key().clone()));
                entry.insert(position);
            }
        }
        Ok(())
    }

    /// Rewrites the index entries of every pair from position `start` on.
    fn reindex_from(&mut self, start: usize) -> Result<(), UniqueSetError> {
        let mut desync = None;
        for (position, pair) in self.pairs.iter().enumerate().skip(start) {
            match (self.index_a.get_mut(&pair.a), self.index_b.get_mut(&pair.b)) {
                (Some(a), Some(b)) => {
                    *a = position;
                    *b = position;
                }
                _ => {
                    desync = Some(position);
                    break;
                }
            }
        }
        match desync {
            Some(position) => Err(self.clear_corrupted(position)),
            None => Ok(()),
        }
    }

    fn rebuild_indices(&mut self) {
        log::debug!("rebuilding key indices for {} pair(s)", self.pairs.len());
        self.index_a.clear();
        self.index_b.clear();
        for (position, pair) in self.pairs.iter().enumerate() {
            self.index_a.insert(pair.a.clone(), position);
            self.index_b.insert(pair.b.clone(), position);
        }
    }

    fn clear_corrupted(&mut self, position: usize) -> UniqueSetError {
        log::error!(
            "key index out of sync at position {position} of {}, clearing set",
            self.pairs.len()
        );
        self.clear();
        UniqueSetError::Corrupted { position }
    }
}

impl<A, B> Index<usize> for UniqueSet<A, B> {
    type Output = ItemPair<A, B>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.pairs[index]
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for UniqueSet<A, B> {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl<A: Eq, B: Eq> Eq for UniqueSet<A, B> {}

impl<A, B> IntoIterator for UniqueSet<A, B> {
    type Item = ItemPair<A, B>;
    type IntoIter = vec::IntoIter<ItemPair<A, B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a, A, B> IntoIterator for &'a UniqueSet<A, B> {
    type Item = &'a ItemPair<A, B>;
    type IntoIter = slice::Iter<'a, ItemPair<A, B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        hash::{Hash, Hasher},
    };

    use super::*;

    #[track_caller]
    fn assert_consistent<A, B>(set: &UniqueSet<A, B>)
    where
        A: Eq + Hash + Clone + std::fmt::Debug,
        B: Eq + Hash + Clone + std::fmt::Debug,
    {
        assert_eq!(set.index_a.len(), set.len());
        assert_eq!(set.index_b.len(), set.len());
        for (i, pair) in set.iter().enumerate() {
            assert_eq!(set.index_of_a(&pair.a), Some(i), "position of {:?}", pair.a);
            assert_eq!(set.index_of_b(&pair.b), Some(i), "position of {:?}", pair.b);
        }
    }

    fn sample() -> UniqueSet<i32, &'static str> {
        let mut set = UniqueSet::new();
        set.add(1, "a").unwrap();
        set.add(2, "b").unwrap();
        set.add(3, "c").unwrap();
        set
    }

    /// Key whose hash can change after insertion.
    #[derive(Debug, Clone)]
    struct Shifty(Cell<i32>);

    impl PartialEq for Shifty {
        fn eq(&self, other: &Self) -> bool {
            self.0.get() == other.0.get()
        }
    }

    impl Eq for Shifty {}

    impl Hash for Shifty {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.0.get().hash(state);
        }
    }

    mod insertion {
        use super::*;

        #[test]
        fn test_duplicate_b_is_rolled_back() {
            let mut set = UniqueSet::new();
            set.add(1, "a").unwrap();
            assert_eq!(
                set.add(2, "a"),
                Err(UniqueSetError::DuplicateB { position: 0 })
            );
            assert_eq!(set.len(), 1);
            assert!(!set.contains_a(&2));
            assert_eq!(set.as_slice(), &[ItemPair::new(1, "a")]);
            assert_consistent(&set);
        }

        #[test]
        fn test_duplicate_a_is_rejected() {
            let mut set = sample();
            assert_eq!(
                set.add(2, "z"),
                Err(UniqueSetError::DuplicateA { position: 1 })
            );
            assert!(!set.contains_b(&"z"));
            assert_consistent(&set);
        }

        #[test]
        fn test_insert_in_the_middle() {
            let mut set = sample();
            set.insert(1, 9, "z").unwrap();
            set.insert(0, 0, "y").unwrap();
            assert_eq!(set.keys_a().copied().collect::<Vec<_>>(), vec![0, 1, 9, 2, 3]);
            assert_eq!(set.keys_b().copied().collect::<Vec<_>>(), vec!["y", "a", "z", "b", "c"]);
            assert_consistent(&set);
        }

        #[test]
        fn test_insert_out_of_bounds() {
            let mut set = sample();
            assert_eq!(
                set.insert(4, 9, "z"),
                Err(UniqueSetError::OutOfBounds { index: 4, len: 3 })
            );
            assert_consistent(&set);
        }

        #[test]
        fn test_add_pair() {
            let mut set: UniqueSet<i32, char> = UniqueSet::new();
            assert_eq!(set.add_pair((5, 'x').into()), Ok(0));
            assert_eq!(set.add_pair(ItemPair::new(6, 'y')), Ok(1));
            assert_eq!(set[1], ItemPair::new(6, 'y'));
        }
    }

    mod lookup {
        use super::*;

        #[test]
        fn test_lookups() {
            let set = sample();
            assert_eq!(set.index_of_a(&2), Some(1));
            assert_eq!(set.index_of_b(&"c"), Some(2));
            assert_eq!(set.get_a(&3), Some(&ItemPair::new(3, "c")));
            assert_eq!(set.get_b(&"a"), Some(&ItemPair::new(1, "a")));
            assert_eq!(set.b_for_a(&1), Some(&"a"));
            assert_eq!(set.a_for_b(&"b"), Some(&2));
            assert_eq!(set.b_for_a(&7), None);
            assert_eq!(set.get(5), None);
        }

        #[test]
        fn test_pair_lookup() {
            let set = sample();
            assert_eq!(set.index_of(&2, &"b"), Some(1));
            assert_eq!(set.index_of(&2, &"c"), None);
            assert!(set.contains(&3, &"c"));
            assert!(!set.contains(&3, &"a"));
        }

        #[test]
        fn test_borrowed_lookup() {
            let mut set = UniqueSet::new();
            set.add("one".to_owned(), 1u8).unwrap();
            assert!(set.contains_a("one"));
            assert_eq!(set.a_for_b(&1).map(String::as_str), Some("one"));
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn test_remove_a() {
            let mut set = UniqueSet::new();
            set.add(1, "a").unwrap();
            set.add(2, "b").unwrap();
            assert_eq!(set.remove_a(&1), Ok(ItemPair::new(1, "a")));
            assert_eq!(set.as_slice(), &[ItemPair::new(2, "b")]);
            assert!(!set.contains_b(&"a"));
            assert_consistent(&set);
        }

        #[test]
        fn test_remove_b_and_pair() {
            let mut set = sample();
            assert_eq!(set.remove_b(&"b"), Ok(ItemPair::new(2, "b")));
            assert_eq!(set.remove(&3, &"a"), Ok(false));
            assert_eq!(set.remove(&3, &"c"), Ok(true));
            assert_eq!(set.remove_a(&7), Err(UniqueSetError::MissingA));
            assert_eq!(set.remove_b(&"q"), Err(UniqueSetError::MissingB));
            assert_eq!(set.as_slice(), &[ItemPair::new(1, "a")]);
            assert_consistent(&set);
        }

        #[test]
        fn test_remove_at_reindexes() {
            let mut set = sample();
            assert_eq!(set.remove_at(0), Ok(ItemPair::new(1, "a")));
            assert_eq!(set.index_of_a(&3), Some(1));
            assert!(set.remove_at(2).unwrap_err().is_out_of_bounds());
            assert_consistent(&set);
        }

        #[test]
        fn test_desync_clears_set() {
            let mut set = UniqueSet::new();
            set.add(Shifty(Cell::new(1)), 'x').unwrap();
            set.add(Shifty(Cell::new(2)), 'y').unwrap();
            set[0].a.0.set(10);

            assert_eq!(
                set.remove_at(0),
                Err(UniqueSetError::Corrupted { position: 0 })
            );
            assert!(set.is_empty());
            assert!(!set.contains_b(&'y'));
            assert_consistent(&set);
        }
    }

    mod replacement {
        use super::*;

        #[test]
        fn test_replace() {
            let mut set = sample();
            assert_eq!(set.replace(1, 20, "bb"), Ok(ItemPair::new(2, "b")));
            assert!(!set.contains_a(&2));
            assert!(!set.contains_b(&"b"));
            assert_eq!(set.get_a(&20), Some(&ItemPair::new(20, "bb")));
            assert_consistent(&set);
        }

        #[test]
        fn test_replace_reusing_own_keys() {
            let mut set = sample();
            assert_eq!(set.replace(1, 2, "bb"), Ok(ItemPair::new(2, "b")));
            assert_eq!(set.replace(1, 22, "bb"), Ok(ItemPair::new(2, "bb")));
            assert_consistent(&set);
        }

        #[test]
        fn test_failed_replace_restores_old_pair() {
            let mut set = sample();
            let before = set.clone();
            assert_eq!(
                set.replace(1, 9, "c"),
                Err(UniqueSetError::DuplicateB { position: 2 })
            );
            assert_eq!(
                set.replace(1, 3, "q"),
                Err(UniqueSetError::DuplicateA { position: 2 })
            );
            assert_eq!(set, before);
            assert_eq!(set.index_a, before.index_a);
            assert_eq!(set.index_b, before.index_b);
            assert!(set.replace(3, 9, "z").unwrap_err().is_out_of_bounds());
        }
    }

    #[test]
    fn test_reverse() {
        let mut set = sample();
        set.reverse();
        assert_eq!(set.keys_a().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(set.b_for_a(&3), Some(&"c"));
        assert_eq!(set.index_of_b(&"a"), Some(2));
        assert_consistent(&set);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            UniqueSetError::DuplicateB { position: 3 }.to_string(),
            "key B is already used at position 3"
        );
        assert_eq!(
            UniqueSetError::OutOfBounds { index: 5, len: 2 }.to_string(),
            "index 5 is out of bounds for length 2"
        );
    }
}
