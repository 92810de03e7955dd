//! An ordered set with O(1) membership and position lookup.
//!
//! [`IndexedSet`] keeps its items in insertion order in a vector and
//! maintains a hash index from each item to its position. Lookups are O(1);
//! structural edits in the middle of the sequence (`insert`, `remove_at`)
//! are O(n) because every position after the edit point is re-indexed.
//!
//! # Examples
//!
//! ```
//! use ordset_collections::IndexedSet;
//!
//! let mut set: IndexedSet<&str> = ["red", "green", "blue"].into_iter().collect();
//! assert_eq!(set.index_of("green"), Some(1));
//!
//! set.insert(0, "black")?;
//! assert_eq!(set.index_of("green"), Some(2));
//!
//! set.remove("red")?;
//! assert_eq!(set.as_slice(), &["black", "green", "blue"]);
//! # Ok::<(), ordset_collections::IndexedSetError>(())
//! ```

use std::{
    borrow::Borrow,
    collections::HashMap,
    hash::Hash,
    ops::Index,
    slice,
    vec,
};

/// Errors returned by [`IndexedSet`] operations.
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
pub enum IndexedSetError {
    /// The item is already present.
    #[display("item is already present at position {position}")]
    DuplicateItem {
        /// Position of the existing item.
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
    /// The position index has no (or a wrong) entry for an item.
    ///
    /// This only happens when an item's `Hash`/`Eq` changed after insertion.
    #[display("position index is out of sync at position {position}")]
    IndexCorrupted {
        /// Position of the item whose index entry is missing.
        position: usize,
    },
}

/// An insertion-ordered set with O(1) value-to-position lookup.
///
/// # Invariants
///
/// - `items` holds no two equal values.
/// - For every position `i`, the index maps `items[i]` to `i`.
///
/// Every mutating method either updates both structures or leaves both
/// unchanged.
///
/// # Set algebra
///
/// [`union`](Self::union), [`intersection`](Self::intersection),
/// [`difference`](Self::difference) and
/// [`symmetric_difference`](Self::symmetric_difference) return new sets and
/// leave their operands untouched. Equality is order-independent.
///
/// # Iteration
///
/// Iterators borrow the set, so it cannot be mutated while iterating.
#[derive(Debug, Clone)]
pub struct IndexedSet<T> {
    items: Vec<T>,
    positions: HashMap<T, usize>,
}

impl<T> Default for IndexedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T> IndexedSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the items in order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consumes the set and returns its items in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Returns an iterator over the items in order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.items.clear();
    }
}

impl<T> IndexedSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Returns `true` if the set contains `item`.
    #[must_use]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(item)
    }

    /// Returns `true` if the set contains every item of `items`.
    pub fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items.into_iter().all(|item| self.contains(item))
    }

    /// Returns the position of `item`.
    #[must_use]
    pub fn index_of<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(item).copied()
    }

    /// Appends `item` and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`IndexedSetError::DuplicateItem`] if `item` is already
    /// present; the set is left unchanged. Use [`include`](Self::include) to
    /// skip duplicates silently.
    pub fn add(&mut self, item: T) -> Result<usize, IndexedSetError> {
        if let Some(position) = self.index_of(&item) {
            return Err(IndexedSetError::DuplicateItem { position });
        }
        Ok(self.push_new(item))
    }

    /// Appends every item of `items`.
    ///
    /// # Errors
    ///
    /// Stops at the first duplicate and returns
    /// [`IndexedSetError::DuplicateItem`]; items appended before it stay in
    /// the set.
    pub fn add_all<I>(&mut self, items: I) -> Result<(), IndexedSetError>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    /// Appends `item` unless it is already present.
    ///
    /// Returns `true` if the item was added.
    pub fn include(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.push_new(item);
        true
    }

    /// Appends every item of `items` not already present.
    ///
    /// Returns the number of items added.
    pub fn include_all<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .map(|item| self.include(item))
            .filter(|added| *added)
            .count()
    }

    /// Inserts `item` at `index`, shifting later items back by one.
    ///
    /// Runs in O(n): every item after `index` is re-indexed.
    ///
    /// # Errors
    ///
    /// Returns [`IndexedSetError::OutOfBounds`] if `index > len`, and
    /// [`IndexedSetError::DuplicateItem`] if `item` is already present. The
    /// set is left unchanged on error.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), IndexedSetError> {
        if index > self.items.len() {
            return Err(IndexedSetError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        if let Some(position) = self.index_of(&item) {
            return Err(IndexedSetError::DuplicateItem { position });
        }
        self.positions.insert(item.clone(), index);
        self.items.insert(index, item);
        self.reindex_from(index + 1);
        Ok(())
    }

    /// Removes `item` and returns it, or `None` if it is not present.
    ///
    /// # Errors
    ///
    /// Returns [`IndexedSetError::IndexCorrupted`] if the index points at a
    /// position holding a different item. The set is left unchanged.
    pub fn remove<Q>(&mut self, item: &Q) -> Result<Option<T>, IndexedSetError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(index) = self.index_of(item) else {
            return Ok(None);
        };
        self.remove_at(index).map(Some)
    }

    /// Removes every item of `items` that is present.
    ///
    /// Returns the number of items removed.
    ///
    /// # Errors
    ///
    /// Stops at the first [`IndexedSetError::IndexCorrupted`]; items removed
    /// before it stay removed.
    pub fn remove_all<'a, I>(&mut self, items: I) -> Result<usize, IndexedSetError>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut removed = 0;
        for item in items {
            if self.remove(item)?.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Removes and returns the item at `index`, shifting later items forward.
    ///
    /// Runs in O(n): every item after `index` is re-indexed.
    ///
    /// # Errors
    ///
    /// Returns [`IndexedSetError::OutOfBounds`] if `index >= len`, and
    /// [`IndexedSetError::IndexCorrupted`] if the index has no entry for the
    /// item. The set is left unchanged on error.
    pub fn remove_at(&mut self, index: usize) -> Result<T, IndexedSetError> {
        let Some(item) = self.items.get(index) else {
            return Err(IndexedSetError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        };
        if self.positions.get(item) != Some(&index) {
            return Err(IndexedSetError::IndexCorrupted { position: index });
        }
        let item = self.items.remove(index);
        self.positions.remove(&item);
        self.reindex_from(index);
        Ok(item)
    }

    /// Replaces the item at `index` with `item` and returns the old item.
    ///
    /// # Errors
    ///
    /// Returns [`IndexedSetError::OutOfBounds`] if `index >= len`,
    /// [`IndexedSetError::DuplicateItem`] if `item` is present at another
    /// position, and [`IndexedSetError::IndexCorrupted`] if the index has no
    /// entry for the old item. The set is left unchanged on error.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, IndexedSetError> {
        let Some(old) = self.items.get(index) else {
            return Err(IndexedSetError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        };
        if self.positions.get(old) != Some(&index) {
            return Err(IndexedSetError::IndexCorrupted { position: index });
        }
        match self.index_of(&item) {
            Some(position) if position != index => {
                return Err(IndexedSetError::DuplicateItem { position });
            }
            _ => {}
        }

        let old = std::mem::replace(&mut self.items[index], item.clone());
        self.positions.remove(&old);
        self.positions.insert(item, index);
        Ok(old)
    }

    /// Returns a new set holding the items of both sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let (larger, smaller) = Self::by_size(self, other);
        let mut result = smaller.clone();
        result.items.reserve(larger.len());
        for item in larger {
            if !smaller.contains(item) {
                result.push_new(item.clone());
            }
        }
        result
    }

    /// Returns a new set holding the items present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (larger, smaller) = Self::by_size(self, other);
        let mut result = Self::new();
        for item in larger {
            if smaller.contains(item) {
                result.push_new(item.clone());
            }
        }
        result
    }

    /// Returns a new set holding the items of `self` not present in `other`,
    /// in `self`'s order.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut result = Self::new();
        for item in self {
            if !other.contains(item) {
                result.push_new(item.clone());
            }
        }
        result
    }

    /// Returns a new set holding the items present in exactly one of the sets.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        let (larger, smaller) = Self::by_size(self, other);
        let mut matched = vec![false; smaller.len()];
        let mut result = Self::new();
        for item in larger {
            match smaller.index_of(item) {
                Some(position) => matched[position] = true,
                None => {
                    result.push_new(item.clone());
                }
            }
        }
        for (item, _) in smaller.iter().zip(matched).filter(|(_, matched)| !matched) {
            result.push_new(item.clone());
        }
        result
    }

    fn by_size<'a>(a: &'a Self, b: &'a Self) -> (&'a Self, &'a Self) {
        if a.len() < b.len() { (b, a) } else { (a, b) }
    }

    /// Appends an item known to be absent.
    fn push_new(&mut self, item: T) -> usize {
        let position = self.items.len();
        self.positions.insert(item.clone(), position);
        self.items.push(item);
        position
    }

    /// Rewrites the index entries of every item from position `start` on.
    fn reindex_from(&mut self, start: usize) {
        for (position, item) in self.items.iter().enumerate().skip(start) {
            match self.positions.get_mut(item) {
                Some(entry) => *entry = position,
                None => {
                    log::error!("missing index entry at position {position}, restoring it");
                    self.positions.insert(item.clone(), position);
                }
            }
        }
    }
}

impl<T> Index<usize> for IndexedSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> PartialEq for IndexedSet<T>
where
    T: Eq + Hash + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.contains_all(other)
    }
}

impl<T> Eq for IndexedSet<T> where T: Eq + Hash + Clone {}

impl<T> FromIterator<T> for IndexedSet<T>
where
    T: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for IndexedSet<T>
where
    T: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.include(item);
        }
    }
}

impl<T> IntoIterator for IndexedSet<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a IndexedSet<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
