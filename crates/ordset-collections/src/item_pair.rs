//! Key pairs stored in a [`UniqueSet`](crate::UniqueSet).

use std::fmt::{self, Display};

/// A pair of keys from two key spaces.
///
/// # Examples
///
/// ```
/// use ordset_collections::ItemPair;
///
/// let pair = ItemPair::new(1, "one");
/// assert_eq!(pair.a, 1);
/// assert_eq!(pair.b, "one");
/// assert_eq!(pair.to_string(), "1 one");
/// assert_eq!(pair.into_tuple(), (1, "one"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemPair<A, B> {
    /// Key from the first key space.
    pub a: A,
    /// Key from the second key space.
    pub b: B,
}

impl<A, B> ItemPair<A, B> {
    /// Creates a pair.
    #[must_use]
    pub const fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// Consumes the pair and returns its keys.
    #[must_use]
    pub fn into_tuple(self) -> (A, B) {
        (self.a, self.b)
    }
}

impl<A, B> From<(A, B)> for ItemPair<A, B> {
    fn from((a, b): (A, B)) -> Self {
        Self::new(a, b)
    }
}

impl<A, B> From<ItemPair<A, B>> for (A, B) {
    fn from(pair: ItemPair<A, B>) -> Self {
        pair.into_tuple()
    }
}

impl<A: Display, B: Display> Display for ItemPair<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.a, self.b)
    }
}
