//! Arithmetic progressions over `i64`.
//!
//! This module provides [`Counter`], an immutable progression described by a
//! start value, a span (`count`) and a step. It is the building block of
//! [`Range`](crate::Range).
//!
//! Note that `count` is the width of the covered interval, not the number of
//! values produced: `Counter::new(0, 10, 3)` spans `0..=9` and yields
//! `0, 3, 6, 9`.
//!
//! # Examples
//!
//! ```
//! use ordset_range::Counter;
//!
//! let counter = Counter::from_bounds_with_step(10, 20, 5)?;
//! assert_eq!(counter.iter().collect::<Vec<_>>(), vec![10, 15, 20]);
//! assert!(counter.contains(15));
//! assert!(!counter.contains(16));
//! # Ok::<(), ordset_range::CounterError>(())
//! ```

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    iter::FusedIterator,
};

/// Errors returned when constructing a [`Counter`].
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
pub enum CounterError {
    /// The span of the counter was negative.
    #[display("counter count must not be negative, got {count}")]
    NegativeCount {
        /// The rejected count.
        count: i64,
    },
    /// The step was zero or negative.
    #[display("counter step must be at least 1, got {step}")]
    InvalidStep {
        /// The rejected step.
        step: i64,
    },
    /// Deriving the end (or the span) of the counter overflowed `i64`.
    #[display("counter bounds overflow i64")]
    Overflow,
}

/// An immutable arithmetic progression `{start, count, step}`.
///
/// The progression covers `start..=end` where `end = start + count - 1`, and
/// contains every value `start + k * step` inside that interval.
///
/// # Ordering
///
/// Counters are only partially ordered, by interval position: `a < b` iff
/// `a.end() < b.start()`, and `a > b` iff `a.start() > b.end()`. Two distinct
/// counters whose intervals overlap are incomparable (`partial_cmp` returns
/// `None`). Sorting code must not assume a total order over overlapping
/// counters.
///
/// ```
/// use ordset_range::Counter;
///
/// let a = Counter::from_bounds(1, 3)?;
/// let b = Counter::from_bounds(5, 9)?;
/// let c = Counter::from_bounds(2, 6)?;
/// assert!(a < b);
/// assert_eq!(a.partial_cmp(&c), None);
/// # Ok::<(), ordset_range::CounterError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counter {
    start: i64,
    count: i64,
    step: i64,
    end: i64,
}

impl Counter {
    /// Creates a counter from its start, span and step.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NegativeCount`] if `count < 0`,
    /// [`CounterError::InvalidStep`] if `step < 1`, and
    /// [`CounterError::Overflow`] if the end cannot be represented.
    pub fn new(start: i64, count: i64, step: i64) -> Result<Self, CounterError> {
        if count < 0 {
            return Err(CounterError::NegativeCount { count });
        }
        if step < 1 {
            return Err(CounterError::InvalidStep { step });
        }
        let end = if count == 0 {
            start.saturating_sub(1)
        } else {
            start.checked_add(count - 1).ok_or(CounterError::Overflow)?
        };
        Ok(Self {
            start,
            count,
            step,
            end,
        })
    }

    /// Creates a step-1 counter from its start and span.
    ///
    /// # Errors
    ///
    /// See [`Counter::new`].
    pub fn with_count(start: i64, count: i64) -> Result<Self, CounterError> {
        Self::new(start, count, 1)
    }

    /// A counter holding exactly `value`.
    pub(crate) const fn single(value: i64) -> Self {
        Self {
            start: value,
            count: 1,
            step: 1,
            end: value,
        }
    }

    /// Creates an open-ended step-1 counter starting at `start`.
    ///
    /// The span is `i64::MAX - |start|`, so the counter reaches close to
    /// `i64::MAX` for non-negative starts.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::Overflow`] for `start == i64::MIN`.
    pub fn from_start(start: i64) -> Result<Self, CounterError> {
        let magnitude = start.checked_abs().ok_or(CounterError::Overflow)?;
        Self::new(start, i64::MAX - magnitude, 1)
    }

    /// Creates a step-1 counter covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NegativeCount`] if `end < start - 1`.
    pub fn from_bounds(start: i64, end: i64) -> Result<Self, CounterError> {
        Self::from_bounds_with_step(start, end, 1)
    }

    /// Creates a counter covering `start..=end` with the given step.
    ///
    /// The counter's `count` is `end - start + 1`; `end` itself is only
    /// produced when it lies on the progression.
    ///
    /// # Errors
    ///
    /// See [`Counter::new`].
    pub fn from_bounds_with_step(start: i64, end: i64, step: i64) -> Result<Self, CounterError> {
        let count = end
            .checked_sub(start)
            .and_then(|span| span.checked_add(1))
            .ok_or(CounterError::Overflow)?;
        Self::new(start, count, step)
    }

    /// Returns the first value of the progression.
    #[must_use]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// Returns the span of the covered interval.
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    /// Returns the step between consecutive values.
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.step
    }

    /// Returns the inclusive upper bound of the covered interval.
    ///
    /// For an empty counter this is `start - 1`, saturating at `i64::MIN`.
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Returns the number of values the progression produces.
    #[must_use]
    pub const fn len(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            ((self.count - 1) / self.step).unsigned_abs() + 1
        }
    }

    /// Returns `true` if the progression produces no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the last value the progression produces, if any.
    #[must_use]
    pub const fn last(&self) -> Option<i64> {
        if self.count == 0 {
            None
        } else {
            Some(self.start + (self.count - 1) / self.step * self.step)
        }
    }

    /// Returns `true` if `value` is one of the progression's values.
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        self.count > 0
            && value >= self.start
            && value <= self.end
            && (value - self.start) % self.step == 0
    }

    /// Returns `true` if every value of `other` is also a value of `self`.
    ///
    /// `other` must lie within `self`'s bounds, start on `self`'s
    /// progression, and step by a multiple of `self`'s step. A single-value
    /// counter is contained iff its value is; an empty counter is always
    /// contained.
    ///
    /// ```
    /// use ordset_range::Counter;
    ///
    /// let even = Counter::from_bounds_with_step(0, 100, 2)?;
    /// assert!(even.contains_counter(&Counter::from_bounds_with_step(10, 20, 4)?));
    /// assert!(!even.contains_counter(&Counter::from_bounds_with_step(11, 21, 4)?));
    /// assert!(!even.contains_counter(&Counter::from_bounds_with_step(10, 20, 3)?));
    /// # Ok::<(), ordset_range::CounterError>(())
    /// ```
    #[must_use]
    pub fn contains_counter(&self, other: &Counter) -> bool {
        match other.len() {
            0 => true,
            1 => self.contains(other.start),
            _ => {
                other.start >= self.start
                    && other.end <= self.end
                    && self.contains(other.start)
                    && other.step % self.step == 0
            }
        }
    }

    /// Returns an iterator over the progression's values in increasing order.
    ///
    /// The iterator borrows nothing; calling `iter` again restarts the
    /// enumeration.
    #[must_use]
    pub fn iter(&self) -> CounterIter {
        CounterIter {
            front: self.start,
            back: self.last().unwrap_or(self.start),
            remaining: self.len(),
            step: self.step,
        }
    }
}

impl PartialOrd for Counter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let before = self.end < other.start;
        let after = self.start > other.end;
        match (before, after) {
            _ if self == other => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            // overlapping, or two empty counters on either side of each other
            _ => None,
        }
    }
}

impl Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={} step {}", self.start, self.end, self.step)
    }
}

impl IntoIterator for Counter {
    type Item = i64;
    type IntoIter = CounterIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &Counter {
    type Item = i64;
    type IntoIter = CounterIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`Counter`].
#[derive(Debug, Clone)]
pub struct CounterIter {
    front: i64,
    back: i64,
    remaining: u64,
    step: i64,
}

impl Iterator for CounterIter {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.front;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front += self.step;
        }
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl DoubleEndedIterator for CounterIter {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.back;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back -= self.step;
        }
        Some(value)
    }
}

impl FusedIterator for CounterIter {}
