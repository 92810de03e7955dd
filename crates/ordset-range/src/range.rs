//! Sparse integer ranges with a cron-like textual form.
//!
//! A [`Range`] is a union of [`Counter`]s over a fixed `minimum..=maximum`
//! domain. It can be parsed from text such as `"1,3-5,10/2"`, built
//! incrementally, and rendered back to its most compact textual form.
//!
//! # Examples
//!
//! ```
//! use ordset_range::Range;
//!
//! let range = Range::parse("1,3-5,10/2", 0, 20)?;
//! assert_eq!(
//!     range.iter().collect::<Vec<_>>(),
//!     vec![1, 3, 4, 5, 10, 12, 14, 16, 18, 20]
//! );
//! assert_eq!(range.to_string(), "1,3-5,10/2");
//! # Ok::<(), ordset_range::RangeParseError>(())
//! ```
//!
//! An empty counter list means "every value of the domain":
//!
//! ```
//! use ordset_range::Range;
//!
//! let minutes = Range::new(0, 59);
//! assert!(minutes.is_all());
//! assert!(minutes.contains(42));
//! assert_eq!(minutes.to_string(), "*");
//! ```

use std::{
    cell::OnceCell,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    iter::FusedIterator,
};

use crate::Counter;

pub use self::parse::RangeParseError;

mod parse;

/// Symbols of the range grammar.
///
/// The defaults are `,` between terms, `-` for intervals, `/` for
/// repetitions and `*` for "all values".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeSyntax {
    /// Separates independent terms.
    pub value_separator: char,
    /// Separates `start` and `end` of an interval term.
    pub range_separator: char,
    /// Separates `start` and `step` of a repetition term.
    pub repetition_separator: char,
    /// Token standing for the whole domain.
    pub all_values: String,
}

impl Default for RangeSyntax {
    fn default() -> Self {
        Self {
            value_separator: ',',
            range_separator: '-',
            repetition_separator: '/',
            all_values: "*".to_owned(),
        }
    }
}

/// Errors returned when adding values or counters to a [`Range`].
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
pub enum RangeError {
    /// The value (or counter start) lies outside of the domain.
    #[display("value {value} is outside of {minimum}..={maximum}")]
    OutOfDomain {
        /// The rejected value.
        value: i64,
        /// Lower bound of the domain.
        minimum: i64,
        /// Upper bound of the domain.
        maximum: i64,
    },
}

/// A union of [`Counter`]s over the domain `minimum..=maximum`.
///
/// # Design Notes
///
/// - An empty counter list is the lazy "all values" state. It already
///   covers every value, so [`Range::add_value`] leaves it unchanged, while
///   [`Range::add_counter`] narrows it to the added counter. A range can
///   therefore be built incrementally from [`Range::new`] with counters.
/// - Additions skip counters already covered and drop existing counters the
///   new one subsumes, keeping the list free of redundant entries.
/// - The textual form is cached and invalidated by every mutation and every
///   syntax change. Equality and hashing compare the textual form.
/// - A `Range` is not `Sync`; share it across threads behind a lock.
#[derive(Debug, Clone)]
pub struct Range {
    minimum: i64,
    maximum: i64,
    counters: Vec<Counter>,
    syntax: RangeSyntax,
    rendered: OnceCell<String>,
}

impl Range {
    /// Creates a range covering every value of `minimum..=maximum`.
    #[must_use]
    pub fn new(minimum: i64, maximum: i64) -> Self {
        Self::with_syntax(minimum, maximum, RangeSyntax::default())
    }

    /// Creates an all-values range using a custom grammar.
    #[must_use]
    pub fn with_syntax(minimum: i64, maximum: i64, syntax: RangeSyntax) -> Self {
        Self {
            minimum,
            maximum,
            counters: Vec::new(),
            syntax,
            rendered: OnceCell::new(),
        }
    }

    /// Parses `text` with the default grammar.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeParseError`] carrying the first offending term.
    pub fn parse(text: &str, minimum: i64, maximum: i64) -> Result<Self, RangeParseError> {
        Self::parse_with_syntax(text, minimum, maximum, RangeSyntax::default())
    }

    /// Parses `text` with a custom grammar.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeParseError`] carrying the first offending term.
    pub fn parse_with_syntax(
        text: &str,
        minimum: i64,
        maximum: i64,
        syntax: RangeSyntax,
    ) -> Result<Self, RangeParseError> {
        let mut range = Self::with_syntax(minimum, maximum, syntax);
        range.reparse(text)?;
        Ok(range)
    }

    /// Replaces the contents of this range with the parsed `text`.
    ///
    /// The whole text is parsed before anything is replaced; on error the
    /// range is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeParseError`] carrying the first offending term.
    pub fn reparse(&mut self, text: &str) -> Result<(), RangeParseError> {
        let counters = parse::parse_terms(text, self.minimum, self.maximum, &self.syntax)?;
        self.counters.clear();
        self.invalidate();
        for counter in counters {
            self.insert_counter(counter);
        }
        Ok(())
    }

    /// Returns the lower bound of the domain.
    #[must_use]
    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    /// Returns the upper bound of the domain.
    #[must_use]
    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    /// Returns the counters in insertion order.
    ///
    /// An empty slice means the range covers the whole domain.
    #[must_use]
    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// Returns `true` if the range is in the "all values" state.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.counters.is_empty()
    }

    /// Returns the grammar used for parsing and rendering.
    #[must_use]
    pub fn syntax(&self) -> &RangeSyntax {
        &self.syntax
    }

    /// Replaces the grammar.
    pub fn set_syntax(&mut self, syntax: RangeSyntax) {
        self.syntax = syntax;
        self.invalidate();
    }

    /// Sets the separator between terms.
    pub fn set_value_separator(&mut self, separator: char) {
        self.syntax.value_separator = separator;
        self.invalidate();
    }

    /// Sets the separator of interval terms.
    pub fn set_range_separator(&mut self, separator: char) {
        self.syntax.range_separator = separator;
        self.invalidate();
    }

    /// Sets the separator of repetition terms.
    pub fn set_repetition_separator(&mut self, separator: char) {
        self.syntax.repetition_separator = separator;
        self.invalidate();
    }

    /// Sets the all-values token.
    pub fn set_all_values(&mut self, token: impl Into<String>) {
        self.syntax.all_values = token.into();
        self.invalidate();
    }

    /// Adds a single value unless it is already covered.
    ///
    /// Returns `true` if the range changed. An all-values range covers every
    /// value of the domain and is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::OutOfDomain`] if `value` lies outside of the
    /// domain.
    pub fn add_value(&mut self, value: i64) -> Result<bool, RangeError> {
        self.check_domain(value)?;
        if self.contains(value) {
            return Ok(false);
        }
        Ok(self.insert_counter(Counter::single(value)))
    }

    /// Adds a counter unless its values are already covered.
    ///
    /// Existing counters subsumed by `counter` are removed. Returns `true`
    /// if the counter was appended. Adding to an all-values range narrows it
    /// to `counter`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::OutOfDomain`] if the counter starts outside of
    /// the domain.
    pub fn add_counter(&mut self, counter: Counter) -> Result<bool, RangeError> {
        self.check_domain(counter.start())?;
        Ok(self.insert_counter(counter))
    }

    /// Merges `other` into this range.
    ///
    /// The domain is widened to cover both domains. An all-values operand
    /// contributes its whole domain.
    pub fn add_range(&mut self, other: &Range) {
        let widened = other.minimum < self.minimum || other.maximum > self.maximum;
        if self.counters.is_empty() {
            if !widened {
                return;
            }
            // keep covering the old domain once the bounds move
            if let Some(own) = self.domain_counter() {
                self.counters.push(own);
            }
        }
        self.minimum = self.minimum.min(other.minimum);
        self.maximum = self.maximum.max(other.maximum);
        self.invalidate();

        if other.counters.is_empty() {
            if let Some(domain) = other.domain_counter() {
                self.insert_counter(domain);
            }
        } else {
            for &counter in &other.counters {
                self.insert_counter(counter);
            }
        }
    }

    /// Returns a new range covering both `self` and `other`.
    ///
    /// The result uses `self`'s grammar.
    #[must_use]
    pub fn union(&self, other: &Range) -> Range {
        let mut result = self.clone();
        result.add_range(other);
        result
    }

    /// Returns `true` if `value` is covered.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        if self.counters.is_empty() {
            return value >= self.minimum && value <= self.maximum;
        }
        self.counters.iter().any(|counter| counter.contains(value))
    }

    /// Returns `true` if every value of `counter` is covered.
    ///
    /// A counter contained in a single existing entry is detected without
    /// enumeration. Otherwise the counter's values are walked in order; at
    /// each value the walk jumps past the run of values covered by the entry
    /// containing it, so a wide counter spanning a few wide entries takes a
    /// few steps.
    #[must_use]
    pub fn contains_counter(&self, counter: &Counter) -> bool {
        let Some(last) = counter.last() else {
            return true;
        };
        if self.counters.is_empty() {
            return counter.start() >= self.minimum && last <= self.maximum;
        }
        if self
            .counters
            .iter()
            .any(|existing| existing.contains_counter(counter))
        {
            return true;
        }
        self.covers_values(counter, last)
    }

    /// Returns an iterator over the covered values of the domain.
    ///
    /// Iteration scans the whole domain, so its cost is linear in
    /// `maximum - minimum` regardless of how many values are covered.
    #[must_use]
    pub fn iter(&self) -> RangeIter<'_> {
        RangeIter {
            range: self,
            cursor: Some(self.minimum),
        }
    }

    /// Returns the cached textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.rendered.get_or_init(|| Terms(self).to_string())
    }

    fn insert_counter(&mut self, counter: Counter) -> bool {
        if counter.is_empty() {
            return false;
        }
        if !self.counters.is_empty() && self.contains_counter(&counter) {
            log::debug!("skipping counter {counter}, already covered");
            return false;
        }

        let before = self.counters.len();
        self.counters.retain(|existing| !counter.contains_counter(existing));
        if self.counters.len() != before {
            log::debug!(
                "counter {counter} subsumes {} existing counter(s)",
                before - self.counters.len()
            );
        }
        self.counters.push(counter);
        self.invalidate();
        true
    }

    /// Walks the values of `counter` up to `last`, skipping whole runs
    /// covered by a single entry.
    fn covers_values(&self, counter: &Counter, last: i64) -> bool {
        let start = i128::from(counter.start());
        let step = i128::from(counter.step());
        let last = i128::from(last);

        let mut cursor = start;
        while cursor <= last {
            let Ok(value) = i64::try_from(cursor) else {
                return false;
            };
            let covering = self.counters.iter().find(|existing| existing.contains(value));
            let Some(covering) = covering else {
                return false;
            };
            // every later value up to the entry's end is on the entry when
            // the steps line up
            let run_end = if counter.step() % covering.step() == 0 {
                i128::from(covering.end())
            } else {
                cursor
            };
            cursor = start + ((run_end - start) / step + 1) * step;
        }
        true
    }

    fn check_domain(&self, value: i64) -> Result<(), RangeError> {
        if value < self.minimum || value > self.maximum {
            return Err(RangeError::OutOfDomain {
                value,
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        Ok(())
    }

    fn domain_counter(&self) -> Option<Counter> {
        match Counter::from_bounds(self.minimum, self.maximum) {
            Ok(counter) => Some(counter),
            Err(err) => {
                log::warn!(
                    "cannot represent domain {}..={} as a counter: {err}",
                    self.minimum,
                    self.maximum
                );
                None
            }
        }
    }

    fn invalidate(&mut self) {
        self.rendered.take();
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<'a> IntoIterator for &'a Range {
    type Item = i64;
    type IntoIter = RangeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders the terms of a range, sorted by start.
struct Terms<'a>(&'a Range);

impl Display for Terms<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.0;
        let syntax = &range.syntax;
        if range.counters.is_empty() {
            return f.write_str(&syntax.all_values);
        }

        // Counters overlapping each other have no interval order; the stable
        // sort by start keeps their insertion order.
        let mut sorted: Vec<&Counter> = range.counters.iter().collect();
        sorted.sort_by_key(|counter| counter.start());

        for (i, counter) in sorted.into_iter().enumerate() {
            if i > 0 {
                write!(f, "{}", syntax.value_separator)?;
            }
            if counter.len() <= 1 {
                write!(f, "{}", counter.start())?;
            } else if counter.step() == 1 {
                write!(
                    f,
                    "{}{}{}",
                    counter.start(),
                    syntax.range_separator,
                    counter.end()
                )?;
            } else if counter.start() == range.minimum {
                write!(
                    f,
                    "{}{}{}",
                    syntax.all_values,
                    syntax.repetition_separator,
                    counter.step()
                )?;
            } else {
                write!(
                    f,
                    "{}{}{}",
                    counter.start(),
                    syntax.repetition_separator,
                    counter.step()
                )?;
            }
        }
        Ok(())
    }
}

/// Iterator over the covered values of a [`Range`].
#[derive(Debug, Clone)]
pub struct RangeIter<'a> {
    range: &'a Range,
    cursor: Option<i64>,
}

impl Iterator for RangeIter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(value) = self.cursor {
            if value > self.range.maximum {
                self.cursor = None;
                break;
            }
            self.cursor = value.checked_add(1);
            if self.range.contains(value) {
                return Some(value);
            }
        }
        None
    }
}

impl FusedIterator for RangeIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(range: &Range) -> Vec<i64> {
        range.iter().collect()
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_covers_exact_values() {
            let range = Range::parse("1,3-5,10/2", 0, 20).unwrap();
            assert_eq!(values(&range), vec![1, 3, 4, 5, 10, 12, 14, 16, 18, 20]);
            assert!(range.contains(4));
            assert!(!range.contains(11));
        }

        #[test]
        fn test_all_values() {
            let range = Range::parse("*", 0, 3).unwrap();
            assert!(range.is_all());
            assert_eq!(values(&range), vec![0, 1, 2, 3]);
            assert!(!range.contains(4));
        }

        #[test]
        fn test_reparse_failure_keeps_contents() {
            let mut range = Range::parse("1-3", 0, 10).unwrap();
            assert!(range.reparse("4,oops").is_err());
            assert_eq!(range.to_string(), "1-3");

            range.reparse("7").unwrap();
            assert_eq!(range.to_string(), "7");
        }

        #[test]
        fn test_redundant_terms_are_dropped() {
            let range = Range::parse("3-8,4,6-7,*/2", 0, 10).unwrap();
            assert_eq!(range.counters().len(), 2);
            assert_eq!(range.to_string(), "*/2,3-8");
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn test_sorted_compact_form() {
            let range = Range::parse("10/2,3-5,1", 0, 20).unwrap();
            assert_eq!(range.to_string(), "1,3-5,10/2");
        }

        #[test]
        fn test_stepped_from_minimum() {
            let range = Range::parse("0/15", 0, 59).unwrap();
            assert_eq!(range.to_string(), "*/15");

            let range = Range::parse("0-4,*/10", 0, 59).unwrap();
            assert_eq!(range.to_string(), "0-4,*/10");
        }

        #[test]
        fn test_syntax_change_invalidates_cache() {
            let mut range = Range::parse("1,3-5,*/7", 0, 20).unwrap();
            assert_eq!(range.as_str(), "*/7,1,3-5");
            range.set_range_separator(':');
            range.set_value_separator(';');
            assert_eq!(range.as_str(), "*/7;1;3:5");
            range.set_all_values("any");
            range.set_repetition_separator('%');
            assert_eq!(range.as_str(), "any%7;1;3:5");
        }

        #[test]
        fn test_single_value_counter_renders_as_literal() {
            let mut range = Range::new(0, 20);
            range.add_counter(Counter::new(4, 2, 5).unwrap()).unwrap();
            assert_eq!(range.to_string(), "4");
        }

        #[test]
        fn test_round_trip() {
            let text = "2,4-9,12/3";
            let range = Range::parse(text, 0, 30).unwrap();
            let again = Range::parse(range.as_str(), 0, 30).unwrap();
            assert_eq!(again.as_str(), text);
            assert_eq!(range, again);
        }
    }

    mod adding {
        use super::*;

        #[test]
        fn test_add_value_to_all_values_is_noop() {
            let mut range = Range::new(0, 20);
            assert!(!range.add_value(3).unwrap());
            assert!(range.is_all());
            assert_eq!(range.to_string(), "*");
        }

        #[test]
        fn test_add_counter_to_all_values_narrows() {
            let mut range = Range::new(0, 20);
            assert!(range.add_counter(Counter::from_bounds(3, 3).unwrap()).unwrap());
            assert!(!range.is_all());
            assert!(range.add_value(5).unwrap());
            assert!(!range.add_value(5).unwrap());
            assert_eq!(range.to_string(), "3,5");
        }

        #[test]
        fn test_subsuming_counter_replaces_entries() {
            let mut range = Range::parse("3,5", 0, 20).unwrap();
            assert!(range.add_counter(Counter::from_bounds(1, 10).unwrap()).unwrap());
            assert_eq!(range.counters(), &[Counter::from_bounds(1, 10).unwrap()]);
        }

        #[test]
        fn test_covered_by_several_counters() {
            let mut range = Range::parse("1-5,6-10", 0, 20).unwrap();
            assert!(range.contains_counter(&Counter::from_bounds(4, 7).unwrap()));
            assert!(!range.add_counter(Counter::from_bounds(4, 7).unwrap()).unwrap());
            assert!(range.add_counter(Counter::from_bounds(4, 11).unwrap()).unwrap());
        }

        #[test]
        fn test_coverage_spanning_wide_counters() {
            let range =
                Range::parse("0-49999999,50000000-99999999,0-99999999", 0, 99_999_999).unwrap();
            assert_eq!(range.to_string(), "0-49999999,50000000-99999999");

            let wide = Counter::from_bounds(0, i64::MAX - 1).unwrap();
            let mut range = Range::new(0, i64::MAX);
            range.add_counter(Counter::from_bounds(0, i64::MAX / 2).unwrap()).unwrap();
            range.add_counter(Counter::from_start(i64::MAX / 2 + 1).unwrap()).unwrap();
            assert!(range.contains_counter(&wide));

            let mut gapped = Range::new(0, i64::MAX);
            gapped.add_counter(Counter::from_bounds(0, i64::MAX / 2).unwrap()).unwrap();
            gapped
                .add_counter(Counter::from_bounds(i64::MAX / 2 + 2, i64::MAX - 1).unwrap())
                .unwrap();
            assert!(!gapped.contains_counter(&wide));
        }

        #[test]
        fn test_coverage_with_mismatched_steps() {
            let range = Range::parse("*/2,1/2", 0, 10).unwrap();
            assert!(range.contains_counter(&Counter::from_bounds(0, 10).unwrap()));

            let range = Range::parse("0-5,6/2", 0, 20).unwrap();
            assert!(range.contains_counter(&Counter::from_bounds_with_step(0, 20, 2).unwrap()));
            assert!(range.contains_counter(&Counter::from_bounds_with_step(4, 20, 4).unwrap()));
            assert!(!range.contains_counter(&Counter::from_bounds(0, 7).unwrap()));
        }

        #[test]
        fn test_out_of_domain() {
            let mut range = Range::new(5, 10);
            assert_eq!(
                range.add_value(11),
                Err(RangeError::OutOfDomain {
                    value: 11,
                    minimum: 5,
                    maximum: 10,
                })
            );
            assert!(
                range
                    .add_counter(Counter::from_bounds(1, 6).unwrap())
                    .unwrap_err()
                    .is_out_of_domain()
            );
            assert!(range.is_all());
        }

        #[test]
        fn test_empty_counter_is_ignored() {
            let mut range = Range::new(0, 10);
            assert!(!range.add_counter(Counter::from_bounds(3, 2).unwrap()).unwrap());
            assert!(range.is_all());
        }
    }

    mod merging {
        use super::*;

        #[test]
        fn test_add_range_widens_domain() {
            let mut range = Range::parse("1-3", 0, 10).unwrap();
            let other = Range::parse("15", 10, 20).unwrap();
            range.add_range(&other);
            assert_eq!(range.minimum(), 0);
            assert_eq!(range.maximum(), 20);
            assert_eq!(range.to_string(), "1-3,15");
        }

        #[test]
        fn test_add_range_of_disjoint_all_values() {
            let mut range = Range::new(0, 5);
            range.add_range(&Range::new(10, 20));
            assert_eq!(range.to_string(), "0-5,10-20");
            assert!(!range.contains(7));
        }

        #[test]
        fn test_add_range_into_all_values_is_noop() {
            let mut range = Range::new(0, 20);
            range.add_range(&Range::parse("3", 0, 10).unwrap());
            assert!(range.is_all());
        }

        #[test]
        fn test_union_leaves_operands_untouched() {
            let a = Range::parse("1,2", 0, 10).unwrap();
            let b = Range::parse("2-4", 0, 10).unwrap();
            let union = a.union(&b);
            assert_eq!(values(&union), vec![1, 2, 3, 4]);
            assert_eq!(a.to_string(), "1,2");
            assert_eq!(b.to_string(), "2-4");
        }
    }

    #[test]
    fn test_equality_by_text() {
        let a = Range::parse("3-5,1", 0, 10).unwrap();
        let b = Range::parse("1,3-5", 0, 10).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Range::new(0, 10));
    }

    #[test]
    fn test_iteration_restarts() {
        let range = Range::parse("2,4", 0, 5).unwrap();
        let mut iter = range.iter();
        assert_eq!(iter.next(), Some(2));
        assert_eq!(range.iter().next(), Some(2));
        assert_eq!((&range).into_iter().count(), 2);
    }
}
