//! Arithmetic progressions and sparse integer ranges.
//!
//! This crate provides two value types for describing sets of integers
//! compactly:
//!
//! 1. [`counter`]: [`Counter`], an immutable arithmetic progression
//!    `{start, count, step}` with lazy, restartable enumeration.
//! 2. [`range`]: [`Range`], a union of counters over a bounded domain with a
//!    cron-like textual grammar (`"1,3-5,10/2"`, `"*/15"`).
//!
//! # Examples
//!
//! ```
//! use ordset_range::{Counter, Range};
//!
//! let mut range = Range::parse("0-4", 0, 59)?;
//! range.add_counter(Counter::from_bounds_with_step(30, 59, 10)?)?;
//!
//! assert!(range.contains(40));
//! assert!(!range.contains(45));
//! assert_eq!(range.to_string(), "0-4,30/10");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Thread safety
//!
//! Both types are plain single-threaded values. [`Range`] caches its textual
//! form in a cell and is therefore not `Sync`; wrap it in a mutex to share
//! it.

pub mod counter;
pub mod range;

pub use self::{
    counter::{Counter, CounterError, CounterIter},
    range::{Range, RangeError, RangeIter, RangeParseError, RangeSyntax},
};
