//! Parser for the textual range grammar.
//!
//! A range text is a list of terms separated by the value separator. Each
//! term is one of:
//!
//! - a literal integer (`7`),
//! - an interval `start-end` (`3-5`),
//! - a repetition `start/step` running up to the domain maximum (`10/2`),
//! - the all-values token (`*`), optionally stepped (`*/15`).
//!
//! The all-values token on its own may not be combined with other terms.

use std::num::ParseIntError;

use crate::{Counter, CounterError, RangeSyntax};

/// Errors returned when parsing a range text.
///
/// Every variant carries the offending term.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum RangeParseError {
    /// A number inside the term could not be parsed.
    #[display("invalid number in range term '{token}'")]
    InvalidNumber {
        /// The offending term.
        token: String,
        /// The integer parse failure.
        source: ParseIntError,
    },
    /// The term has more than two parts around a separator.
    #[display("expected exactly two parts in range term '{token}'")]
    TooManyParts {
        /// The offending term.
        token: String,
    },
    /// The term starts outside of the range's domain.
    #[display("range term '{token}' starts at {start}, outside of {minimum}..={maximum}")]
    OutOfDomain {
        /// The offending term.
        token: String,
        /// The parsed start value.
        start: i64,
        /// Lower bound of the domain.
        minimum: i64,
        /// Upper bound of the domain.
        maximum: i64,
    },
    /// The term describes an invalid counter (for example `5-3` or `*/0`).
    #[display("invalid counter in range term '{token}'")]
    InvalidCounter {
        /// The offending term.
        token: String,
        /// Why the counter was rejected.
        source: CounterError,
    },
    /// The all-values token was mixed with explicit terms.
    #[display("range term '{token}' mixes the all-values token with explicit terms")]
    MixedAllValues {
        /// The term that introduced the mix.
        token: String,
    },
}

/// A single parsed term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Term {
    All,
    Counter(Counter),
}

/// Parses `text` into counters over `minimum..=maximum`.
///
/// An empty result means "all values".
pub(super) fn parse_terms(
    text: &str,
    minimum: i64,
    maximum: i64,
    syntax: &RangeSyntax,
) -> Result<Vec<Counter>, RangeParseError> {
    let parser = TermParser {
        minimum,
        maximum,
        syntax,
    };

    let mut saw_all = false;
    let mut counters = Vec::new();
    for token in text
        .split(syntax.value_separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        let term = parser.parse(token)?;
        log::trace!("parsed range term '{token}' as {term:?}");
        match term {
            Term::All => {
                if !counters.is_empty() {
                    return Err(RangeParseError::MixedAllValues {
                        token: token.to_owned(),
                    });
                }
                saw_all = true;
            }
            Term::Counter(counter) => {
                if saw_all {
                    return Err(RangeParseError::MixedAllValues {
                        token: token.to_owned(),
                    });
                }
                counters.push(counter);
            }
        }
    }
    Ok(counters)
}

struct TermParser<'a> {
    minimum: i64,
    maximum: i64,
    syntax: &'a RangeSyntax,
}

impl TermParser<'_> {
    fn parse(&self, token: &str) -> Result<Term, RangeParseError> {
        if token.contains(self.syntax.range_separator) {
            let (start, end) = split_pair(token, self.syntax.range_separator)?;
            let start = self.parse_start(token, start)?;
            let end = parse_number(token, end)?;
            return counter(token, Counter::from_bounds(start, end));
        }

        if token.contains(self.syntax.repetition_separator) {
            let (start, step) = split_pair(token, self.syntax.repetition_separator)?;
            let step = parse_number(token, step)?;
            let start = if start == self.syntax.all_values {
                self.minimum
            } else {
                self.parse_start(token, start)?
            };
            return counter(
                token,
                Counter::from_bounds_with_step(start, self.maximum, step),
            );
        }

        if token == self.syntax.all_values {
            return Ok(Term::All);
        }

        let value = self.parse_start(token, token)?;
        Ok(Term::Counter(Counter::single(value)))
    }

    fn parse_start(&self, token: &str, text: &str) -> Result<i64, RangeParseError> {
        let start = parse_number(token, text)?;
        if start < self.minimum || start > self.maximum {
            return Err(RangeParseError::OutOfDomain {
                token: token.to_owned(),
                start,
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        Ok(start)
    }
}

fn split_pair(token: &str, separator: char) -> Result<(&str, &str), RangeParseError> {
    let mut parts = token.split(separator).map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(RangeParseError::TooManyParts {
            token: token.to_owned(),
        }),
    }
}

fn parse_number(token: &str, text: &str) -> Result<i64, RangeParseError> {
    text.parse().map_err(|source| RangeParseError::InvalidNumber {
        token: token.to_owned(),
        source,
    })
}

fn counter(token: &str, result: Result<Counter, CounterError>) -> Result<Term, RangeParseError> {
    result
        .map(Term::Counter)
        .map_err(|source| RangeParseError::InvalidCounter {
            token: token.to_owned(),
            source,
        })
}
