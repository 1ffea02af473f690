use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A closed integer interval `[start, end]` that can be stored in an
/// [`IntervalTree`](crate::IntervalTree).
///
/// Implementors must guarantee `start() <= end()` and an [`Ord`] that agrees
/// with [`Eq`]: the tree keeps every interval in two sorted sets and relies on
/// both sets seeing the same equality.
pub trait Interval: Ord + Clone {
    /// Inclusive start coordinate.
    fn start(&self) -> i64;

    /// Inclusive end coordinate.
    fn end(&self) -> i64;

    /// Whether `point` lies within `[start, end]`.
    fn contains_point(&self, point: i64) -> bool {
        self.start() <= point && point <= self.end()
    }

    /// Whether `[start, end]` shares at least one coordinate with this interval.
    fn overlaps(&self, start: i64, end: i64) -> bool {
        self.start() <= end && start <= self.end()
    }

    /// Whether `[start, end]` lies entirely within this interval.
    fn encloses(&self, start: i64, end: i64) -> bool {
        self.start() <= start && end <= self.end()
    }
}

impl Interval for (i64, i64) {
    fn start(&self) -> i64 {
        self.0
    }

    fn end(&self) -> i64 {
        self.1
    }
}

/// The plain interval type: a pair of inclusive coordinates ordered by
/// `(start, end)`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "(i64, i64)", into = "(i64, i64)")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    start: i64,
    end: i64,
}

impl Span {
    /// Creates `[start, end]`, failing if `start > end`.
    pub fn new(start: i64, end: i64) -> Result<Span> {
        if start > end {
            return Err(Error::MalformedInterval { start, end });
        }
        Ok(Span { start, end })
    }

    /// The single-coordinate interval `[point, point]`.
    pub fn point(point: i64) -> Span {
        Span {
            start: point,
            end: point,
        }
    }

    /// Number of coordinates covered, saturating at `u64::MAX`.
    pub fn width(&self) -> u64 {
        self.end.abs_diff(self.start).saturating_add(1)
    }
}

impl Interval for Span {
    fn start(&self) -> i64 {
        self.start
    }

    fn end(&self) -> i64 {
        self.end
    }
}

impl TryFrom<(i64, i64)> for Span {
    type Error = Error;

    fn try_from((start, end): (i64, i64)) -> Result<Span> {
        Span::new(start, end)
    }
}

impl From<Span> for (i64, i64) {
    fn from(span: Span) -> (i64, i64) {
        (span.start, span.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
