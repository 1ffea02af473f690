//! Implementation of a static-range centered interval tree
//! ([`interval_tree::IntervalTree`]) over integer coordinates. The tree is
//! built for a universe `[start, end]` fixed at construction; node centers are
//! chosen by repeatedly bisecting that universe rather than by rotations, so
//! every coordinate is reachable within a logarithmic number of steps whatever
//! the insertion order.
//!
//! Each node keeps the intervals overlapping its center twice, sorted by
//! ascending start and by descending end, which lets the three query families
//! stop scanning a node at the first interval that cannot match:
//! "stabbing" queries for a point ([`IntervalTree::intersect`]), overlap
//! queries ([`IntervalTree::intersect_part`]) and containment queries
//! ([`IntervalTree::intersect_all`]).
//!
//! Any type implementing [`Interval`] can be stored; [`Span`] is the plain one.

mod error;
mod interval;
/// A centered interval tree over a fixed universe.
pub mod interval_tree;
mod iter;
mod node;
mod universe;

pub use error::{Error, Result};
pub use interval::{Interval, Span};
pub use interval_tree::IntervalTree;
pub use iter::Iter;
pub use universe::Universe;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
