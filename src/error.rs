//! Errors surfaced by tree construction and insertion.

use thiserror::Error;

/// Invalid-argument conditions. Lookups and removals never fail; an absent
/// interval is reported as `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The universe bounds are reversed.
    #[error("invalid universe: end {end} is before start {start}")]
    InvalidUniverse { start: i64, end: i64 },

    /// An interval whose start is after its end.
    #[error("malformed interval [{start}, {end}]: start is after end")]
    MalformedInterval { start: i64, end: i64 },

    /// An interval that does not fit inside the tree's universe.
    #[error("interval [{start}, {end}] is outside the universe [{range_start}, {range_end}]")]
    OutOfUniverse {
        start: i64,
        end: i64,
        range_start: i64,
        range_end: i64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_coordinates() {
        let err = Error::OutOfUniverse {
            start: -3,
            end: 4,
            range_start: 0,
            range_end: 16,
        };
        assert_eq!(
            err.to_string(),
            "interval [-3, 4] is outside the universe [0, 16]"
        );
        assert_eq!(
            Error::InvalidUniverse { start: 5, end: 1 }.to_string(),
            "invalid universe: end 1 is before start 5"
        );
    }
}
