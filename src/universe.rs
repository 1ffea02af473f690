use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The fixed inclusive coordinate range `[start, end]` a tree is built over.
///
/// This is the whole of a tree's configuration. Every stored interval must
/// lie inside it, and its bisection determines every node center.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawUniverse")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Universe {
    start: i64,
    end: i64,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawUniverse {
    start: i64,
    end: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawUniverse> for Universe {
    type Error = Error;

    fn try_from(raw: RawUniverse) -> Result<Universe> {
        Universe::new(raw.start, raw.end)
    }
}

impl Universe {
    /// Fails with [`Error::InvalidUniverse`] if `end < start`.
    pub fn new(start: i64, end: i64) -> Result<Universe> {
        if end < start {
            return Err(Error::InvalidUniverse { start, end });
        }
        Ok(Universe { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Whether `[start, end]` fits inside the universe.
    pub fn contains(&self, start: i64, end: i64) -> bool {
        self.start <= start && end <= self.end
    }

    /// Half the number of coordinates, rounded down. This is the distance
    /// the root's children are derived from.
    pub(crate) fn half_width(&self) -> u64 {
        let width = i128::from(self.end) - i128::from(self.start) + 1;
        // At most 2^63, which always fits.
        (width / 2) as u64
    }

    /// Center of the root node: `start + (end - start + 1) / 2`.
    pub(crate) fn root_center(&self) -> i64 {
        let center = i128::from(self.start) + i128::from(self.half_width());
        // Lies within [start, end].
        center as i64
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
