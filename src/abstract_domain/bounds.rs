//! This module contains the bounded-index arithmetic used for repetition counts
//! and list-length bookkeeping in the Bricks domain.
//!
//! An [`IndexBound`] is an extended non-negative integer with an explicit
//! *Unknown* sentinel (smaller than every known value) and a positive-infinity
//! sentinel (larger than every known value). The type is totally ordered and
//! supports addition, distance and decrement. All arithmetic saturates:
//! overflowing an addition yields [`IndexBound::Infinite`] instead of wrapping
//! or panicking, since infinity is a first-class value of this arithmetic.

use crate::prelude::*;
use std::fmt;
use std::ops::Add;

/// An extended non-negative integer used for repetition counts.
///
/// The variant order yields the total order `Unknown < Finite(n) < Infinite`
/// with finite values ordered by magnitude.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum IndexBound {
    /// A value that is not (yet) known. Sorts below every known value.
    Unknown,
    /// A known finite repetition count.
    Finite(u64),
    /// Positive infinity, i.e. an unbounded repetition count.
    Infinite,
}

impl IndexBound {
    /// The finite value zero.
    pub const ZERO: IndexBound = IndexBound::Finite(0);
    /// The finite value one.
    pub const ONE: IndexBound = IndexBound::Finite(1);

    /// Returns true if the bound is the finite value zero.
    pub fn is_zero(&self) -> bool {
        *self == IndexBound::ZERO
    }

    /// Returns true if the bound is a known finite value.
    pub fn is_finite(&self) -> bool {
        matches!(self, IndexBound::Finite(_))
    }

    /// The absolute distance between two bounds.
    ///
    /// The distance to or from infinity is infinite,
    /// the distance involving an unknown value is unknown.
    pub fn dist(self, other: IndexBound) -> IndexBound {
        use IndexBound::*;
        match (self, other) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (Infinite, _) | (_, Infinite) => Infinite,
            (Finite(a), Finite(b)) => Finite(a.abs_diff(b)),
        }
    }

    /// Decrease a finite bound by one, saturating at zero.
    /// Unknown and infinite bounds are left unchanged.
    pub fn decrement(self) -> IndexBound {
        match self {
            IndexBound::Finite(value) => IndexBound::Finite(value.saturating_sub(1)),
            other => other,
        }
    }
}

impl Add for IndexBound {
    type Output = IndexBound;

    fn add(self, rhs: IndexBound) -> IndexBound {
        use IndexBound::*;
        match (self, rhs) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (Infinite, _) | (_, Infinite) => Infinite,
            (Finite(a), Finite(b)) => a.checked_add(b).map_or(Infinite, Finite),
        }
    }
}

impl From<u64> for IndexBound {
    fn from(value: u64) -> Self {
        IndexBound::Finite(value)
    }
}

impl From<usize> for IndexBound {
    fn from(value: usize) -> Self {
        IndexBound::Finite(value as u64)
    }
}

impl fmt::Display for IndexBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexBound::Unknown => write!(f, "?"),
            IndexBound::Finite(value) => write!(f, "{value}"),
            IndexBound::Infinite => write!(f, "inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IndexBound::*;

    #[test]
    fn total_order() {
        assert!(Unknown < Finite(0));
        assert!(Finite(0) < Finite(1));
        assert!(Finite(u64::MAX) < Infinite);
        assert_eq!(Finite(3).max(Finite(5)), Finite(5));
        assert_eq!(Unknown.min(Finite(0)), Unknown);
    }

    #[test]
    fn addition_saturates_to_infinity() {
        assert_eq!(Finite(2) + Finite(3), Finite(5));
        assert_eq!(Finite(u64::MAX) + Finite(1), Infinite);
        assert_eq!(Infinite + Finite(1), Infinite);
        assert_eq!(Unknown + Infinite, Unknown);
    }

    #[test]
    fn distance_and_decrement() {
        assert_eq!(Finite(7).dist(Finite(2)), Finite(5));
        assert_eq!(Infinite.dist(Finite(2)), Infinite);
        assert_eq!(Finite(2).dist(Unknown), Unknown);
        assert_eq!(Finite(0).decrement(), Finite(0));
        assert_eq!(Finite(3).decrement(), Finite(2));
        assert_eq!(Infinite.decrement(), Infinite);
    }
}
