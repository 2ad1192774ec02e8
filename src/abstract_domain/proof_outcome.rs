//! This module contains the four-valued proof outcome lattice.
//!
//! A static check over abstract values cannot always decide a property.
//! Its result is therefore one of four values:
//! *Bottom* (the checked program point is unreachable),
//! *True* (the property provably holds),
//! *False* (the property provably does not hold)
//! or *Top* (the property may or may not hold).

use super::{AbstractDomain, HasBottom, HasTop};
use crate::prelude::*;
use std::fmt;

/// The four-valued result of a static check.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ProofOutcome {
    /// The checked program point is unreachable.
    Bottom,
    /// The property provably holds.
    True,
    /// The property provably does not hold.
    False,
    /// The property may or may not hold.
    Top,
}

impl ProofOutcome {
    /// Logical conjunction. *Bottom* absorbs, *False* dominates known values.
    pub fn and(self, other: ProofOutcome) -> ProofOutcome {
        use ProofOutcome::*;
        match (self, other) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (False, _) | (_, False) => False,
            (True, True) => True,
            _ => Top,
        }
    }

    /// Logical disjunction. *Bottom* absorbs, *True* dominates known values.
    pub fn or(self, other: ProofOutcome) -> ProofOutcome {
        use ProofOutcome::*;
        match (self, other) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (True, _) | (_, True) => True,
            (False, False) => False,
            _ => Top,
        }
    }

    /// Logical negation. Swaps *True* and *False* and leaves the
    /// uninformative values unchanged.
    pub fn negate(self) -> ProofOutcome {
        use ProofOutcome::*;
        match self {
            True => False,
            False => True,
            other => other,
        }
    }

    /// Returns true if the outcome is *True*.
    pub fn is_true(&self) -> bool {
        matches!(self, ProofOutcome::True)
    }

    /// Returns true if the outcome is *False*.
    pub fn is_false(&self) -> bool {
        matches!(self, ProofOutcome::False)
    }
}

impl AbstractDomain for ProofOutcome {
    /// The least upper bound in the four-point lattice:
    /// *Bottom* below *True* and *False*, both below *Top*.
    fn merge(&self, other: &Self) -> Self {
        use ProofOutcome::*;
        match (self, other) {
            (Bottom, result) | (result, Bottom) => *result,
            (left, right) if left == right => *left,
            _ => Top,
        }
    }

    fn is_top(&self) -> bool {
        matches!(self, ProofOutcome::Top)
    }
}

impl HasTop for ProofOutcome {
    fn top(&self) -> Self {
        ProofOutcome::Top
    }
}

impl HasBottom for ProofOutcome {
    fn bottom(&self) -> Self {
        ProofOutcome::Bottom
    }

    fn is_bottom(&self) -> bool {
        matches!(self, ProofOutcome::Bottom)
    }
}

impl fmt::Display for ProofOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofOutcome::Bottom => write!(f, "unreachable"),
            ProofOutcome::True => write!(f, "true"),
            ProofOutcome::False => write!(f, "false"),
            ProofOutcome::Top => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProofOutcome::*;
    use super::*;

    #[test]
    fn combinators() {
        assert_eq!(True.and(True), True);
        assert_eq!(True.and(False), False);
        assert_eq!(Top.and(False), False);
        assert_eq!(Top.and(True), Top);
        assert_eq!(Bottom.and(False), Bottom);

        assert_eq!(False.or(False), False);
        assert_eq!(False.or(True), True);
        assert_eq!(Top.or(True), True);
        assert_eq!(Top.or(False), Top);
        assert_eq!(Bottom.or(True), Bottom);

        assert_eq!(True.negate(), False);
        assert_eq!(False.negate(), True);
        assert_eq!(Top.negate(), Top);
        assert_eq!(Bottom.negate(), Bottom);
    }

    #[test]
    fn lattice_merge() {
        assert_eq!(Bottom.merge(&True), True);
        assert_eq!(False.merge(&Bottom), False);
        assert_eq!(True.merge(&False), Top);
        assert_eq!(True.merge(&True), True);
        assert!(Top.is_top());
        assert!(Bottom.is_bottom());
    }
}
