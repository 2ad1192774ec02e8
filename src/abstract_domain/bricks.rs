//! This module contains the BricksDomain and BrickDomain.
//!
//! The BricksDomain contains an ordered list of normalized BrickDomains.
//! It represents the composition of a string through sub sequences:
//! segment 1 repeated n1..m1 times, followed by segment 2 repeated n2..m2 times, and so on.
//! When a literal string is assigned to the BricksDomain, it is defined as a single brick
//! which occurs at least and at most one time, e.g. "cwe" => \[\[{"cwe"}\]^{1,1}\].
//!
//! If two strings are concatenated, their brick lists are concatenated.
//! e.g. B1 = \[\[{"a"}\]^{1,1}\], B2 = \[\[{"b"}\]^{1,1}\] => B_new = \[\[{"a"}\]^{1,1}, \[{"b"}\]^{1,1}\]
//!
//! A set of strings can be built from multiple configurations of bricks,
//! e.g. \[{"abc"}\]^{1,1} <=> \[{"a"}\]^{1,1}\[{"b"}\]^{1,1}\[{"c"}\]^{1,1}.
//! Every structural change is therefore routed through the normalization
//! of the owning [`BricksPolicy`], which keeps string representations unambiguous.
//!
//! The fully unknown value *Top* and the unreachable value *Bottom* are
//! represented as designated brick values rather than empty lists,
//! so that they propagate correctly through concatenation.
//!
//! Widening is bounded by the thresholds of the policy, so that the domains
//! do not grow indefinitely during a fixpoint computation. These thresholds are:
//!  - the *repeat difference limit* which overapproximates the number of times contents can occur in a brick,
//!  - the *set size limit* which overapproximates the contents of a brick by forcing a *Top* brick,
//!  - the *list length limit* which overapproximates the whole list by forcing a *Top* value.

use std::fmt;
use std::sync::Arc;

use super::{AbstractDomain, HasBottom, HasTop, IndexBound};
use crate::prelude::*;

mod brick;
pub use brick::Brick;

mod policy;
pub use policy::{BricksPolicy, NormalizeLocation};

mod normalize;
mod regex;
mod widening;

/// A single segment of a [`BricksDomain`]:
/// either the *Top* segment about whose contents nothing is known,
/// or a [`Brick`] with a known content set and occurrence interval.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum BrickDomain {
    /// The *Top* value represents a segment that may hold any string,
    /// repeated between zero and infinitely many times.
    Top,
    /// A segment with a known content set and occurrence interval.
    Value(Brick),
}

impl BrickDomain {
    /// Returns a padding segment representing only the empty string.
    pub fn empty_string() -> Self {
        BrickDomain::Value(Brick::empty_string())
    }

    /// Returns the unreachable segment.
    pub fn bottom_brick() -> Self {
        BrickDomain::Value(Brick::bottom())
    }

    /// Returns true if the segment represents no string at all.
    pub fn is_bottom(&self) -> bool {
        match self {
            BrickDomain::Top => false,
            BrickDomain::Value(brick) => brick.is_bottom(),
        }
    }

    /// Returns true if the segment can represent the empty string.
    /// The *Top* segment can, since it may occur zero times.
    pub fn can_be_empty(&self) -> bool {
        match self {
            BrickDomain::Top => true,
            BrickDomain::Value(brick) => brick.can_be_empty(),
        }
    }

    /// The least upper bound of two segments.
    pub fn join(&self, other: &BrickDomain) -> BrickDomain {
        match (self, other) {
            (BrickDomain::Top, _) | (_, BrickDomain::Top) => BrickDomain::Top,
            (BrickDomain::Value(left), BrickDomain::Value(right)) => {
                BrickDomain::Value(left.join(right))
            }
        }
    }

    /// The greatest lower bound of two segments.
    pub fn meet(&self, other: &BrickDomain) -> BrickDomain {
        match (self, other) {
            (BrickDomain::Top, other) => other.clone(),
            (this, BrickDomain::Top) => this.clone(),
            (BrickDomain::Value(left), BrickDomain::Value(right)) => {
                BrickDomain::Value(left.meet(right))
            }
        }
    }

    /// Checks whether the current segment is less or equal than the other segment
    /// by definition of the partial order.
    pub fn is_less_or_equal(&self, other: &BrickDomain) -> bool {
        match (self, other) {
            (BrickDomain::Top, BrickDomain::Top) => true,
            (BrickDomain::Top, BrickDomain::Value(_)) => false,
            (BrickDomain::Value(_), BrickDomain::Top) => true,
            (BrickDomain::Value(left), BrickDomain::Value(right)) => {
                left.is_less_or_equal(right)
            }
        }
    }

    /// Unwraps the brick of a segment and panics on *Top*.
    fn unwrap_value(&self) -> &Brick {
        match self {
            BrickDomain::Value(brick) => brick,
            BrickDomain::Top => panic!("unexpected Top segment"),
        }
    }
}

impl AbstractDomain for BrickDomain {
    /// Takes care of merging single segments by taking the union
    /// of the two content sets and the convex hull of the occurrence intervals.
    fn merge(&self, other: &Self) -> Self {
        self.join(other)
    }

    /// Check if the value is *Top*.
    fn is_top(&self) -> bool {
        matches!(self, Self::Top)
    }
}

impl HasTop for BrickDomain {
    /// Return a *Top* value.
    fn top(&self) -> Self {
        Self::Top
    }
}

impl fmt::Display for BrickDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrickDomain::Top => write!(f, "[T]"),
            BrickDomain::Value(brick) => write!(f, "{brick}"),
        }
    }
}

/// An ordered list of [`BrickDomain`] segments together with the policy that produced it.
///
/// The list is not self-normalizing: every transforming operation routes the
/// resulting list back through the owning policy's normalization before it
/// can be observed by callers.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct BricksDomain {
    policy: Arc<BricksPolicy>,
    bricks: Vec<BrickDomain>,
}

impl BricksDomain {
    /// Returns the abstraction of a single literal string.
    pub fn from_string(policy: Arc<BricksPolicy>, string: impl Into<String>) -> Self {
        BricksDomain {
            policy,
            bricks: vec![BrickDomain::Value(Brick::literal(string))],
        }
    }

    /// Returns the abstraction of the empty string.
    pub fn empty_string(policy: Arc<BricksPolicy>) -> Self {
        BricksDomain {
            policy,
            bricks: vec![BrickDomain::empty_string()],
        }
    }

    /// Returns the fully unknown value.
    pub fn top(policy: Arc<BricksPolicy>) -> Self {
        BricksDomain {
            policy,
            bricks: vec![BrickDomain::Top],
        }
    }

    /// Returns the unreachable value.
    pub fn bottom(policy: Arc<BricksPolicy>) -> Self {
        BricksDomain {
            policy,
            bricks: vec![BrickDomain::bottom_brick()],
        }
    }

    /// Builds a value from an already computed brick list without normalizing it.
    pub(crate) fn from_raw(policy: Arc<BricksPolicy>, bricks: Vec<BrickDomain>) -> Self {
        BricksDomain { policy, bricks }
    }

    /// Returns the policy shared by this value.
    pub fn policy(&self) -> &Arc<BricksPolicy> {
        &self.policy
    }

    /// Returns the brick list of this value.
    pub fn bricks(&self) -> &[BrickDomain] {
        &self.bricks
    }

    /// The number of bricks in the list.
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    /// Returns true if the brick list is empty, which represents the empty string.
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Returns the canonical form of this value.
    /// The `location` is metadata distinguishing why normalization is running.
    pub fn normalize(&self, location: NormalizeLocation) -> Self {
        BricksDomain {
            policy: self.policy.clone(),
            bricks: self.policy.normalize(self.bricks.clone(), location),
        }
    }

    /// Aligns the brick lists of `self` and `other` to equal length via the
    /// policy's extend operation and pairs them up pointwise.
    pub fn zip(&self, other: &Self) -> Vec<(BrickDomain, BrickDomain)> {
        let left = self.policy.extend(&self.bricks, &other.bricks);
        let right = self.policy.extend(&other.bricks, &self.bricks);
        left.into_iter().zip(right).collect()
    }

    /// The least upper bound of two values: align, join pointwise, normalize.
    pub fn join(&self, other: &Self) -> Self {
        if self.is_bottom() {
            return other.clone();
        }
        if other.is_bottom() {
            return self.clone();
        }
        if self.is_top() || other.is_top() {
            return Self::top(self.policy.clone());
        }

        let joined = self
            .zip(other)
            .iter()
            .map(|(left, right)| left.join(right))
            .collect();

        Self::from_raw(self.policy.clone(), joined).normalize(NormalizeLocation::Join)
    }

    /// The greatest lower bound of two values: align, meet pointwise, normalize.
    /// Returns *Bottom* as soon as one segment pair has no common string;
    /// segment pairs that only share the empty string meet to a padding brick.
    pub fn meet(&self, other: &Self) -> Self {
        if self.is_bottom() || other.is_bottom() {
            return Self::bottom(self.policy.clone());
        }
        if self.is_top() {
            return other.clone();
        }
        if other.is_top() {
            return self.clone();
        }

        let met: Vec<BrickDomain> = self
            .zip(other)
            .iter()
            .map(|(left, right)| left.meet(right))
            .collect();
        if met.iter().any(|brick| brick.is_bottom()) {
            return Self::bottom(self.policy.clone());
        }

        Self::from_raw(self.policy.clone(), met).normalize(NormalizeLocation::Operation)
    }

    /// Checks whether the current value is less or equal than the other value
    /// by definition of the partial order. Shorter lists are aligned first.
    pub fn is_less_or_equal(&self, other: &Self) -> bool {
        if self.is_bottom() {
            return true;
        }
        if other.is_bottom() {
            return false;
        }
        if other.is_top() {
            return true;
        }
        if self.is_top() {
            return false;
        }

        self.zip(other)
            .iter()
            .all(|(left, right)| left.is_less_or_equal(right))
    }

    /// The widening of two values under the thresholds of the owning policy.
    pub fn widening(&self, other: &Self) -> Self {
        self.policy.widening(self, other)
    }

    /// Appends the bricks of `other` to the bricks of `self`.
    /// Used for string concatenation. A *Top* operand contributes its
    /// designated *Top* brick, so that the known parts survive.
    pub fn concat(&self, other: &Self) -> Self {
        if self.is_bottom() || other.is_bottom() {
            return Self::bottom(self.policy.clone());
        }

        let mut bricks = self.bricks.clone();
        bricks.extend(other.bricks.iter().cloned());

        Self::from_raw(self.policy.clone(), bricks).normalize(NormalizeLocation::Operation)
    }

    /// If the value represents exactly one string, return it.
    /// In all other cases return an error.
    pub fn try_to_constant_string(&self) -> Result<String, Error> {
        if self.is_bottom() {
            return Err(anyhow!("unreachable value does not represent a string"));
        }
        let mut constant = String::new();
        for brick_domain in self.bricks.iter() {
            match brick_domain {
                BrickDomain::Top => return Err(anyhow!("value is not a constant string")),
                BrickDomain::Value(brick) => {
                    if brick.min() != IndexBound::ONE
                        || brick.max() != IndexBound::ONE
                        || brick.sequence().len() != 1
                    {
                        return Err(anyhow!("value is not a constant string"));
                    }
                    constant.push_str(brick.sequence().iter().next().unwrap());
                }
            }
        }

        Ok(constant)
    }
}

impl AbstractDomain for BricksDomain {
    /// Takes care of merging lists of bricks.
    fn merge(&self, other: &Self) -> Self {
        if self == other {
            self.clone()
        } else {
            self.join(other)
        }
    }

    /// Check if the value is the fully unknown *Top* value.
    fn is_top(&self) -> bool {
        matches!(self.bricks.as_slice(), [BrickDomain::Top])
    }
}

impl HasTop for BricksDomain {
    /// Return a *Top* value sharing the policy of `self`.
    fn top(&self) -> Self {
        Self::top(self.policy.clone())
    }
}

impl HasBottom for BricksDomain {
    /// Return a *Bottom* value sharing the policy of `self`.
    fn bottom(&self) -> Self {
        Self::bottom(self.policy.clone())
    }

    /// A value is unreachable as soon as one of its segments is.
    fn is_bottom(&self) -> bool {
        self.bricks.iter().any(|brick| brick.is_bottom())
    }
}

impl fmt::Display for BricksDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bricks: ")?;
        for brick_domain in self.bricks.iter() {
            write!(f, "{brick_domain} ")?;
        }

        Ok(())
    }
}
