//! This module contains the Brick entity.
//! A Brick represents the set of all strings that can be built
//! through concatenation of a given set of literal contents,
//! repeated within a lower and upper occurrence bound.
//!
//! For instance, let \[{"mo", "de"}\]^{1,2} be a Brick. The following set of strings is
//! constructed through the aforementioned Brick:
//!    - {mo, de, momo, dede, mode, demo}
//!
//! A brick with an empty content set that has to occur at least once
//! represents no string at all and acts as the *Bottom* segment of a brick list.

use std::collections::BTreeSet;

use super::super::IndexBound;
use crate::prelude::*;
use itertools::Itertools;

/// A single Brick with its set of literal contents and the
/// minimum and maximum of the sum of their occurrences.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Brick {
    sequence: BTreeSet<String>,
    min: IndexBound,
    max: IndexBound,
}

impl Brick {
    /// Creates a new Brick from a content set and an occurrence interval.
    /// Feeding a malformed interval with `min > max` is a programming error
    /// of the caller, caught in debug builds only.
    pub fn new(sequence: BTreeSet<String>, min: IndexBound, max: IndexBound) -> Self {
        debug_assert!(min <= max, "malformed brick interval: {min} > {max}");
        Brick { sequence, min, max }
    }

    /// Returns the brick \[{s}\]^{1,1} representing exactly the given literal, exactly once.
    pub fn literal(string: impl Into<String>) -> Self {
        let mut sequence = BTreeSet::new();
        sequence.insert(string.into());
        Brick::new(sequence, IndexBound::ONE, IndexBound::ONE)
    }

    /// Returns the brick \[{""}\]^{1,1} representing the empty string.
    /// Used as padding when two brick lists are aligned to equal length.
    pub fn empty_string() -> Self {
        Brick::literal("")
    }

    /// Returns the brick \[{}\]^{1,1} representing no string at all.
    pub fn bottom() -> Self {
        Brick::new(BTreeSet::new(), IndexBound::ONE, IndexBound::ONE)
    }

    /// Returns a reference to the literal contents of the brick.
    pub fn sequence(&self) -> &BTreeSet<String> {
        &self.sequence
    }

    /// Returns the minimum occurrence of the contents of the brick.
    pub fn min(&self) -> IndexBound {
        self.min
    }

    /// Returns the maximum occurrence of the contents of the brick.
    pub fn max(&self) -> IndexBound {
        self.max
    }

    /// A brick with no possible contents that occurs at least once
    /// represents an unreachable value.
    pub fn is_bottom(&self) -> bool {
        self.sequence.is_empty() && !self.min.is_zero()
    }

    /// Checks whether the brick can represent the empty string.
    /// This is the case if the brick may occur zero times
    /// or if all its contents are the empty string.
    pub fn can_be_empty(&self) -> bool {
        self.min.is_zero()
            || (!self.sequence.is_empty() && self.sequence.iter().all(|s| s.is_empty()))
    }

    /// Checks whether the brick represents the empty string only,
    /// i.e. whether it is a padding brick.
    pub fn is_empty_string(&self) -> bool {
        !self.sequence.is_empty() && self.sequence.iter().all(|s| s.is_empty())
    }

    /// The width of the occurrence interval, used to check the
    /// repeat-difference threshold during widening.
    pub fn interval_width(&self) -> IndexBound {
        self.max.dist(self.min)
    }

    /// **merge** two bricks that both occur exactly once into a new single brick
    /// whose content set is the pairwise concatenation of the former two.
    /// e.g. B0 = \[{a,cd}\]^{1,1} and B1 = \[{b,ef}\]^{1,1}
    /// become B_new = \[{ab, aef, cdb, cdef}\]^{1,1}.
    pub fn concat_sets(&self, other: &Brick) -> Self {
        let sequence: BTreeSet<String> = self
            .sequence
            .iter()
            .cartesian_product(other.sequence.iter())
            .map(|(left, right)| left.clone() + right)
            .collect();

        Brick::new(sequence, IndexBound::ONE, IndexBound::ONE)
    }

    /// **transform** a brick with a constant occurrence count into one that occurs
    /// exactly once, by replacing its contents with all concatenations of
    /// `times` contents. e.g. B = \[{a,b}\]^{2,2} => B_new = \[{aa, ab, ba, bb}\]^{1,1}.
    pub fn expand_repetitions(&self, times: usize) -> Self {
        let sequence: BTreeSet<String> = (0..times)
            .map(|_| self.sequence.iter())
            .multi_cartesian_product()
            .map(|parts| parts.into_iter().map(String::as_str).collect::<String>())
            .collect();

        Brick::new(sequence, IndexBound::ONE, IndexBound::ONE)
    }

    /// **merge** two bricks with equal content sets by adding their intervals.
    /// e.g. B1 = \[S\]^{m1, M1} and B2 = \[S\]^{m2, M2} => B_new = \[S\]^{m1+m2, M1+M2}.
    pub fn add_intervals(&self, other: &Brick) -> Self {
        Brick::new(
            self.sequence.clone(),
            self.min + other.min,
            self.max + other.max,
        )
    }

    /// **break** a brick with min >= 1 and min != max into a remainder occurrence
    /// and a mandatory occurrence: B = \[S\]^{min,max} =>
    /// (\[S\]^{min-1,max-1}, \[S\]^{1,1}).
    /// The remainder precedes the mandatory part in the rewritten list,
    /// so that the merge rule for equal content sets does not
    /// immediately undo the split.
    pub fn split_repetition(&self) -> (Self, Self) {
        let remainder = Brick::new(
            self.sequence.clone(),
            self.min.decrement(),
            self.max.decrement(),
        );

        (remainder, Brick::new(self.sequence.clone(), IndexBound::ONE, IndexBound::ONE))
    }

    /// The least upper bound of two bricks: the union of their contents
    /// and the convex hull of their intervals.
    pub fn join(&self, other: &Brick) -> Self {
        Brick::new(
            self.sequence.union(&other.sequence).cloned().collect(),
            self.min.min(other.min),
            self.max.max(other.max),
        )
    }

    /// The greatest lower bound of two bricks: the intersection of their contents
    /// and of their intervals.
    ///
    /// If either intersection is empty the bricks may still share the empty
    /// string, since a brick with a zero minimum represents it without listing
    /// it in its content set. In that case the empty-string brick is returned;
    /// only bricks without any common string meet to the *Bottom* brick.
    pub fn meet(&self, other: &Brick) -> Self {
        let sequence: BTreeSet<String> = self
            .sequence
            .intersection(&other.sequence)
            .cloned()
            .collect();
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if sequence.is_empty() || min > max {
            if self.can_be_empty() && other.can_be_empty() {
                return Brick::empty_string();
            }
            return Brick::bottom();
        }

        Brick::new(sequence, min, max)
    }

    /// Checks whether the current brick is less or equal than the other brick
    /// by definition of the partial order.
    /// Padding bricks representing only the empty string are ignored for order comparisons.
    pub fn is_less_or_equal(&self, other: &Brick) -> bool {
        if self.is_bottom() {
            return true;
        }
        if self.is_empty_string() || other.is_empty_string() {
            return true;
        }

        self.sequence.is_subset(&other.sequence)
            && self.min >= other.min
            && self.max <= other.max
    }
}

impl std::fmt::Display for Brick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}^({},{})", self.sequence, self.min, self.max)
    }
}
