//! This module implements the normalization engine of the Bricks domain.
//!
//! Normalizing can be seen as a fixpoint for a set of 5 rewrite rules that are
//! applied to the list of bricks until the list stays unchanged:
//! 1. **remove** bricks that occur at most zero times, since they contribute nothing.
//! 2. **merge** successive bricks that both occur exactly once into a new single brick
//!    whose content set is the pairwise concatenation of the former two,
//!    e.g. B0 = \[{a,cd}\]^{1,1} and B1 = \[{b,ef}\]^{1,1}
//!    become B_new = \[{ab, aef, cdb, cdef}\]^{1,1}. Toggled by the
//!    `merge_constant_sets` knob of the policy.
//! 3. **transform** a brick with a constant occurrence count (min = max > 1)
//!    into one occurring exactly once, e.g. B = \[{a,b}\]^{2,2} =>
//!    B_new = \[{aa, ab, ba, bb}\]^{1,1}. Toggled by the
//!    `expand_constant_repetitions` knob of the policy.
//! 4. **merge** two successive bricks with equal content sets by adding their
//!    intervals, e.g. B1 = \[S\]^{m1, M1} and B2 = \[S\]^{m2, M2} =>
//!    B_new = \[S\]^{m1+m2, M1+M2}. The merge is skipped if the first brick's
//!    interval is not a single point and the second brick's minimum is nonzero.
//!    This condition is stricter than in the originating literature:
//!    without it, rule 5 would split such a merge straight back apart
//!    and the rewrite loop would not terminate.
//! 5. **break** a single brick with min >= 1 and max != min into two simpler
//!    bricks, a remainder \[S\]^{min-1,max-1} followed by a mandatory
//!    occurrence \[S\]^{1,1}. The remainder comes first so that the
//!    resulting pair falls under the exception of rule 4.
//!
//! Rules may re-enable each other, so the engine loops until a full pass makes
//! no change. Termination is not structurally obvious (rules 4 and 5 can
//! oscillate on unbounded inputs) and relies on every call site bounding its
//! inputs beforehand through the widening thresholds of the policy.

use log::{debug, trace};

use super::super::{AbstractDomain, IndexBound};
use super::{Brick, BrickDomain, BricksPolicy, NormalizeLocation};

impl BricksPolicy {
    /// Rewrites a brick list into its canonical form.
    ///
    /// If the list contains an unreachable segment, the designated *Bottom*
    /// brick is returned instead of a rewritten list.
    pub fn normalize(
        &self,
        bricks: Vec<BrickDomain>,
        location: NormalizeLocation,
    ) -> Vec<BrickDomain> {
        let (normalized, rewrites) = self.normalize_with_stats(bricks, location);
        debug!("normalize ({location:?}): {rewrites} rewrites");

        normalized
    }

    /// Like [`BricksPolicy::normalize`], but also returns the number of
    /// applied rewrite steps.
    pub(crate) fn normalize_with_stats(
        &self,
        bricks: Vec<BrickDomain>,
        location: NormalizeLocation,
    ) -> (Vec<BrickDomain>, usize) {
        if bricks.iter().any(|brick| brick.is_bottom()) {
            return (vec![BrickDomain::bottom_brick()], 0);
        }

        let mut normalized = bricks.clone();
        // A second vector to do lookups and to iterate over the values.
        let mut lookup = bricks;
        let mut rewrites = 0;
        let mut unchanged = false;
        while !unchanged {
            for (index, brick_domain) in lookup.iter().enumerate() {
                // Nothing is known about Top segments, so no rule inspects them.
                if brick_domain.is_top() {
                    continue;
                }
                let current_brick = brick_domain.unwrap_value();

                // --Rule 1-- The brick occurs at most zero times.
                // Remove it from the list.
                if current_brick.max().is_zero() {
                    normalized.remove(index);
                    rewrites += 1;
                    break;
                }

                // --Rule 2-- Two successive bricks both occur exactly once.
                // Merge them by concatenating their content sets pairwise.
                if self.merge_constant_sets {
                    if let Some(merged) = self.merge_constant_pair(current_brick, lookup.get(index + 1)) {
                        normalized[index] = BrickDomain::Value(merged);
                        normalized.remove(index + 1);
                        rewrites += 1;
                        break;
                    }
                }

                // --Rule 3-- The occurrence count is a constant greater than one.
                // Expand the contents and reset the interval to exactly one occurrence.
                if self.expand_constant_repetitions {
                    if let Some(expanded) = self.expand_constant_brick(current_brick) {
                        normalized[index] = BrickDomain::Value(expanded);
                        rewrites += 1;
                        break;
                    }
                }

                // --Rule 4-- Two successive bricks have equal content sets.
                // Merge them by adding their intervals, unless the first interval
                // is not a point and the second minimum is nonzero.
                if let Some(BrickDomain::Value(next_brick)) = lookup.get(index + 1) {
                    if current_brick.sequence() == next_brick.sequence()
                        && !(current_brick.min() != current_brick.max()
                            && !next_brick.min().is_zero())
                    {
                        normalized[index] =
                            BrickDomain::Value(current_brick.add_intervals(next_brick));
                        normalized.remove(index + 1);
                        rewrites += 1;
                        break;
                    }
                }

                // --Rule 5-- The brick occurs at least once within a non-point interval.
                // Break it into a remainder and a mandatory occurrence.
                if current_brick.min() >= IndexBound::ONE
                    && current_brick.min() != current_brick.max()
                {
                    let (remainder, mandatory) = current_brick.split_repetition();
                    normalized[index] = BrickDomain::Value(remainder);
                    normalized.insert(index + 1, BrickDomain::Value(mandatory));
                    rewrites += 1;
                    break;
                }
            }

            if lookup == normalized {
                unchanged = true;
            } else {
                trace!("normalize ({location:?}): rewrite {rewrites}");
                lookup = normalized.clone();
            }
        }

        (normalized, rewrites)
    }

    /// The rule 2 rewrite: merge two adjacent bricks that both occur exactly once.
    /// The merge is skipped when the concatenated content set would outgrow
    /// the set size limit of the policy.
    fn merge_constant_pair(&self, current: &Brick, next: Option<&BrickDomain>) -> Option<Brick> {
        let next_brick = match next {
            Some(BrickDomain::Value(brick)) => brick,
            _ => return None,
        };
        if (current.min(), current.max(), next_brick.min(), next_brick.max())
            != (
                IndexBound::ONE,
                IndexBound::ONE,
                IndexBound::ONE,
                IndexBound::ONE,
            )
        {
            return None;
        }
        let product_size = current.sequence().len().checked_mul(next_brick.sequence().len())?;
        if IndexBound::from(product_size) > self.set_size_limit {
            trace!("skipping constant-set merge of {product_size} literals");
            return None;
        }

        Some(current.concat_sets(next_brick))
    }

    /// The rule 3 rewrite: expand a brick with constant occurrence count.
    /// The expansion is skipped when the expanded content set would outgrow
    /// the set size limit of the policy, or when the repetition count itself
    /// exceeds the repeat difference limit. The latter also bounds the length
    /// of the expanded literals, which grows linearly in the count even for
    /// singleton content sets.
    fn expand_constant_brick(&self, current: &Brick) -> Option<Brick> {
        let times = match (current.min(), current.max()) {
            (IndexBound::Finite(min), IndexBound::Finite(max)) if min == max && min > 1 => min,
            _ => return None,
        };
        if IndexBound::Finite(times) > self.repeat_difference_limit {
            trace!("skipping constant-repetition expansion with count {times}");
            return None;
        }
        let expanded_size = u32::try_from(times)
            .ok()
            .and_then(|exponent| (current.sequence().len() as u64).checked_pow(exponent));
        match expanded_size {
            Some(size) if IndexBound::from(size) <= self.set_size_limit => {
                Some(current.expand_repetitions(times as usize))
            }
            _ => {
                trace!("skipping constant-repetition expansion with exponent {times}");
                None
            }
        }
    }
}
