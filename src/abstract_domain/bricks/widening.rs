//! This module implements the widening operator and the length alignment
//! of the Bricks domain. The exact widening procedure depends on the three
//! thresholds of the policy:
//!  - If either brick list's length falls *below* the list length limit,
//!    the result is forced to *Top*. Note the comparison direction: widening
//!    degrades to *Top* as lists approach the limit from below. This gives the
//!    fixpoint computation headroom before the limit is ever reached and must
//!    not be inverted into `count > limit`.
//!  - If the merged content set of a brick pair outgrows the set size limit,
//!    that brick is forced to the *Top* segment.
//!  - If the merged occurrence interval of a brick pair is wider than the
//!    repeat difference limit, the interval is forced to `[0, inf)` while the
//!    merged contents are kept.
//!
//! A brick pair is merged without precision loss when none of the thresholds
//! are exceeded.

use log::debug;

use super::super::{AbstractDomain, HasBottom, IndexBound};
use super::{Brick, BrickDomain, BricksDomain, BricksPolicy, NormalizeLocation};

impl BricksPolicy {
    /// The widening of two values during a fixpoint computation.
    ///
    /// Degenerate operands are widened trivially: a *Bottom* operand returns
    /// the other operand, a *Top* operand returns *Top*. Otherwise the escape
    /// valve above applies, and only lists whose length has reached the list
    /// length limit are widened pointwise after alignment.
    pub fn widening(&self, prev: &BricksDomain, next: &BricksDomain) -> BricksDomain {
        if prev.is_bottom() {
            return next.clone();
        }
        if next.is_bottom() {
            return prev.clone();
        }
        if prev.is_top() || next.is_top() {
            return BricksDomain::top(prev.policy().clone());
        }

        if self.list_length_limit > IndexBound::from(prev.len())
            || self.list_length_limit > IndexBound::from(next.len())
        {
            debug!(
                "widening list lengths {} and {} below limit {}, giving up",
                prev.len(),
                next.len(),
                self.list_length_limit
            );
            return BricksDomain::top(prev.policy().clone());
        }

        let widened = prev
            .zip(next)
            .iter()
            .map(|(left, right)| self.widen_brick(left, right))
            .collect();

        BricksDomain::from_raw(prev.policy().clone(), widened)
            .normalize(NormalizeLocation::Widening)
    }

    /// Widens a single brick pair: join the two bricks and force the result
    /// towards *Top* if the set size or repeat difference threshold is exceeded.
    fn widen_brick(&self, left: &BrickDomain, right: &BrickDomain) -> BrickDomain {
        let (left_brick, right_brick) = match (left, right) {
            (BrickDomain::Value(left_brick), BrickDomain::Value(right_brick)) => {
                (left_brick, right_brick)
            }
            _ => return BrickDomain::Top,
        };

        let joined = left_brick.join(right_brick);
        if IndexBound::from(joined.sequence().len()) > self.set_size_limit {
            debug!(
                "widening content set of {} literals to Top",
                joined.sequence().len()
            );
            return BrickDomain::Top;
        }
        if joined.interval_width() > self.repeat_difference_limit {
            debug!("widening interval ({},{}) to (0,inf)", joined.min(), joined.max());
            return BrickDomain::Value(Brick::new(
                joined.sequence().clone(),
                IndexBound::ZERO,
                IndexBound::Infinite,
            ));
        }

        BrickDomain::Value(joined)
    }

    /// Aligns a shorter brick list to the length of a longer one.
    ///
    /// To achieve higher positional correspondence, padding bricks representing
    /// the empty string are inserted at the positions where the two lists first
    /// diverge structurally, so that equal bricks keep equal indices.
    /// If the lengths already match, the shorter list is returned unchanged.
    pub fn extend(&self, shorter: &[BrickDomain], longer: &[BrickDomain]) -> Vec<BrickDomain> {
        if shorter.len() >= longer.len() {
            return shorter.to_vec();
        }

        let len_diff = longer.len() - shorter.len();
        let mut empty_bricks_added = 0;
        let mut next_short = 0;
        let mut new_list = Vec::with_capacity(longer.len());

        for longer_brick in longer.iter() {
            if empty_bricks_added < len_diff
                && (next_short >= shorter.len() || shorter[next_short] != *longer_brick)
            {
                new_list.push(BrickDomain::empty_string());
                empty_bricks_added += 1;
            } else {
                new_list.push(shorter[next_short].clone());
                next_short += 1;
            }
        }

        new_list
    }
}
