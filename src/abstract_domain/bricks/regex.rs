//! This module builds Bricks values that approximate the language of a
//! regular expression and decides match provability.
//!
//! The conversion drives the generic forward interpreter with a generating
//! state machine. Partial results are kept as chains of bricks inside an
//! arena: each node stores its brick and the arena index of its predecessor,
//! so that walking a chain is index arithmetic and two branches of an
//! alternation can share their common prefix. A state is either unreachable
//! or a chain tip plus a flag recording whether an end anchor was seen.
//!
//! Two approximation directions are supported, selected by a flag threaded
//! through every operation:
//! - the *over-approximating* conversion contains every string the regex
//!   matches (and possibly more); imprecision degrades to *Top* segments.
//! - the *under-approximating* conversion contains only strings the regex
//!   matches (and possibly fewer); imprecision degrades to *Bottom*.
//!
//! The conversion interprets the regex as matching the whole subject.
//! Explicit anchors are permitted and act as boundary assertions.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use super::super::{HasBottom, IndexBound, ProofOutcome};
use super::{Brick, BrickDomain, BricksDomain, BricksPolicy, NormalizeLocation};
use crate::regex::interpreter::{interpret, ForwardOperations};
use crate::regex::{Anchor, Regex};

/// One node of a generating chain: a brick and the index of its predecessor.
#[derive(Debug, Clone)]
struct GenNode {
    brick: BrickDomain,
    parent: Option<usize>,
    depth: usize,
}

/// The state threaded through the forward interpretation of a regex.
#[derive(Debug, Clone)]
enum GenState {
    /// No word can reach this point.
    Bottom,
    /// A chain of generated bricks, identified by its tip node.
    /// `tip == None` denotes the empty chain, i.e. the empty word.
    /// `ended` records that an end anchor forbids further content.
    Chain { tip: Option<usize>, ended: bool },
}

/// The generating operations building brick chains for a regex,
/// parameterized over the approximation direction.
struct BrickGenerator {
    arena: Vec<GenNode>,
    policy: Arc<BricksPolicy>,
    underapprox: bool,
}

impl BrickGenerator {
    fn new(policy: Arc<BricksPolicy>, underapprox: bool) -> Self {
        BrickGenerator {
            arena: Vec::new(),
            policy,
            underapprox,
        }
    }

    /// Allocate a new chain node and return its index.
    fn push_node(&mut self, parent: Option<usize>, brick: BrickDomain) -> usize {
        let depth = parent.map_or(0, |index| self.arena[index].depth + 1);
        self.arena.push(GenNode {
            brick,
            parent,
            depth,
        });

        self.arena.len() - 1
    }

    /// Collect the bricks of a chain in list order (root first).
    fn chain_bricks(&self, tip: Option<usize>) -> Vec<BrickDomain> {
        let mut bricks = Vec::new();
        let mut current = tip;
        while let Some(index) = current {
            bricks.push(self.arena[index].brick.clone());
            current = self.arena[index].parent;
        }
        bricks.reverse();

        bricks
    }

    /// Whether every node of a chain can represent the empty word.
    fn chain_can_be_empty(&self, tip: Option<usize>) -> bool {
        let mut current = tip;
        while let Some(index) = current {
            if !self.arena[index].brick.can_be_empty() {
                return false;
            }
            current = self.arena[index].parent;
        }

        true
    }

    /// Whether a chain represents the empty word and nothing else.
    fn chain_is_empty_word(&self, tip: Option<usize>) -> bool {
        let mut current = tip;
        while let Some(index) = current {
            match &self.arena[index].brick {
                BrickDomain::Value(brick) if brick.is_empty_string() => {}
                _ => return false,
            }
            current = self.arena[index].parent;
        }

        true
    }

    /// Copy the chain ending in `source` onto the chain ending in `dest`.
    fn splice(&mut self, dest: Option<usize>, source: Option<usize>) -> Option<usize> {
        let mut tip = dest;
        for brick in self.chain_bricks(source) {
            tip = Some(self.push_node(tip, brick));
        }

        tip
    }

    /// The deepest node shared by both chains, found by truncating the deeper
    /// chain first and then walking both chains up in lock step.
    fn common_ancestor(&self, left: Option<usize>, right: Option<usize>) -> Option<usize> {
        let depth = |tip: Option<usize>| tip.map_or(0, |index| self.arena[index].depth + 1);
        let parent = |tip: Option<usize>| tip.and_then(|index| self.arena[index].parent);

        let mut left = left;
        let mut right = right;
        while depth(left) > depth(right) {
            left = parent(left);
        }
        while depth(right) > depth(left) {
            right = parent(right);
        }
        while left != right {
            left = parent(left);
            right = parent(right);
        }

        left
    }

    /// The bricks a chain adds on top of one of its ancestors, in list order.
    fn diff_bricks(&self, tip: Option<usize>, ancestor: Option<usize>) -> Vec<BrickDomain> {
        let mut bricks = Vec::new();
        let mut current = tip;
        while current != ancestor {
            let index = current.expect("ancestor is part of the chain");
            bricks.push(self.arena[index].brick.clone());
            current = self.arena[index].parent;
        }
        bricks.reverse();

        bricks
    }

    /// Give up precision in the direction of the approximation:
    /// an unknown segment when over-approximating,
    /// no result at all when under-approximating.
    fn imprecise(&mut self, tip: Option<usize>, ended: bool, reason: &str) -> GenState {
        debug!("imprecise regex interpretation: {reason}");
        if self.underapprox {
            GenState::Bottom
        } else {
            GenState::Chain {
                tip: Some(self.push_node(tip, BrickDomain::Top)),
                ended,
            }
        }
    }

    /// Finish the interpretation and normalize the generated chain.
    fn convert(mut self, regex: &Regex) -> BricksDomain {
        let seed = self.empty();
        match interpret(&mut self, regex, seed) {
            GenState::Bottom => BricksDomain::bottom(self.policy),
            GenState::Chain { tip, .. } => {
                let bricks = self.chain_bricks(tip);
                if bricks.is_empty() {
                    BricksDomain::empty_string(self.policy)
                } else {
                    BricksDomain::from_raw(self.policy.clone(), bricks)
                        .normalize(NormalizeLocation::Conversion)
                }
            }
        }
    }
}

impl ForwardOperations for BrickGenerator {
    type State = GenState;

    fn empty(&mut self) -> GenState {
        GenState::Chain {
            tip: None,
            ended: false,
        }
    }

    fn unreachable(&mut self) -> GenState {
        GenState::Bottom
    }

    fn is_unreachable(&self, state: &GenState) -> bool {
        matches!(state, GenState::Bottom)
    }

    fn char_class(&mut self, state: GenState, chars: &BTreeSet<char>) -> GenState {
        let (tip, ended) = match state {
            GenState::Bottom => return GenState::Bottom,
            GenState::Chain { tip, ended } => (tip, ended),
        };
        // Nothing may follow an end anchor, so the language is empty.
        if ended || chars.is_empty() {
            return GenState::Bottom;
        }

        // A single character following a singleton literal extends the
        // literal instead of allocating a new chain node.
        if let (Some(&character), Some(index)) = (chars.iter().next(), tip) {
            if let BrickDomain::Value(brick) = &self.arena[index].brick {
                if let (1, 1, Some(word)) = (
                    chars.len(),
                    brick.sequence().len(),
                    brick.sequence().iter().next(),
                ) {
                    if brick.min() == IndexBound::ONE && brick.max() == IndexBound::ONE {
                        let mut literal = word.clone();
                        literal.push(character);
                        let parent = self.arena[index].parent;
                        let extended =
                            self.push_node(parent, BrickDomain::Value(Brick::literal(literal)));
                        return GenState::Chain {
                            tip: Some(extended),
                            ended,
                        };
                    }
                }
            }
        }

        let sequence: BTreeSet<String> = chars.iter().map(|c| c.to_string()).collect();
        let brick = Brick::new(sequence, IndexBound::ONE, IndexBound::ONE);
        let tip = Some(self.push_node(tip, BrickDomain::Value(brick)));

        GenState::Chain { tip, ended }
    }

    fn bounded_loop(
        &mut self,
        state: GenState,
        body: GenState,
        min: IndexBound,
        max: IndexBound,
    ) -> GenState {
        debug_assert!(min <= max, "malformed loop bounds: {min} > {max}");
        let (tip, ended) = match state {
            GenState::Bottom => return GenState::Bottom,
            GenState::Chain { tip, ended } => (tip, ended),
        };
        let (body_tip, body_ended) = match body {
            // A loop whose body matches nothing can only be taken zero times.
            GenState::Bottom if min.is_zero() => {
                return GenState::Chain { tip, ended };
            }
            GenState::Bottom => return GenState::Bottom,
            GenState::Chain { tip, ended } => (tip, ended),
        };
        // After an end anchor the loop may only contribute the empty word,
        // which is possible when it can be skipped or its body can be empty.
        if ended {
            return if min.is_zero() || self.chain_can_be_empty(body_tip) {
                GenState::Chain { tip, ended }
            } else {
                GenState::Bottom
            };
        }
        // Zero repetitions and loops over the empty word contribute nothing.
        if max.is_zero() || body_tip.is_none() {
            return GenState::Chain { tip, ended };
        }
        if body_ended {
            return self.imprecise(tip, ended, "end anchor inside a loop body");
        }

        // A one-iteration loop collapses its body into the predecessor chain.
        if min == IndexBound::ONE && max == IndexBound::ONE {
            let tip = self.splice(tip, body_tip);
            return GenState::Chain { tip, ended };
        }

        // A body of exactly one singleton-literal brick takes the loop bounds
        // as its occurrence interval.
        if let Some(index) = body_tip {
            if self.arena[index].parent.is_none() {
                if let BrickDomain::Value(brick) = &self.arena[index].brick {
                    if brick.sequence().len() == 1
                        && brick.min() == IndexBound::ONE
                        && brick.max() == IndexBound::ONE
                    {
                        let repeated = Brick::new(brick.sequence().clone(), min, max);
                        let tip = Some(self.push_node(tip, BrickDomain::Value(repeated)));
                        return GenState::Chain { tip, ended };
                    }
                }
            }
        }

        self.imprecise(tip, ended, "loop body is not a single literal")
    }

    fn join(&mut self, left: GenState, right: GenState) -> GenState {
        let (left_tip, left_ended) = match left {
            GenState::Bottom => return right,
            GenState::Chain { tip, ended } => (tip, ended),
        };
        let (right_tip, right_ended) = match right {
            GenState::Bottom => {
                return GenState::Chain {
                    tip: left_tip,
                    ended: left_ended,
                }
            }
            GenState::Chain { tip, ended } => (tip, ended),
        };
        // Joining a branch that must end with one that may continue would
        // over-claim guaranteed matches.
        if self.underapprox && left_ended != right_ended {
            debug!("under-approximating join of mismatching end anchors");
            return GenState::Bottom;
        }
        let ended = left_ended && right_ended;

        let ancestor = self.common_ancestor(left_tip, right_tip);
        let left_diff = self.diff_bricks(left_tip, ancestor);
        let right_diff = self.diff_bricks(right_tip, ancestor);

        // Cheap, precise case: both branches added a single constant brick.
        if let ([BrickDomain::Value(left_brick)], [BrickDomain::Value(right_brick)]) =
            (left_diff.as_slice(), right_diff.as_slice())
        {
            let constant = |brick: &Brick| {
                brick.min() == IndexBound::ONE && brick.max() == IndexBound::ONE
            };
            if constant(left_brick) && constant(right_brick) {
                let joined = BrickDomain::Value(left_brick.join(right_brick));
                let tip = Some(self.push_node(ancestor, joined));
                return GenState::Chain { tip, ended };
            }
        }

        if self.underapprox {
            debug!("under-approximating join of non-constant branches");
            return GenState::Bottom;
        }

        // General case: convert both branch suffixes into full Bricks values,
        // join them in the domain and splice the result back onto the
        // common chain.
        let left_bricks = BricksDomain::from_raw(self.policy.clone(), left_diff);
        let right_bricks = BricksDomain::from_raw(self.policy.clone(), right_diff);
        let joined = left_bricks.join(&right_bricks);
        let mut tip = ancestor;
        for brick in joined.bricks() {
            tip = Some(self.push_node(tip, brick.clone()));
        }

        GenState::Chain { tip, ended }
    }

    fn anchor(&mut self, state: GenState, anchor: Anchor) -> GenState {
        let (tip, ended) = match state {
            GenState::Bottom => return GenState::Bottom,
            GenState::Chain { tip, ended } => (tip, ended),
        };
        match anchor {
            // A begin anchor is only passable while nothing has been matched.
            // A chain that only *may* be empty still carries non-empty
            // strings, which the under-approximation must not keep.
            Anchor::Begin => {
                if self.chain_is_empty_word(tip) {
                    GenState::Chain { tip, ended }
                } else if self.underapprox {
                    debug!("under-approximating begin anchor after content");
                    GenState::Bottom
                } else if self.chain_can_be_empty(tip) {
                    GenState::Chain { tip, ended }
                } else {
                    GenState::Bottom
                }
            }
            Anchor::End => GenState::Chain { tip, ended: true },
        }
    }
}

impl BricksDomain {
    /// Builds a Bricks value that over-approximates the language of `regex`:
    /// every string the regex matches is represented by the result.
    pub fn from_regex(policy: Arc<BricksPolicy>, regex: &Regex) -> BricksDomain {
        BrickGenerator::new(policy, false).convert(regex)
    }

    /// Builds a Bricks value that under-approximates the language of `regex`:
    /// every string represented by the result matches the regex.
    pub fn from_regex_under(policy: Arc<BricksPolicy>, regex: &Regex) -> BricksDomain {
        BrickGenerator::new(policy, true).convert(regex)
    }

    /// Decides whether the strings represented by `self` match `regex`.
    ///
    /// The over-approximating conversion is met with `self` to test whether a
    /// match is reachable at all; the under-approximating conversion is
    /// checked to contain `self` to test whether every represented string
    /// necessarily matches.
    pub fn is_match(&self, regex: &Regex) -> ProofOutcome {
        if self.is_bottom() {
            return ProofOutcome::Bottom;
        }

        let over = Self::from_regex(self.policy().clone(), regex);
        if self.meet(&over).is_bottom() {
            return ProofOutcome::False;
        }

        let under = Self::from_regex_under(self.policy().clone(), regex);
        if self.is_less_or_equal(&under) {
            ProofOutcome::True
        } else {
            ProofOutcome::Top
        }
    }
}
