//! A generic forward interpreter for regular expressions.
//!
//! The interpreter walks a [`Regex`] from left to right and threads an
//! abstract state through it. It knows nothing about the state itself:
//! all domain knowledge lives in an object implementing
//! [`ForwardOperations`], which describes how the state reacts to a
//! character class, a bounded loop, an alternation and an anchor.
//! An abstract string domain obtains a regex interpretation by implementing
//! the trait once per approximation direction and running [`interpret`].

use std::collections::BTreeSet;

use super::{Anchor, Regex};
use crate::abstract_domain::IndexBound;

/// The operations of a domain interpreting regular expressions.
///
/// All methods take the interpreter state by value and return the successor
/// state. Implementations are free to allocate bookkeeping (e.g. an arena of
/// partial results) on `self`.
pub trait ForwardOperations {
    /// The abstract state threaded through the interpretation.
    type State: Clone;

    /// The state representing the empty word.
    fn empty(&mut self) -> Self::State;

    /// The state representing no word at all.
    fn unreachable(&mut self) -> Self::State;

    /// Whether a state represents no word at all.
    /// Unreachable states are not interpreted any further.
    fn is_unreachable(&self, state: &Self::State) -> bool;

    /// Continue a state with a single character out of `chars`.
    fn char_class(&mut self, state: Self::State, chars: &BTreeSet<char>) -> Self::State;

    /// Continue a state with a bounded repetition of an already interpreted
    /// loop body. The body was interpreted starting from the empty word.
    fn bounded_loop(
        &mut self,
        state: Self::State,
        body: Self::State,
        min: IndexBound,
        max: IndexBound,
    ) -> Self::State;

    /// Merge the states of two alternative branches.
    fn join(&mut self, left: Self::State, right: Self::State) -> Self::State;

    /// Continue a state with a positional anchor.
    fn anchor(&mut self, state: Self::State, anchor: Anchor) -> Self::State;
}

/// Interprets `regex` starting from `state` and returns the end state.
pub fn interpret<O: ForwardOperations>(
    ops: &mut O,
    regex: &Regex,
    state: O::State,
) -> O::State {
    if ops.is_unreachable(&state) {
        return state;
    }
    match regex {
        Regex::Empty => state,
        Regex::Chars(chars) => ops.char_class(state, chars),
        Regex::Concat(parts) => parts
            .iter()
            .fold(state, |current, part| interpret(ops, part, current)),
        Regex::Alternation(parts) => {
            let mut merged: Option<O::State> = None;
            for part in parts {
                let branch = interpret(ops, part, state.clone());
                merged = Some(match merged {
                    Some(previous) => ops.join(previous, branch),
                    None => branch,
                });
            }
            merged.unwrap_or_else(|| ops.unreachable())
        }
        Regex::Loop { body, min, max } => {
            let seed = ops.empty();
            let body_state = interpret(ops, body, seed);
            ops.bounded_loop(state, body_state, *min, *max)
        }
        Regex::Anchor(anchor) => ops.anchor(state, *anchor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal test domain tracking whether the interpreted expression
    /// can still match the empty word.
    struct Nullability;

    impl ForwardOperations for Nullability {
        type State = Option<bool>;

        fn empty(&mut self) -> Self::State {
            Some(true)
        }

        fn unreachable(&mut self) -> Self::State {
            None
        }

        fn is_unreachable(&self, state: &Self::State) -> bool {
            state.is_none()
        }

        fn char_class(&mut self, _state: Self::State, _chars: &BTreeSet<char>) -> Self::State {
            Some(false)
        }

        fn bounded_loop(
            &mut self,
            state: Self::State,
            body: Self::State,
            min: IndexBound,
            _max: IndexBound,
        ) -> Self::State {
            match (state, body) {
                (Some(outer), Some(inner)) => Some(outer && (inner || min.is_zero())),
                _ => None,
            }
        }

        fn join(&mut self, left: Self::State, right: Self::State) -> Self::State {
            match (left, right) {
                (None, other) | (other, None) => other,
                (Some(left), Some(right)) => Some(left || right),
            }
        }

        fn anchor(&mut self, state: Self::State, _anchor: Anchor) -> Self::State {
            state
        }
    }

    #[test]
    fn forward_interpretation_over_a_toy_domain() {
        let mut ops = Nullability;

        let seed = ops.empty();
        assert_eq!(interpret(&mut ops, &Regex::literal("ab"), seed), Some(false));
        let seed = ops.empty();
        assert_eq!(interpret(&mut ops, &Regex::star(Regex::char('a')), seed), Some(true));
        let seed = ops.empty();
        assert_eq!(interpret(&mut ops, &Regex::plus(Regex::char('a')), seed), Some(false));
        let seed = ops.empty();
        assert_eq!(
            interpret(
                &mut ops,
                &Regex::alternation([Regex::literal("ab"), Regex::Empty]),
                seed
            ),
            Some(true)
        );
    }

    #[test]
    fn alternations_fold_all_branches() {
        let mut ops = Nullability;

        let seed = ops.empty();
        assert_eq!(
            interpret(
                &mut ops,
                &Regex::alternation([
                    Regex::literal("ab"),
                    Regex::literal("cd"),
                    Regex::star(Regex::char('e')),
                ]),
                seed
            ),
            Some(true)
        );

        let seed = ops.empty();
        assert_eq!(interpret(&mut ops, &Regex::alternation([]), seed), None);
    }
}
