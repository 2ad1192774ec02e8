//! Regular expressions as an abstract syntax tree.
//!
//! This module provides the regex representation that the abstract string
//! domains interpret. Parsing concrete regex syntax is out of scope;
//! client analyses build the tree through the constructors below.
//! The tree is deliberately small: concatenation, alternation, bounded
//! loops, single-character classes, anchors and the empty word.

pub mod interpreter;

use crate::abstract_domain::IndexBound;
use crate::prelude::*;
use std::collections::BTreeSet;

/// A start-of-subject or end-of-subject anchor.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Anchor {
    /// Matches only at the start of the subject.
    Begin,
    /// Matches only at the end of the subject.
    End,
}

/// The abstract syntax tree of a regular expression.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum Regex {
    /// The empty word.
    Empty,
    /// A single character out of a set of characters.
    Chars(BTreeSet<char>),
    /// A sequence of expressions matched one after another.
    Concat(Vec<Regex>),
    /// A choice between alternative expressions.
    Alternation(Vec<Regex>),
    /// A bounded repetition of an expression.
    Loop {
        /// The repeated expression.
        body: Box<Regex>,
        /// The least number of repetitions.
        min: IndexBound,
        /// The greatest number of repetitions, possibly infinite.
        max: IndexBound,
    },
    /// A positional anchor.
    Anchor(Anchor),
}

impl Regex {
    /// A single literal character.
    pub fn char(character: char) -> Regex {
        Regex::Chars(BTreeSet::from([character]))
    }

    /// A single character out of the given class.
    pub fn char_class(characters: impl IntoIterator<Item = char>) -> Regex {
        Regex::Chars(characters.into_iter().collect())
    }

    /// The concatenation of the characters of a literal string.
    pub fn literal(string: &str) -> Regex {
        Regex::Concat(string.chars().map(Regex::char).collect())
    }

    /// The concatenation of the given expressions.
    pub fn concat(parts: impl IntoIterator<Item = Regex>) -> Regex {
        Regex::Concat(parts.into_iter().collect())
    }

    /// The alternation of the given expressions.
    pub fn alternation(parts: impl IntoIterator<Item = Regex>) -> Regex {
        Regex::Alternation(parts.into_iter().collect())
    }

    /// A repetition of `body` between `min` and `max` times.
    pub fn repeat(body: Regex, min: impl Into<IndexBound>, max: impl Into<IndexBound>) -> Regex {
        Regex::Loop {
            body: Box::new(body),
            min: min.into(),
            max: max.into(),
        }
    }

    /// Zero or more repetitions of `body`.
    pub fn star(body: Regex) -> Regex {
        Regex::Loop {
            body: Box::new(body),
            min: IndexBound::ZERO,
            max: IndexBound::Infinite,
        }
    }

    /// One or more repetitions of `body`.
    pub fn plus(body: Regex) -> Regex {
        Regex::Loop {
            body: Box::new(body),
            min: IndexBound::ONE,
            max: IndexBound::Infinite,
        }
    }

    /// Zero or one occurrence of `body`.
    pub fn opt(body: Regex) -> Regex {
        Regex::Loop {
            body: Box::new(body),
            min: IndexBound::ZERO,
            max: IndexBound::ONE,
        }
    }
}
