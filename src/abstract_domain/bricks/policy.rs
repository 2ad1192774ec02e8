//! This module contains the policy record shared by all Bricks values of one analysis.
//!
//! The policy carries the thresholds that bound the size of Bricks values:
//!  - the *list length limit* bounds the number of bricks in a list,
//!  - the *set size limit* bounds the number of literals in a single brick,
//!  - the *repeat difference limit* bounds the width of occurrence intervals.
//!
//! Two boolean knobs toggle the optional normalization passes that merge
//! constant content sets and expand constant repetition counts.
//!
//! The policy is immutable after construction and shared by reference
//! (via [`Arc`](std::sync::Arc)) by every Bricks value it produces.

use super::super::IndexBound;
use crate::prelude::*;

/// Configurable thresholds and knobs of the Bricks domain.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct BricksPolicy {
    /// Brick lists whose length comes near this limit are widened to *Top*.
    pub list_length_limit: IndexBound,
    /// Bricks whose content set outgrows this limit are widened to *Top*.
    pub set_size_limit: IndexBound,
    /// Occurrence intervals wider than this limit are widened to `[0, inf)`.
    pub repeat_difference_limit: IndexBound,
    /// Toggles the normalization pass that merges adjacent constant bricks
    /// by concatenating their content sets.
    pub merge_constant_sets: bool,
    /// Toggles the normalization pass that expands bricks with a constant
    /// occurrence count into bricks that occur exactly once.
    pub expand_constant_repetitions: bool,
}

impl Default for BricksPolicy {
    fn default() -> Self {
        BricksPolicy {
            list_length_limit: IndexBound::Finite(1000),
            set_size_limit: IndexBound::Finite(1 << 18),
            repeat_difference_limit: IndexBound::Finite(100),
            merge_constant_sets: true,
            expand_constant_repetitions: true,
        }
    }
}

impl BricksPolicy {
    /// Deserialize a policy from the configuration file of the host analyzer.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, Error> {
        serde_json::from_value(json.clone())
            .map_err(|err| anyhow!("invalid bricks policy configuration: {err}"))
    }
}

/// Metadata distinguishing why a normalization is running.
/// It does not change the computed canonical form, only tracing.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum NormalizeLocation {
    /// Normalization after a join of two values.
    Join,
    /// Normalization after a structural operation like meet or concatenation.
    Operation,
    /// Normalization after converting a regular expression.
    Conversion,
    /// Normalization after a widening step.
    Widening,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_from_json() {
        let json = serde_json::json!({
            "list_length_limit": { "Finite": 8 },
            "set_size_limit": { "Finite": 16 },
            "repeat_difference_limit": { "Finite": 4 },
            "merge_constant_sets": false,
            "expand_constant_repetitions": true,
        });
        let policy = BricksPolicy::from_json(&json).unwrap();

        assert_eq!(policy.list_length_limit, IndexBound::Finite(8));
        assert_eq!(policy.set_size_limit, IndexBound::Finite(16));
        assert!(!policy.merge_constant_sets);

        assert!(BricksPolicy::from_json(&serde_json::json!({ "bogus": 1 })).is_err());
    }
}
