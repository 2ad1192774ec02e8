/*!
A library implementing the Bricks abstract domain for string analysis.

The Bricks domain represents a (possibly infinite) set of concrete strings
as a finite, ordered list of *bricks*.
Each brick is a set of literal string contents together with an interval
bounding how often the contents may be repeated,
e.g. `[{"cwe"}]^{1,1}` represents exactly the string `"cwe"`
and `[{"mo","de"}]^{1,2}` represents `{mo, de, momo, mode, demo, dede}`.

A fixpoint-based analyzer propagates Bricks values across the control flow
graph of a program and calls into this library at every merge point:

- [`BricksDomain::join`] and [`BricksDomain::meet`] combine values,
- [`BricksDomain::widening`] guarantees stabilization of the fixpoint
  by bounding list length, literal-set size and repetition-interval width
  through a shared [`BricksPolicy`](abstract_domain::BricksPolicy),
- [`BricksDomain::from_regex`] and [`BricksDomain::is_match`] interpret
  regular expressions in the domain and decide provable match outcomes.

After every structural change a value is routed through the owning policy's
normalization, a fixpoint rewrite system that keeps brick lists in a
canonical, minimal form.
All operations are pure functions over immutable inputs;
the only shared state is the policy record, which is read-only after
construction and can be shared freely across parallel analyses.

[`BricksDomain::join`]: abstract_domain::BricksDomain::join
[`BricksDomain::meet`]: abstract_domain::BricksDomain::meet
[`BricksDomain::widening`]: abstract_domain::BricksDomain::widening
[`BricksDomain::from_regex`]: abstract_domain::BricksDomain::from_regex
[`BricksDomain::is_match`]: abstract_domain::BricksDomain::is_match
*/

pub mod abstract_domain;
pub mod regex;

mod prelude {
    pub use anyhow::{anyhow, Error};
    pub use serde::{Deserialize, Serialize};
}
