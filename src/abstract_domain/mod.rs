//! This module defines traits describing general properties of abstract domains
//! as well as the abstract domain types implementing these traits.

mod bounds;
pub use bounds::IndexBound;

mod proof_outcome;
pub use proof_outcome::ProofOutcome;

mod bricks;
pub use bricks::{Brick, BrickDomain, BricksDomain, BricksPolicy, NormalizeLocation};

/// The main trait describing an abstract domain.
///
/// Each abstract domain is partially ordered.
/// Abstract domains of the same type can be merged.
pub trait AbstractDomain: Sized + Eq + Clone {
    /// Returns an upper bound (with respect to the partial order on the domain)
    /// for the two inputs `self` and `other`.
    #[must_use]
    fn merge(&self, other: &Self) -> Self;

    /// Returns an upper bound (with respect to the partial order on the domain)
    /// for the two inputs `self` and `other`.
    ///
    /// Modifies `self` in-place to hold the result. This can be useful in
    /// situations where it is not necessary to create a new object and more
    /// efficient to modify an existing one in-place.
    ///
    /// # Default
    ///
    /// Calls [`AbstractDomain::merge`] on the inputs and overwrites `self` with
    /// the result. Does nothing when `self` is equal to `other`.
    fn merge_with(&mut self, other: &Self) -> &mut Self {
        if self != other {
            let new_value = self.merge(other);

            *self = new_value;
        }

        self
    }

    /// Returns whether the element represents the top element (i.e. maximal with respect to the partial order) or not.
    /// If a domain has no maximal element, this function should always return false.
    fn is_top(&self) -> bool;
}

/// An abstract domain implementing this trait has a global maximum, i.e. a *Top* element.
pub trait HasTop {
    /// Return an instance of the *Top* element.
    ///
    /// Since an abstract domain type may represent a whole family of abstract domains,
    /// this function takes an instance of the domain as a parameter,
    /// so it can return the *Top* element of the same family member that the provided instance belongs to.
    fn top(&self) -> Self;
}

/// An abstract domain implementing this trait has a global minimum, i.e. a *Bottom* element
/// representing unreachability.
pub trait HasBottom {
    /// Return an instance of the *Bottom* element belonging to the same family member
    /// as the provided instance.
    fn bottom(&self) -> Self;

    /// Returns whether the element represents the bottom element (i.e. minimal with respect
    /// to the partial order) or not.
    fn is_bottom(&self) -> bool;
}
