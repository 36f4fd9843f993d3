//! Check evaluation port
//!
//! The step chain only needs something that turns a predicate into an
//! outcome; the probe layer is the production implementation.

use crate::core::models::{Outcome, Predicate};

/// Answers predicates
#[cfg_attr(test, mockall::automock)]
pub trait CheckEvaluator {
    /// Evaluate one predicate; never fails, problems become outcomes
    fn evaluate(&self, predicate: &Predicate) -> Outcome;
}
