//! Check runner - evaluates an ordered list of checks
//!
//! Every check is evaluated, regardless of earlier outcomes, so one run
//! shows the complete picture. Counters are folded from the outcomes.

use crate::core::models::{Check, CheckOutcome, Outcome, StepResult};

/// Evaluate `checks` in order and fold the outcomes into a [`StepResult`]
///
/// `evaluate` is called exactly once per check.
pub fn run_checks<F>(step: &str, checks: &[Check], mut evaluate: F) -> StepResult
where
    F: FnMut(&Check) -> Outcome,
{
    checks
        .iter()
        .map(|check| CheckOutcome {
            check: check.clone(),
            outcome: evaluate(check),
        })
        .fold(StepResult::new(step), StepResult::record)
}
