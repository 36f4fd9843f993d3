//! Step chain - dependency-gated verification of one step
//!
//! A step's first check is the gate on its predecessor's proof. The gate
//! does not stop the run: the remaining checks still execute, but a step
//! with a failed gate can never reach all-pass and so never writes a proof.

use log::{debug, info};
use serde::Serialize;

use crate::core::models::{Check, Outcome, ProofToken, Revision, StepResult};
use crate::core::ports::CheckEvaluator;
use crate::core::services::runner::run_checks;
use crate::error::ShipcheckError;
use crate::storage::{ProofState, ProofStore};

/// Reason reported for hosted checks skipped after a failed gate
pub const BLOCKED_BY_PREREQUISITE: &str = "blocked by prerequisite step";

/// A step resolved into the exact checks that will run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepPlan {
    /// Step name
    pub name: String,
    /// Human title
    pub title: String,
    /// Position in the rulebook (1-based)
    pub number: usize,
    /// Step whose proof gates this one
    pub gate: Option<String>,
    /// Skip hosted checks once the gate has failed
    pub short_circuit: bool,
    /// Checks in evaluation order, gate first
    pub checks: Vec<Check>,
}

impl StepPlan {
    /// Whether any check needs the hosted repository
    #[must_use]
    pub fn needs_hosted(&self) -> bool {
        self.checks.iter().any(|c| c.predicate.is_hosted())
    }

    /// Whether the step checks anything besides its gate
    #[must_use]
    pub fn has_own_checks(&self) -> bool {
        self.checks.iter().any(|c| !c.predicate.is_gate())
    }
}

/// Everything one verification run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRun {
    /// Aggregated outcomes
    pub result: StepResult,
    /// Proof written by this run
    pub proof: Option<ProofToken>,
    /// Proof state found before the checks ran
    pub previous: ProofState,
}

/// Verify one step and update its proof
///
/// A step left with nothing but its gate (every declared check belongs
/// to another stack) is a hard error: it would certify nothing.
///
/// 1. A proof from another revision is deleted before anything runs.
/// 2. All checks are evaluated in order.
/// 3. All-pass writes a fresh proof; anything else (a single pending
///    included) deletes the step's proof.
pub fn verify_step(
    plan: &StepPlan,
    evaluator: &dyn CheckEvaluator,
    proofs: &ProofStore,
    revision: &Revision,
) -> Result<StepRun, ShipcheckError> {
    if !plan.has_own_checks() {
        return Err(ShipcheckError::NothingToVerify(plan.name.clone()));
    }

    let previous = proofs.check_stale(&plan.name, revision)?;
    debug!("step '{}' starts with proof {}", plan.name, previous.label());

    let mut gate_failed = false;
    let result = run_checks(&plan.name, &plan.checks, |check| {
        if plan.short_circuit && gate_failed && check.predicate.is_hosted() {
            return Outcome::fail(BLOCKED_BY_PREREQUISITE);
        }

        let outcome = evaluator.evaluate(&check.predicate);
        if check.predicate.is_gate() && !outcome.is_pass() {
            gate_failed = true;
        }
        outcome
    });

    let proof = if result.all_passed() {
        Some(proofs.write(&plan.name, result.passed, result.total(), revision)?)
    } else {
        if proofs.remove(&plan.name)? {
            info!("removed proof for '{}': run did not fully pass", plan.name);
        }
        None
    };

    Ok(StepRun {
        result,
        proof,
        previous,
    })
}
