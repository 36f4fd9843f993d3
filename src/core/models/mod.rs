//! Domain models for shipcheck
//!
//! Pure data structures with no I/O dependencies (stack detection aside).
//!
//! - [`Check`] / [`Predicate`] - "For this step, this must hold"
//! - [`Outcome`] / [`StepResult`] - What a run found
//! - [`ProofToken`] / [`Revision`] - "Every check passed at this commit"
//! - [`Stack`] - Detected project stack
//! - hosted records - What the hosted repository reports

mod check;
mod hosted;
mod outcome;
mod proof;
mod stack;

pub use check::{Check, Predicate};
pub use hosted::{BranchProtection, Issue, Job, MergeMethod, PrCheck, WorkflowRun};
pub use outcome::{CheckOutcome, Outcome, StepResult};
pub use proof::{ProofToken, Revision};
pub use stack::Stack;
