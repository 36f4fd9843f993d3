//! Business logic services
//!
//! Orchestration logic that operates on domain models through ports.
//!
//! - [`runner`] - Fail-open evaluation of an ordered check list
//! - [`chain`] - Dependency-gated step verification and proof upkeep
//! - [`merge`] - Approval-relaxing merge assistance

pub mod chain;
pub mod merge;
pub mod runner;

pub use chain::{BLOCKED_BY_PREREQUISITE, StepPlan, StepRun, verify_step};
pub use merge::{MergeReport, assisted_merge};
pub use runner::run_checks;
