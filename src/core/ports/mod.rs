//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the verification engine
//! and external systems (git, the hosted repository, probes).
//!
//! Implementations live in the `adapters` and `probe` modules.

mod evaluator;
mod hosted;
mod vcs;

pub use evaluator::CheckEvaluator;
pub use hosted::HostedRepository;
pub use vcs::VersionControl;

#[cfg(test)]
pub use evaluator::MockCheckEvaluator;
#[cfg(test)]
pub use vcs::MockVersionControl;
