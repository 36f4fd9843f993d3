//! Storage for proof files
//!
//! Proofs are the only state shipcheck persists. They live in a hidden
//! directory at the repository root that ignores its own contents.

/// Proof file storage
pub mod proof;

pub use proof::{ProofState, ProofStore};
