//! Hard errors that abort a run
//!
//! Check failures are never errors: they become `Fail` or `Pending`
//! outcomes. The variants here cover the cases where no check can be
//! meaningfully evaluated at all.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a shipcheck invocation
#[derive(Debug, Error)]
pub enum ShipcheckError {
    /// The starting directory is not inside a git work tree
    #[error("not inside a git repository: {0}")]
    NotARepository(PathBuf),

    /// HEAD does not point at a commit yet
    #[error("repository has no commits yet; commit something before verifying")]
    NoRevision,

    /// The requested step is not defined in the rulebook
    #[error("unknown step '{0}' (run `shipcheck steps` to list steps)")]
    UnknownStep(String),

    /// Every check of the step belongs to another stack
    #[error("step '{0}' has no checks for the detected stack; nothing to verify")]
    NothingToVerify(String),

    /// An external executable the step depends on is not installed
    #[error("required tool '{0}' was not found on PATH")]
    ToolMissing(String),

    /// The rulebook could not be read, parsed or validated
    #[error("invalid rulebook {path}: {message}")]
    InvalidRulebook {
        /// Path of the offending rulebook
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// A proof was requested for a step that did not fully pass
    #[error("refusing to write proof for '{step}': only {passed}/{total} checks passed")]
    IncompleteProof {
        /// Step name
        step: String,
        /// Checks that passed
        passed: usize,
        /// Checks in the step
        total: usize,
    },

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Proof file (de)serialization error
    #[error("proof encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Git library error
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}
