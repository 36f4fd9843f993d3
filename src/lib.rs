//! shipcheck - step-by-step production readiness verification
//!
//! This library provides the verification engine behind the `shipcheck` CLI:
//! declarative checklist steps, a fail-open check runner, probes for the
//! working tree, git history and the hosted GitHub repository, and
//! revision-bound proof files that chain steps together.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod core;
pub mod error;
pub mod output;
pub mod paths;
pub mod probe;
pub mod rulebook;
pub mod storage;
pub mod workspace;

pub use error::ShipcheckError;
