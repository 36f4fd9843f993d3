//! Centralized path definitions for shipcheck
//!
//! Every path is resolved relative to the repository root, never the
//! process working directory, so `-C <dir>` and tests behave the same.
//!
//! ## Storage Layout
//!
//! ```text
//! repo/
//! ├── .shipcheck.toml                   # COMMITTED: step definitions
//! └── .shipcheck/
//!     └── proofs/                       # Local state
//!         ├── .gitignore                # ignores everything but itself
//!         ├── verify-git-setup.proof
//!         └── verify-ci.proof
//! ```

use std::path::{Path, PathBuf};

/// Rulebook filename at the repository root
pub const RULEBOOK_FILE: &str = ".shipcheck.toml";

/// Default proof directory, relative to the repository root
pub const DEFAULT_PROOF_DIR: &str = ".shipcheck/proofs";

/// Ignore rule written into the proof directory
pub const PROOF_DIR_GITIGNORE: &str = "*\n!.gitignore\n";

const PROOF_PREFIX: &str = "verify-";
const PROOF_EXTENSION: &str = "proof";

/// Get path to the rulebook of a repository
#[must_use]
pub fn rulebook(root: &Path) -> PathBuf {
    root.join(RULEBOOK_FILE)
}

/// Resolve a configured proof directory against the repository root
///
/// Absolute paths are used as-is.
#[must_use]
pub fn proof_dir(root: &Path, configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

/// File name of the proof for a step, e.g. `verify-ci.proof`
#[must_use]
pub fn proof_file_name(step: &str) -> String {
    format!("{PROOF_PREFIX}{step}.{PROOF_EXTENSION}")
}

/// Recover the step name from a proof file name
#[must_use]
pub fn step_from_proof_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(PROOF_PREFIX)
        .and_then(|rest| rest.strip_suffix(PROOF_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|step| !step.is_empty())
}
